//! Line scanner that mines `#define NAME VALUE` pairs from header trees
//!
//! This is deliberately not a preprocessor: each line is looked at on its
//! own, continuation lines and `#if` blocks are ignored.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions scanned when no explicit list is configured.
pub const DEFAULT_HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh"];

/// One raw `#define` as found in a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDefine {
    pub name: String,
    pub raw_value: String,
    pub file: PathBuf,
    pub line: usize,
}

/// Outcome of a directory scan.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub defines: Vec<RawDefine>,
    pub files_scanned: usize,
    pub warnings: Vec<String>,
}

pub struct HeaderScanner {
    extensions: Vec<String>,
}

impl HeaderScanner {
    pub fn new() -> Self {
        Self::with_extensions(DEFAULT_HEADER_EXTENSIONS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_extensions(extensions: Vec<String>) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Walk `root` recursively and collect every define. A missing or
    /// unreadable root produces an empty result with a warning.
    pub fn scan_directory(&self, root: &Path) -> ScanResult {
        let mut result = ScanResult::default();

        if !root.is_dir() {
            let message = format!("Header source directory not found: {}", root.display());
            log::warn!("{}", message);
            result.warnings.push(message);
            return result;
        }

        log::info!("Scanning headers in {}", root.display());

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let message = format!("Directory traversal error: {}", e);
                    log::warn!("{}", message);
                    result.warnings.push(message);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_header(entry.path()) {
                continue;
            }

            match fs::read(entry.path()) {
                Ok(bytes) => {
                    // Legacy headers are frequently not valid UTF-8 (CP949/1252 comments)
                    let content = String::from_utf8_lossy(&bytes);
                    result.files_scanned += 1;
                    result.defines.extend(scan_source(&content, entry.path()));
                }
                Err(e) => {
                    let message = format!("Skipping unreadable header {}: {}", entry.path().display(), e);
                    log::warn!("{}", message);
                    result.warnings.push(message);
                }
            }
        }

        log::info!(
            "Header scan finished: {} files, {} defines",
            result.files_scanned,
            result.defines.len()
        );
        result
    }

    fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}

impl Default for HeaderScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract defines from the text of a single header.
pub fn scan_source(content: &str, file: &Path) -> Vec<RawDefine> {
    let mut defines = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if let Some((name, raw_value)) = parse_define_line(line) {
            log::debug!("{}:{}: {} = {}", file.display(), index + 1, name, raw_value);
            defines.push(RawDefine {
                name: name.to_string(),
                raw_value,
                file: file.to_path_buf(),
                line: index + 1,
            });
        }
    }

    defines
}

/// Split a `#define NAME VALUE` line. Returns `None` for anything else,
/// including value-less defines and function-like macros.
pub fn parse_define_line(line: &str) -> Option<(&str, String)> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    if parts.next()? != "#define" {
        return None;
    }

    let rest = parts.next()?.trim_start();
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next()?;
    if name.is_empty() || name.contains('(') {
        return None;
    }

    let value = strip_comments(parts.next()?).trim().to_string();
    if value.is_empty() {
        return None;
    }

    Some((name, value))
}

fn strip_comments(value: &str) -> &str {
    let mut end = value.len();
    if let Some(pos) = value.find("//") {
        end = end.min(pos);
    }
    if let Some(pos) = value.find("/*") {
        end = end.min(pos);
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_parse_define_line() {
        assert_eq!(
            parse_define_line("#define WBS_CAPTION 0x02000000"),
            Some(("WBS_CAPTION", "0x02000000".to_string()))
        );
        assert_eq!(
            parse_define_line("  #define\tBS_LEFT   0x00000100L  // left aligned"),
            Some(("BS_LEFT", "0x00000100L".to_string()))
        );
        assert_eq!(
            parse_define_line("#define WBS_MOVE (1 << 16) /* movable */"),
            Some(("WBS_MOVE", "(1 << 16)".to_string()))
        );
        assert_eq!(parse_define_line("#define HEADER_GUARD_H"), None);
        assert_eq!(parse_define_line("#define MAKE(x) ((x) << 1)"), None);
        assert_eq!(parse_define_line("// #define WBS_CHILD 0x1"), None);
        assert_eq!(parse_define_line("#ifdef WBS_CHILD"), None);
        assert_eq!(parse_define_line("#defineX A 1"), None);
    }

    #[test]
    fn test_scan_directory_recursive() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(&temp_dir, "a.h", "#define WBS_CAPTION 0x02000000\n");
        create_test_file(&temp_dir, "sub/b.h", "#define BS_PUSHBUTTON 0x00000000\n#define X\n");
        create_test_file(&temp_dir, "sub/c.cpp", "#define IGNORED 1\n");

        let result = HeaderScanner::new().scan_directory(temp_dir.path());

        assert_eq!(result.files_scanned, 2);
        let names: Vec<_> = result.defines.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["WBS_CAPTION", "BS_PUSHBUTTON"]);
        assert_eq!(result.defines[1].line, 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let result = HeaderScanner::new().scan_directory(&temp_dir.path().join("missing"));
        assert!(result.defines.is_empty());
        assert_eq!(result.files_scanned, 0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_non_utf8_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.h");
        let mut bytes = b"// \xC7\xD1\xB1\xDB\n".to_vec();
        bytes.extend_from_slice(b"#define WBS_MODAL 0x00080000\n");
        fs::write(&path, bytes).unwrap();

        let result = HeaderScanner::new().scan_directory(temp_dir.path());
        assert_eq!(result.defines.len(), 1);
        assert_eq!(result.defines[0].name, "WBS_MODAL");
    }
}
