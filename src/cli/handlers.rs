// FILE: src/cli/handlers.rs
use crate::{
    cli::{MaskKind, OutputFormat},
    format_hex, load_layout, store, EngineOptions, FlagEngine, FlagError, GenerationStats, LiteralNormalizer,
    Namespace, OwnerKind, Result,
};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Instant;

// --- GENERATE ---
pub fn handle_generate_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let source_dir = cli.source_dir(matches)?;
    let options = cli.build_engine_options(matches)?;

    if matches.get_flag("watch") {
        watch_and_generate(&source_dir, options)
    } else {
        generate_once(&source_dir, options, matches.get_flag("stats"))
    }
}

fn generate_once(source_dir: &Path, options: EngineOptions, show_stats: bool) -> Result<()> {
    println!("🔨 Generating flags from {} -> {}", source_dir.display(), options.config_dir.display());

    let mut engine = FlagEngine::new(options);
    let stats = engine.generate_flags(source_dir);

    println!("✅ Generation finished");
    println!(
        "   Flags: {} window, {} control, {} window types",
        stats.window_flags, stats.control_flags, stats.window_types
    );
    println!("   Files: {} scanned, {} written", stats.files_scanned, stats.files_written);
    println!("   Time: {}ms", stats.generation_time_ms);

    if show_stats {
        print_detailed_stats(&stats)?;
    }
    print_warnings(&stats.warnings);

    Ok(())
}

fn is_header_change(event: &Event, extensions: &[String]) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    })
}

fn watch_and_generate(source_dir: &Path, options: EngineOptions) -> Result<()> {
    println!("👀 Watching {} for header changes...", source_dir.display());

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                if let Err(e) = tx.send(event) {
                    eprintln!("Watch error: {}", e);
                }
            }
        },
        notify::Config::default(),
    )
    .map_err(|e| {
        FlagError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to create file watcher: {}", e),
        ))
    })?;

    watcher.watch(source_dir, RecursiveMode::Recursive).map_err(|e| {
        FlagError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to watch directory: {}", e),
        ))
    })?;

    let extensions = options.header_extensions.clone();
    let mut engine = FlagEngine::new(options);
    let stats = engine.generate_flags(source_dir);
    println!("✅ Initial generation: {} warnings", stats.warnings.len());

    loop {
        match rx.recv() {
            Ok(event) => {
                if !is_header_change(&event, &extensions) {
                    continue;
                }
                // Editors touch several files per save; fold queued events into one pass
                while rx.try_recv().is_ok() {}

                println!("🔄 Headers changed, regenerating...");
                let stats = engine.generate_flags(source_dir);
                println!(
                    "✅ Regenerated ({} window, {} control flags, {}ms)",
                    stats.window_flags, stats.control_flags, stats.generation_time_ms
                );
                print_warnings(&stats.warnings);
            }
            Err(e) => {
                eprintln!("Watch error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

// --- VALIDATE ---
pub fn handle_validate_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let layout_path = matches.get_one::<String>("layout").unwrap();
    let format = *matches.get_one::<OutputFormat>("format").unwrap();
    let options = cli.build_engine_options(matches)?;

    let start = Instant::now();
    let mut windows = load_layout(Path::new(layout_path))?;
    let mut engine = FlagEngine::new(options);
    let load = engine.initialize();
    let stats = engine.process_layout(&mut windows);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "windows": windows,
                "stats": stats,
                "unknown_bits": engine.unknown_bits(),
            });
            println!("{}", to_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("🔍 Validating {}", layout_path);
            for window in &windows {
                let marker = if window.valid { "✅" } else { "❌" };
                println!("{} {} [{}] {}", marker, window.name, window.window_type, format_hex(window.flags));
                if let Some(original) = &window.repaired_from {
                    println!("      repaired from {}", original);
                }
                if !window.resolved_flags.is_empty() {
                    println!("      {}", window.resolved_flags.join(" | "));
                }
                println!("      behavior: {}", window.behavior.join(", "));
                for control in &window.controls {
                    let marker = if control.valid { "✅" } else { "❌" };
                    println!(
                        "   {} {} [{}/{}] {} {}",
                        marker,
                        control.label(&window.name),
                        control.control_type,
                        control.category,
                        format_hex(control.flags),
                        control.resolved_flags.join(" | ")
                    );
                }
            }

            println!("\n📊 Validation Summary:");
            println!("   Windows: {} ({} invalid, {} repaired)", stats.windows, stats.invalid_windows, stats.repaired_windows);
            println!("   Controls: {} ({} invalid)", stats.controls, stats.invalid_controls);
            println!("   Exclusive conflicts: {}", stats.conflicts);
            println!("   Unknown bit entries: {}", stats.unknown_entries);
            println!("   Time: {}ms", start.elapsed().as_millis());
            print_warnings(&load.warnings);
            print_warnings(&stats.warnings);
        }
    }

    Ok(())
}

// --- RESOLVE ---
pub fn handle_resolve_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let literal = matches.get_one::<String>("mask").unwrap();
    let kind: OwnerKind = (*matches.get_one::<MaskKind>("kind").unwrap()).into();
    let format = *matches.get_one::<OutputFormat>("format").unwrap();
    let mut options = cli.build_engine_options(matches)?;
    options.write_outputs = false;

    let owner = matches.get_one::<String>("owner");

    let mut mask = LiteralNormalizer::new().parse_literal(literal)?;
    let mut engine = FlagEngine::new(options);
    let load = engine.initialize();
    let resolved = engine.resolve(kind, &mut mask);
    let behavior = owner.map(|owner| match kind {
        OwnerKind::Window => serde_json::json!({ "tags": engine.window_behavior(owner, &resolved) }),
        OwnerKind::Control => serde_json::json!(engine.control_behavior(owner, &resolved)),
    });

    match format {
        OutputFormat::Json => {
            let mut output = serde_json::to_value(&resolved).map_err(|e| FlagError::Io(e.into()))?;
            if let Some(behavior) = &behavior {
                output["behavior"] = behavior.clone();
            }
            println!("{}", to_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{} mask {}", kind, format_hex(resolved.raw_mask));
            if let Some(repair) = &resolved.repair {
                println!(
                    "   ⚠️  shifted mask repaired: {} -> {}",
                    format_hex(repair.original),
                    format_hex(repair.repaired)
                );
            }
            println!("   Flags: {}", resolved.matched_flag_names.join(" | "));
            println!("   Unknown bits: {}", format_hex(resolved.unknown_bits));
            println!("   Valid: {}", resolved.validity);
            if let Some(behavior) = &behavior {
                println!("   Behavior: {}", behavior);
            }
            print_warnings(&load.warnings);
        }
    }

    Ok(())
}

// --- STATUS ---
pub fn handle_status_command(cli: &super::EnhancedCli, matches: &clap::ArgMatches) -> Result<()> {
    let format = *matches.get_one::<OutputFormat>("format").unwrap();
    let list = matches.get_flag("list");
    let options = cli.build_engine_options(matches)?;

    let mut engine = FlagEngine::new(options);
    let load = engine.initialize();
    let namespaces = [Namespace::WindowFlag, Namespace::ControlFlag, Namespace::WindowType];

    match format {
        OutputFormat::Json => {
            let mut output = serde_json::json!({
                "config_dir": engine.store().dir().display().to_string(),
                "load": load,
                "fingerprints": engine.store().fingerprints(),
                "stale": engine.is_stale(),
            });
            if list {
                for namespace in namespaces {
                    let definitions: serde_json::Map<String, serde_json::Value> = engine
                        .definitions(namespace)
                        .into_iter()
                        .map(|d| {
                            let raw = d.raw_value();
                            (d.name, serde_json::Value::from(raw))
                        })
                        .collect();
                    output[namespace.label()] = serde_json::Value::Object(definitions);
                }
            }
            println!("{}", to_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("📁 {}", engine.store().dir().display());
            println!("   Window flags: {}", load.window_flags);
            println!("   Control flags: {}", load.control_flags);
            println!("   Window types: {}", load.window_types);
            println!("   Window rules: {}", load.window_rules);
            println!("   Control rules: {}", load.control_rules);
            for file in store::TRACKED_FILES {
                let state = if engine.store().exists(file) { "present" } else { "missing" };
                println!("   {:<26} {}", file, state);
            }
            if list {
                for namespace in namespaces {
                    println!("\n{}:", namespace);
                    for definition in engine.definitions(namespace) {
                        println!("   {:<32} {}", definition.name, definition.raw_value());
                    }
                }
            }
            print_warnings(&load.warnings);
        }
    }

    Ok(())
}

fn print_detailed_stats(stats: &GenerationStats) -> Result<()> {
    println!("\n📊 Detailed Statistics:");
    println!("   Defines found: {}", stats.defines_found);
    println!("   Unclassified symbols: {}", stats.unclassified);
    println!("   Unparseable literals: {}", stats.unparseable);
    println!(
        "   Scanned: {} window, {} control, {} window types",
        stats.scanned_window_flags, stats.scanned_control_flags, stats.scanned_window_types
    );
    println!("   Defaults added: {}", stats.defaults_added);
    println!("   Legacy pinned: {}", stats.legacy_pinned);
    println!("   Legacy recorded: {}", stats.legacy_recorded);
    println!("   Rule entries: {} window, {} control", stats.window_rules, stats.control_rules);
    Ok(())
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n⚠️  {} warning(s):", warnings.len());
    for warning in warnings {
        println!("   {}", warning);
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| FlagError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}
