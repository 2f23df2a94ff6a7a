// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::{FlagError, Result};
use crate::resolver::OwnerKind;
use crate::EngineOptions;
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MaskKind {
    Window,
    Control,
}

impl From<MaskKind> for OwnerKind {
    fn from(kind: MaskKind) -> Self {
        match kind {
            MaskKind::Window => OwnerKind::Window,
            MaskKind::Control => OwnerKind::Control,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        self.setup_logging(matches.get_count("verbose"))?;

        let result = match matches.subcommand() {
            Some(("generate", sub_matches)) => handlers::handle_generate_command(self, sub_matches),
            Some(("validate", sub_matches)) => handlers::handle_validate_command(self, sub_matches),
            Some(("resolve", sub_matches)) => handlers::handle_resolve_command(self, sub_matches),
            Some(("status", sub_matches)) => handlers::handle_status_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };

        log::debug!("Finished in {}ms", self.start_time.elapsed().as_millis());
        result
    }

    fn build_cli(&self) -> Command {
        let config_dir_arg = Arg::new("config-dir")
            .short('o')
            .long("config-dir")
            .value_name("DIR")
            .help("Project config directory holding the JSON documents");
        let format_arg = Arg::new("format")
            .short('f')
            .long("format")
            .value_parser(clap::value_parser!(OutputFormat))
            .default_value("text")
            .help("Output format");

        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.toml or .json)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("generate")
                    .about("Scan headers and regenerate flag tables, rules and groups")
                    .arg(Arg::new("source").help("Header source directory").index(1))
                    .arg(config_dir_arg.clone())
                    .arg(Arg::new("legacy").short('l').long("legacy").value_name("SYMBOL").help("Activate a legacy default value for SYMBOL").action(ArgAction::Append))
                    .arg(Arg::new("dry-run").long("dry-run").help("Run the pass without writing any file").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed generation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch the header tree and regenerate on change").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("validate")
                    .about("Resolve the masks of a layout file and report unknown bits")
                    .arg(Arg::new("layout").help("Layout JSON file").required(true).index(1))
                    .arg(config_dir_arg.clone())
                    .arg(format_arg.clone())
                    .arg(Arg::new("dry-run").long("dry-run").help("Do not write the unknown bits report").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("resolve")
                    .about("Resolve a single mask against the persisted tables")
                    .arg(Arg::new("mask").help("Mask literal (hex, decimal, OR or shift expression)").required(true).index(1))
                    .arg(Arg::new("kind").short('k').long("kind").value_parser(clap::value_parser!(MaskKind)).default_value("window").help("Whether the mask belongs to a window or a control"))
                    .arg(Arg::new("owner").short('n').long("owner").value_name("NAME").help("Window name or control type used to derive behavior"))
                    .arg(config_dir_arg.clone())
                    .arg(format_arg.clone()),
            )
            .subcommand(
                Command::new("status")
                    .about("Show table sizes and whether the persisted documents changed")
                    .arg(config_dir_arg)
                    .arg(format_arg)
                    .arg(Arg::new("list").short('l').long("list").help("List every known definition").action(ArgAction::SetTrue)),
            )
    }

    fn setup_logging(&self, verbose_count: u8) -> Result<()> {
        let log_level = match verbose_count {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
        Ok(())
    }

    /// Command line values first, config file values fill the gaps.
    pub fn build_engine_options(&self, matches: &clap::ArgMatches) -> Result<EngineOptions> {
        let mut options = EngineOptions::default();

        if let Some(dir) = matches.get_one::<String>("config-dir") {
            options.config_dir = PathBuf::from(dir);
        } else if let Some(dir) = &self.config.config_dir {
            options.config_dir = PathBuf::from(dir);
        }

        if let Some(extensions) = &self.config.header_extensions {
            if extensions.is_empty() {
                return Err(FlagError::config("header_extensions must not be empty"));
            }
            options.header_extensions = extensions.clone();
        }

        if let Ok(Some(symbols)) = matches.try_get_many::<String>("legacy") {
            options.legacy_overrides.extend(symbols.cloned());
        }
        if let Some(symbols) = &self.config.legacy_overrides {
            for symbol in symbols {
                if !options.legacy_overrides.contains(symbol) {
                    options.legacy_overrides.push(symbol.clone());
                }
            }
        }

        if let Some(prefixes) = &self.config.extra_window_prefixes {
            options.extra_window_prefixes = prefixes.clone();
        }
        if let Some(prefixes) = &self.config.extra_control_prefixes {
            options.extra_control_prefixes = prefixes.clone();
        }

        let dry_run = matches.try_get_one::<bool>("dry-run").ok().flatten().copied().unwrap_or(false);
        options.write_outputs = !dry_run && self.config.write_outputs.unwrap_or(true);

        Ok(options)
    }

    /// Header directory from the command line, else from the config file.
    pub fn source_dir(&self, matches: &clap::ArgMatches) -> Result<PathBuf> {
        matches
            .get_one::<String>("source")
            .or(self.config.source_dir.as_ref())
            .map(PathBuf::from)
            .ok_or_else(|| FlagError::config("No header source directory given (argument or source_dir in config)"))
    }
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}
