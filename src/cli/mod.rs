// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::Result;
use crate::{CompilerOptions, OutputFormat};
use clap::{Arg, ArgAction, Command};
use std::time::Instant;

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
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

        self.setup_logging(matches.get_count("verbose"))?;

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        let result = match matches.subcommand() {
            Some(("compile", sub_matches)) => handlers::handle_compile_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(sub_matches),
            Some(("parse", sub_matches)) => handlers::handle_parse_command(sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };

        log::debug!("Finished in {}ms", self.start_time.elapsed().as_millis());
        result
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
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
                Command::new("compile")
                    .about("Compile styled templates to precompiled style metadata")
                    .arg(Arg::new("input").help("Template manifest (.json) or style file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output file"))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(OutputFormat)).help("Output format [default: js]"))
                    .arg(Arg::new("debug").short('d').long("debug").help("Log every compilation phase and mark metadata as debug").action(ArgAction::SetTrue))
                    .arg(Arg::new("stats").long("stats").help("Show detailed compilation statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch for file changes and recompile").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Parse templates and report dropped or unknown declarations")
                    .arg(Arg::new("input").help("Input file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check every template file in a directory recursively").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("parse")
                    .about("Print the parsed style rule of one declaration block as JSON")
                    .arg(Arg::new("block").help("Declaration block, e.g. \"padding: 4px 8px; color: red\"").required(true).index(1)),
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

    /// CLI flags win over the config file, which wins over the defaults.
    pub fn build_compiler_options(&self, matches: &clap::ArgMatches) -> Result<CompilerOptions> {
        let mut options = CompilerOptions::default();
        self.config.apply(&mut options)?;

        if matches.get_flag("debug") {
            options.debug_mode = true;
            options.debug_metadata = true;
        }
        if let Some(format) = matches.get_one::<OutputFormat>("format") {
            options.output_format = *format;
        }

        Ok(options)
    }

    /// Directory configured for outputs without an explicit `-o`
    pub fn output_directory(&self) -> Option<&str> {
        self.config.output_directory.as_deref()
    }
}
