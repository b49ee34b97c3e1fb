// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use subtitler::app_config::{self, Config};
use subtitler::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that loads a configuration
#[derive(Args, Debug)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert SRT files (or directories of them) to ITT captions
    Convert(ConvertArgs),

    /// Write an SRT file from transcription segments (JSON)
    Encode(EncodeArgs),

    /// Generate shell completions for subtitler
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// SRT files or directories to convert
    #[arg(value_name = "INPUT_PATH", required = true)]
    input_paths: Vec<PathBuf>,

    /// Maximum number of files converted at once
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    /// Only look at the top level of input directories
    #[arg(long)]
    no_recursive: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// JSON file with transcription segments
    #[arg(value_name = "SEGMENTS_JSON")]
    segments_path: PathBuf,

    /// Media file the segments were transcribed from; the SRT is named after it
    #[arg(short, long)]
    media: Option<PathBuf>,

    /// Explicit output path
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

/// subtitler - subtitle timing and format conversion
#[derive(Parser, Debug)]
#[command(name = "subtitler")]
#[command(version)]
#[command(about = "Create SRT subtitles from transcription segments and convert SRT to ITT")]
#[command(long_about = "subtitler writes SubRip subtitles from transcription segments and converts SubRip files into TTML/ITT captions.

EXAMPLES:
    subtitler convert movie.srt                        # Writes movie.itt next to it
    subtitler convert -j 8 /subs/                      # Convert a whole directory tree
    subtitler encode segments.json --media movie.mp4   # Writes movie.srt
    subtitler completions bash > subtitler.bash        # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, marker, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; raised or lowered once the config is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subtitler", &mut std::io::stdout());
            Ok(())
        }
        Commands::Convert(args) => run_convert(args).await,
        Commands::Encode(args) => run_encode(args),
    }
}

/// Load or create the configuration and apply the log level
fn load_config(common: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &common.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = &common.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    match &common.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

async fn run_convert(args: ConvertArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;

    if let Some(concurrency) = args.concurrency {
        config.batch.concurrency = concurrency;
    }
    if args.no_recursive {
        config.batch.recursive = false;
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run_convert(&args.input_paths).await?;

    if summary.has_failures() {
        return Err(anyhow!("{} of {} file(s) failed to convert", summary.failed, summary.outcomes.len()));
    }

    Ok(())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    let controller = Controller::with_config(config)?;

    controller.run_encode(&args.segments_path, args.media.as_deref(), args.output.as_deref())?;

    Ok(())
}
