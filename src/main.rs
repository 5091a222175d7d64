// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use subweave::app_config::{self, Config};
use subweave::app_controller::{self, Controller};
use subweave::clipboard_watch::{ClipboardDecoder, ClipboardSession, CommandClipboard};
use subweave::timeline::JsonTimeline;

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

/// Flags shared by every command
#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Timeline export (JSON) to read segments from
    #[arg(long, global = true, default_value = "timeline.json")]
    timeline: PathBuf,

    /// Use readable styled text and keep styled segments in the sequence
    #[arg(long, global = true)]
    include_styled_text: bool,

    /// Keep transition/effect segments
    #[arg(long, global = true)]
    no_ignore_effects: bool,

    /// Extra name substring to ignore (repeatable)
    #[arg(long = "extra-ignore", global = true, value_name = "PATTERN")]
    extra_ignore: Vec<String>,

    /// Seconds at or below which generic-named segments count as effects
    #[arg(long = "min-duration", global = true, value_name = "SECS")]
    min_duration: Option<f64>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "subweave.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append every new clipboard snapshot to a manual file as a block
    Watch {
        /// Manual file to append to
        output: PathBuf,
        /// Polling interval in seconds
        #[arg(short, long, value_name = "SECS")]
        interval: Option<f64>,
        /// Preferred clipboard encoding (utf-8, shift_jis, utf-16-le, mac_roman, ...)
        #[arg(long, value_name = "LABEL")]
        encoding: Option<String>,
    },

    /// List video track names
    Tracks,

    /// Count subtitle candidate segments on a track
    Count {
        /// Video track name
        track: String,
    },

    /// Show how blocks pair with segments
    Preview {
        /// Manual block file
        manual: PathBuf,
        /// Video track name
        track: String,
        /// Show every row
        #[arg(long)]
        all: bool,
    },

    /// Write an SRT file
    Srt {
        /// Manual block file
        manual: PathBuf,
        /// SRT file to write
        output: PathBuf,
        /// Video track name
        track: String,
    },

    /// Explain a block/segment mismatch
    Diagnose {
        /// Manual block file
        manual: PathBuf,
        /// Video track name
        track: String,
        /// Print complete kept and ignored lists
        #[arg(long)]
        all: bool,
    },

    /// Track statistics
    Stats {
        /// Video track name
        track: String,
    },

    /// Write manual blocks into the track's styled segments
    Apply {
        /// Manual block file
        manual: PathBuf,
        /// Video track name
        track: String,
    },

    /// Generate shell completions for subweave
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subweave - weave hand-written subtitle blocks onto an editing timeline
#[derive(Parser, Debug)]
#[command(name = "subweave")]
#[command(version)]
#[command(about = "Pair manual subtitle blocks with timeline segments and write SRT")]
#[command(long_about = "subweave pairs '>'-prefixed manual subtitle blocks with the text segments
of an editing timeline, skipping transitions and effects, and writes SRT.

EXAMPLES:
    subweave watch manual.txt                       # Collect blocks from the clipboard
    subweave --timeline tl.json tracks              # List video tracks
    subweave preview manual.txt V2                  # Check the pairing
    subweave srt manual.txt out.srt V2              # Write subtitles
    subweave diagnose manual.txt V2 --all           # Explain a mismatch
    subweave --extra-ignore wipe srt m.txt o.srt V2 # Ignore more segment names
    subweave completions bash > subweave.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in subweave.json by default. If the file doesn't
    exist, a default one is created automatically. Flags override it.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                colour,
                now,
                tag,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Trace is the ceiling; the effective level is set once the config is loaded
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialise logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subweave", &mut std::io::stdout());
        return Ok(());
    }

    let options = cli.global;
    if let Some(level) = &options.log_level {
        log::set_max_level(app_config::LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Watch {
            output,
            interval,
            encoding,
        } => {
            config.override_watch(interval, encoding)?;
            run_watch(&config, &output).await
        }
        command => run_timeline_command(config, &options.timeline, command),
    }
}

// Load the config file and apply command line overrides
fn load_config(options: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if options.include_styled_text {
        config.output.include_styled_text = true;
    }
    if options.no_ignore_effects {
        config.filter.ignore_effects = false;
    }
    config
        .filter
        .extra_ignore_patterns
        .extend(options.extra_ignore.iter().cloned());
    if let Some(min) = options.min_duration {
        config.filter.min_duration_secs = min;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_watch(config: &Config, output: &Path) -> Result<()> {
    app_controller::ensure_output_parent(output)?;
    let decoder = ClipboardDecoder::new(&config.watch.encoding)?;
    let clipboard = match &config.watch.clipboard_command {
        Some(command) => CommandClipboard::new(command, decoder),
        None => CommandClipboard::detect(decoder),
    };
    info!(
        "Watching clipboard via '{}' -> {} (Ctrl+C to stop, every {}ms, encoding={})",
        clipboard.program(),
        output.display(),
        config.watch.interval_ms,
        decoder.preferred().name()
    );

    let mut session = ClipboardSession::new(clipboard, output);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };
    let appended = session
        .run(Duration::from_millis(config.watch.interval_ms), shutdown)
        .await?;

    info!("Stopped. {} blocks added to {}", appended, output.display());
    Ok(())
}

fn run_timeline_command(config: Config, timeline: &Path, command: Commands) -> Result<()> {
    let source = JsonTimeline::open(timeline)
        .with_context(|| format!("Failed to open timeline: {}", timeline.display()))?;
    let mut controller = Controller::with_config(config, source)?;

    match command {
        Commands::Tracks => {
            for name in controller.tracks()? {
                println!("{}", name);
            }
        }
        Commands::Count { track } => {
            println!("{}", controller.count(&track)?);
        }
        Commands::Preview { manual, track, all } => {
            let run = controller.run(&manual, &track)?;
            print!("{}", controller.format_preview(&run, all));
        }
        Commands::Srt { manual, output, track } => {
            app_controller::ensure_output_parent(&output)?;
            let summary = controller.generate_srt(&manual, &output, &track)?;
            println!("{}", summary.output.written());
        }
        Commands::Diagnose { manual, track, all } => {
            let report = controller.diagnose(&manual, &track)?;
            print!("{}", controller.format_diagnosis(&report, all));
        }
        Commands::Stats { track } => {
            let report = controller.stats(&track)?;
            print!("{}", controller.format_stats(&track, &report));
        }
        Commands::Apply { manual, track } => {
            let summary = controller.apply(&manual, &track)?;
            println!("applied {}/{}", summary.applied, summary.paired);
        }
        Commands::Watch { .. } | Commands::Completions { .. } => {}
    }
    Ok(())
}
