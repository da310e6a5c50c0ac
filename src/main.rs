// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use doctranslate::app_config::{self, Config, TranslationProvider};
use doctranslate::app_controller::Controller;
use doctranslate::errors::AppError;
use doctranslate::extraction::TextSource;
use doctranslate::translation::TranslationRequest;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "huggingface", alias = "hf")]
    HuggingFace,
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::HuggingFace => TranslationProvider::HuggingFace,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Translate one document and print or save the result
    Translate(TranslateArgs),

    /// Translate interactively, line by line
    Chat {
        /// Initial target language code (e.g. 'hi_IN')
        #[arg(short, long)]
        target_language: Option<String>,
    },

    /// List supported target languages
    Languages,

    /// Generate shell completions for doctranslate
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
#[group(id = "input", required = true, multiple = false)]
struct InputArgs {
    /// Text to translate
    #[arg(long)]
    text: Option<String>,

    /// Web page to translate
    #[arg(long)]
    url: Option<String>,

    /// PDF file to translate
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Target language code (e.g. 'hi_IN', 'ta_IN')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Maximum chunk length in characters
    #[arg(long)]
    max_length: Option<usize>,

    /// Reference translation file to compute a BLEU score against
    #[arg(long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// Write the translation to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// doctranslate - document translation with multilingual seq2seq models
///
/// Translates raw text, web pages and PDF files chunk by chunk with a
/// pretrained multilingual translation model.
#[derive(Parser, Debug)]
#[command(name = "doctranslate")]
#[command(version)]
#[command(about = "Translate text, web pages and PDFs with a multilingual model")]
#[command(long_about = "doctranslate extracts text from a web page, a PDF or raw input, detects its language, \
splits it into bounded chunks and translates each chunk with a multilingual model.

EXAMPLES:
    doctranslate serve --port 5000                          # Web form and JSON API
    doctranslate translate --text \"Hello world\" -t hi_IN    # One-shot translation
    doctranslate translate --url https://example.com -t ta_IN -o out.txt
    doctranslate translate --pdf paper.pdf --reference ref.txt
    doctranslate chat                                       # Interactive chatbot
    doctranslate -p mock translate --text \"offline demo\"    # No model needed
    doctranslate completions bash > doctranslate.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    huggingface - Seq2seq inference endpoint (default: facebook/mbart-large-50-many-to-many-mmt)
    ollama      - Local Ollama server (default: llama3.2:3b)
    mock        - Offline echo model")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Model endpoint URL
    #[arg(long, global = true)]
    endpoint: Option<String>,
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
        // The logger itself accepts everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "doctranslate", &mut std::io::stdout());
        return Ok(());
    }

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let controller = Controller::with_config(config)?;
            controller.serve(&host, port).await
        }
        Commands::Translate(args) => run_translate(config, args).await,
        Commands::Chat { target_language } => {
            let mut config = config;
            if let Some(target) = target_language {
                config.languages.default_target = target;
                config.ensure_valid()?;
            }
            let controller = Controller::with_config(config)?;
            controller.chat().await
        }
        Commands::Languages => {
            let controller = Controller::with_config(config)?;
            println!("{}", controller.language_table());
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the config file, apply command-line overrides and validate
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    // Override config with CLI options if provided
    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &cli.model {
        config.translation.get_active_provider_config_mut().model = model.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.translation.get_active_provider_config_mut().endpoint = endpoint.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.ensure_valid()?;
    Ok(config)
}

async fn run_translate(mut config: Config, args: TranslateArgs) -> Result<()> {
    if let Some(max_length) = args.max_length {
        config.translation.common.max_chunk_length = max_length;
        config.ensure_valid()?;
    }

    let source = if let Some(text) = &args.input.text {
        TextSource::raw_text(text)?
    } else if let Some(url) = &args.input.url {
        TextSource::url(url)?
    } else if let Some(pdf) = &args.input.pdf {
        TextSource::PdfPath(pdf.clone())
    } else {
        return Err(anyhow!("One of --text, --url or --pdf is required"));
    };

    let mut request = TranslationRequest::new(source);
    if let Some(target) = args.target_language {
        request = request.with_target(target);
    }
    if let Some(reference) = &args.reference {
        request = request.with_reference(read_reference(reference)?);
    }

    let controller = Controller::with_config(config)?;
    controller.run_translate(request, args.output.as_deref()).await?;
    Ok(())
}

fn read_reference(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::File(format!("{}: {}", path.display(), e)))
}
