use crate::commands::{self, ThemeAction};
use crate::config::{Config, ConfigUpdate};
use crate::log_debug;
use crate::tui::{StudioLaunch, run_studio};
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand, crate_version};
use std::path::PathBuf;

const LOG_FILE: &str = "tryon-studio-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Try-On Studio: dress a model photo in your wardrobe with AI",
    long_about = "Try-On Studio loads a photo of a model and pictures of clothing, then asks an image model to render the model wearing the selected items.",
    disable_version_flag = true,
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, progress messages)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
#[command(subcommand_negates_reqs = true)]
#[command(subcommand_precedence_over_arg = true)]
pub enum Commands {
    /// Open the interactive studio (the default)
    #[command(
        about = "Open the interactive studio",
        long_about = "Open the terminal studio. Optionally preload a model image and clothing files."
    )]
    Studio {
        /// Model image to load on start
        #[arg(short, long, help = "Model image path or URL to load on start")]
        model: Option<String>,

        /// Clothing images to load on start (globs allowed)
        #[arg(short, long, num_args = 1.., help = "Clothing image paths, globs or URLs to load on start")]
        items: Vec<String>,
    },

    /// Render a model wearing the given items without opening the studio
    #[command(
        name = "try-on",
        about = "Render a model wearing the given items",
        long_about = "Load a model image and one or more clothing images, generate the styled composite and write it to disk."
    )]
    TryOn {
        /// Model image path or URL
        #[arg(short, long, help = "Model image path or URL")]
        model: String,

        /// Clothing image paths or URLs, in the order they should be listed
        #[arg(short, long = "item", required = true, num_args = 1.., help = "Clothing image path or URL (repeatable)")]
        items: Vec<String>,

        /// Write the composite to this file instead of the output directory
        #[arg(short, long, help = "Write the composite to this file")]
        output: Option<PathBuf>,
    },

    /// Generate a clothing item image
    #[command(
        about = "Generate a clothing item image",
        long_about = "Invent a random clothing item, or render one from a description, and save the image."
    )]
    Item {
        /// Describe the item instead of letting the model invent one
        #[arg(short, long, help = "Describe the item to generate")]
        describe: Option<String>,

        /// Directory for the generated image
        #[arg(short, long, help = "Directory for the generated image")]
        output_dir: Option<PathBuf>,
    },

    /// Configure models, endpoint and output
    #[command(
        about = "Configure Try-On Studio",
        long_about = "Show or change the stored configuration. The API key is read from GEMINI_API_KEY (or API_KEY) and is never stored."
    )]
    Config {
        /// Model used for composites and item images
        #[arg(long, help = "Set the image model")]
        image_model: Option<String>,

        /// Model used to invent item descriptions
        #[arg(long, help = "Set the text model")]
        text_model: Option<String>,

        /// API base URL
        #[arg(long, help = "Set the API base URL")]
        api_base_url: Option<String>,

        /// Request timeout in seconds
        #[arg(long, help = "Set the request timeout in seconds")]
        timeout: Option<u64>,

        /// Where generated images are saved
        #[arg(long, help = "Set the output directory")]
        output_dir: Option<PathBuf>,

        /// Apply try-on results even if the model image changed meanwhile
        #[arg(
            long,
            value_name = "BOOL",
            action = ArgAction::Set,
            help = "Keep try-on results made for a replaced model image"
        )]
        keep_stale_results: Option<bool>,

        /// Log HTTP client internals too
        #[arg(
            long,
            value_name = "BOOL",
            action = ArgAction::Set,
            help = "Include HTTP client internals in the log"
        )]
        verbose_logging: Option<bool>,

        /// Print the configuration without the change summary
        #[arg(short, long, help = "Print the current configuration")]
        print: bool,
    },

    /// Show or change the light/dark theme
    #[command(about = "Show, set or toggle the studio theme")]
    Theme {
        /// light, dark or toggle; omit to show the current theme
        #[arg(help = "light, dark or toggle")]
        action: Option<ThemeAction>,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;

        // Load config to check for verbose logging settings
        if let Ok(config) = Config::load() {
            crate::logger::set_verbose_logging(config.verbose_logging);
            if config.verbose_logging {
                log_debug!(
                    "Verbose logging enabled - will show HTTP requests and external library logs"
                );
            }
        }
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    let command = cli.command.unwrap_or(Commands::Studio {
        model: None,
        items: Vec::new(),
    });
    handle_command(command).await
}

/// Dispatch a parsed subcommand
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Studio { model, items } => {
            let config = Config::load()?;
            if config.api_key().is_none() {
                log_debug!("No API key in environment; generation will fail until one is set");
            }
            let launch = StudioLaunch { model, items };
            tokio::task::block_in_place(|| run_studio(&config, launch))
        }
        Commands::TryOn {
            model,
            items,
            output,
        } => {
            let config = Config::load()?;
            commands::handle_try_on_command(&config, &model, &items, output).await
        }
        Commands::Item {
            describe,
            output_dir,
        } => {
            let config = Config::load()?;
            commands::handle_item_command(&config, describe, output_dir).await
        }
        Commands::Config {
            image_model,
            text_model,
            api_base_url,
            timeout,
            output_dir,
            keep_stale_results,
            verbose_logging,
            print,
        } => commands::handle_config_command(
            ConfigUpdate {
                image_model,
                text_model,
                api_base_url,
                request_timeout_secs: timeout,
                output_dir,
                discard_stale_results: keep_stale_results.map(|keep| !keep),
                verbose_logging,
            },
            print,
        ),
        Commands::Theme { action } => {
            commands::handle_theme_command(action.unwrap_or(ThemeAction::Show))
        }
    }
}
