//! Headless command handlers
//!
//! Each handler runs one operation from start to finish on the console,
//! using the same stores and client as the studio.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigUpdate};
use crate::export::{save_to_dir, write_image};
use crate::gemini::{GeneratedItem, GenerationClient};
use crate::ingest::{ingest_batch, ingest_source};
use crate::settings::{Settings, ThemePreference};
use crate::store::{StudioStore, WardrobeStore, prepare_try_on};
use crate::{log_debug, ui};

/// Terminal colors for console output, taken from the studio palette
mod colors {
    use ratatui::style::Color;

    fn rgb(color: Color) -> (u8, u8, u8) {
        match color {
            Color::Rgb(r, g, b) => (r, g, b),
            _ => (255, 255, 255),
        }
    }

    pub fn accent_primary() -> (u8, u8, u8) {
        rgb(crate::ui::ELECTRIC_PURPLE)
    }

    pub fn accent_secondary() -> (u8, u8, u8) {
        rgb(crate::ui::NEON_CYAN)
    }

    pub fn accent_tertiary() -> (u8, u8, u8) {
        rgb(crate::ui::CORAL)
    }

    pub fn warning() -> (u8, u8, u8) {
        rgb(crate::ui::ELECTRIC_YELLOW)
    }

    pub fn success() -> (u8, u8, u8) {
        rgb(crate::ui::SUCCESS_GREEN)
    }

    pub fn text_secondary() -> (u8, u8, u8) {
        (98, 114, 164)
    }

    pub fn text_dim() -> (u8, u8, u8) {
        (68, 71, 90)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Try-On
// ═══════════════════════════════════════════════════════════════════════════════

/// Dress `model` in `items` and write the composite
///
/// The composite lands at `output` when given, otherwise in the configured
/// output directory.
pub async fn handle_try_on_command(
    config: &Config,
    model: &str,
    items: &[String],
    output: Option<PathBuf>,
) -> Result<()> {
    log_debug!("Starting 'try-on' with model {} and {} items", model, items.len());
    config.check_environment()?;

    let http = reqwest::Client::new();
    let mut studio = StudioStore::new();
    let mut wardrobe = WardrobeStore::new();

    let model_upload = ingest_source(&http, model).await?;
    studio.set_model_image(model_upload.image);

    let batch = ingest_batch(&http, items).await;
    if let Some(summary) = batch.error_summary() {
        if batch.loaded.is_empty() {
            return Err(anyhow!(summary));
        }
        ui::print_warning(&summary);
    }
    wardrobe.add_uploaded(batch.loaded);
    wardrobe.select_all();

    let request = prepare_try_on(&studio, &wardrobe)?;
    let names: Vec<&str> = request.items.iter().map(|i| i.name.as_str()).collect();
    ui::print_info(&format!("Trying on: {}", names.join(", ")));

    let client = GenerationClient::from_config(config);
    let spinner = ui::create_styling_spinner();
    let result = client
        .generate_styled_image(&request.model_image, &request.items)
        .await;
    spinner.finish_and_clear();
    let composite = result?;

    let path = match output {
        Some(path) => {
            write_image(&composite, &path)?;
            path
        }
        None => save_to_dir(&composite, &config.output_dir, "try-on")?,
    };
    studio.set_generated_image(composite);

    ui::print_success(&format!("Your new look is ready: {}", path.display()));
    if let Some(info) = studio.generated_image().and_then(|image| image.probe()) {
        ui::print_info(&info.to_string());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Item Generation
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate one clothing item, random or from a description, and save it
pub async fn handle_item_command(
    config: &Config,
    description: Option<String>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    config.check_environment()?;
    let client = GenerationClient::from_config(config);

    let spinner = ui::create_spinner(&crate::messages::item_generation_message().text);
    let result = match &description {
        Some(text) => client.generate_described_item(text).await,
        None => client.generate_random_item().await,
    };
    spinner.finish_and_clear();
    let GeneratedItem { name, image } = result?;

    let dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
    let path = save_to_dir(&image, &dir, &name)?;
    ui::print_success(&format!("Created {}", name.bold()));
    ui::print_info(&format!("Saved to {}", path.display()));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Apply `update` to the stored configuration and print the result
pub fn handle_config_command(update: ConfigUpdate, print: bool) -> Result<()> {
    log_debug!("Starting 'config' command with update: {:?}", update);
    let mut config = Config::load()?;

    if !update.is_empty() {
        config.update(update)?;
        config.save()?;
        ui::print_success("Configuration updated successfully.");
    } else if !print {
        ui::print_info("No changes requested; current configuration:");
    }

    print_configuration(&config, Config::get_config_path().ok().as_deref());
    Ok(())
}

fn print_configuration(config: &Config, path: Option<&Path>) {
    let purple = colors::accent_primary();
    let cyan = colors::accent_secondary();
    let coral = colors::accent_tertiary();
    let yellow = colors::warning();
    let green = colors::success();
    let dim = colors::text_secondary();

    println!();
    println!(
        "{}  {}  {}",
        "━━━".truecolor(purple.0, purple.1, purple.2),
        "TRY-ON STUDIO CONFIGURATION"
            .truecolor(cyan.0, cyan.1, cyan.2)
            .bold(),
        "━━━".truecolor(purple.0, purple.1, purple.2)
    );
    println!();

    print_section_header("MODELS");
    print_config_row("Image", &config.image_model, cyan, true);
    print_config_row("Text", &config.text_model, cyan, false);

    println!();
    print_section_header("SERVICE");
    print_config_row("Endpoint", &config.api_base_url, dim, false);
    print_config_row(
        "Timeout",
        &format!("{}s", config.request_timeout_secs),
        coral,
        false,
    );
    let (key_state, key_color) = if config.api_key().is_some() {
        ("found in environment", green)
    } else {
        ("not set", yellow)
    };
    print_config_row("API key", key_state, key_color, false);

    println!();
    print_section_header("STUDIO");
    print_config_row(
        "Output",
        &config.output_dir.display().to_string(),
        yellow,
        false,
    );
    print_config_row(
        "Stale",
        if config.discard_stale_results {
            "discard"
        } else {
            "keep latest"
        },
        if config.discard_stale_results { green } else { dim },
        false,
    );
    print_config_row(
        "Verbose",
        if config.verbose_logging { "on" } else { "off" },
        dim,
        false,
    );

    if let Some(path) = path {
        println!();
        println!(
            "  {}",
            path.display().to_string().truecolor(dim.0, dim.1, dim.2).italic()
        );
    }
    println!();
}

/// Print a section header with a rule after it
fn print_section_header(name: &str) {
    let purple = colors::accent_primary();
    let dim_sep = colors::text_dim();
    println!(
        "{} {} {}",
        "─".truecolor(purple.0, purple.1, purple.2),
        name.truecolor(purple.0, purple.1, purple.2).bold(),
        "─"
            .repeat(30 - name.len().min(28))
            .truecolor(dim_sep.0, dim_sep.1, dim_sep.2)
    );
}

/// Print a config row with label and value
fn print_config_row(label: &str, value: &str, value_color: (u8, u8, u8), highlight: bool) {
    let dim = colors::text_secondary();
    let label_styled = format!("{label:>12}").truecolor(dim.0, dim.1, dim.2);

    let value_styled = if highlight {
        value
            .truecolor(value_color.0, value_color.1, value_color.2)
            .bold()
    } else {
        value.truecolor(value_color.0, value_color.1, value_color.2)
    };

    println!("{label_styled}  {value_styled}");
}

// ═══════════════════════════════════════════════════════════════════════════════
// Theme
// ═══════════════════════════════════════════════════════════════════════════════

/// What `tryon-studio theme` was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Show,
    Set(ThemePreference),
    Toggle,
}

impl std::str::FromStr for ThemeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toggle" => Ok(Self::Toggle),
            other => other.parse().map(Self::Set),
        }
    }
}

/// Show, set or toggle the persisted theme preference
pub fn handle_theme_command(action: ThemeAction) -> Result<()> {
    let mut settings = Settings::load_default();
    let theme = match action {
        ThemeAction::Show => settings.theme(),
        ThemeAction::Set(theme) => {
            settings.set_theme(theme).context("Failed to save theme")?;
            theme
        }
        ThemeAction::Toggle => settings.toggle_theme().context("Failed to save theme")?,
    };

    ui::print_info(&format!("Theme: {theme}"));
    if let Some(path) = settings.path() {
        log_debug!("Settings file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_action_parsing() {
        assert_eq!("toggle".parse::<ThemeAction>(), Ok(ThemeAction::Toggle));
        assert_eq!(
            "Light".parse::<ThemeAction>(),
            Ok(ThemeAction::Set(ThemePreference::Light))
        );
        assert!("sepia".parse::<ThemeAction>().is_err());
    }
}
