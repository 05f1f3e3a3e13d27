use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use ratatui::style::Color;
use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

/// Electric Purple #e135ff — titles, importance
pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255);
/// Neon Cyan #80ffea — interactions, focus
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234);
/// Coral #ff6ac1 — counts, constants
pub const CORAL: Color = Color::Rgb(255, 106, 193);
/// Electric Yellow #f1fa8c — warnings, attention
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140);
/// Success Green #50fa7b — success states, selections
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123);
/// Error Red #ff6363 — errors, danger
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99);
/// Deep Purple #bd93f9 — accents
pub const DEEP_PURPLE: Color = Color::Rgb(189, 147, 249);

pub const NEBULA_PURPLE: Color = DEEP_PURPLE;
pub const CELESTIAL_BLUE: Color = NEON_CYAN;
pub const SOLAR_YELLOW: Color = ELECTRIC_YELLOW;
pub const AURORA_GREEN: Color = SUCCESS_GREEN;
pub const PLASMA_CYAN: Color = NEON_CYAN;
pub const GALAXY_PINK: Color = CORAL;

/// Track quiet mode state
static QUIET_MODE: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));

/// Enable or disable quiet mode
pub fn set_quiet_mode(enabled: bool) {
    let mut quiet_mode = QUIET_MODE.lock();
    *quiet_mode = enabled;
}

/// Check if quiet mode is enabled
pub fn is_quiet_mode() -> bool {
    *QUIET_MODE.lock()
}

pub fn create_spinner(message: &str) -> ProgressBar {
    if is_quiet_mode() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("✦✧✶✷✸✹✺✻✼✽")
        .template("{spinner:.magenta} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spinner that cycles through the styling messages while a try-on runs
pub fn create_styling_spinner() -> ProgressBar {
    let pb = create_spinner(&crate::messages::styling_message(0).text);
    if pb.is_hidden() {
        return pb;
    }

    let rotating = pb.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(crate::tui::STATUS_ROTATION);
        interval.tick().await;
        let mut index = 1;
        while !rotating.is_finished() {
            interval.tick().await;
            rotating.set_message(crate::messages::styling_message(index).text);
            index += 1;
        }
    });
    pb
}

pub fn print_info(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.cyan().bold());
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.yellow().bold());
    }
}

pub fn print_error(message: &str) {
    // Always print errors, even in quiet mode
    eprintln!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.green().bold());
    }
}

pub fn print_version(version: &str) {
    if !is_quiet_mode() {
        println!(
            "{} {} {}",
            "👗 Try-On Studio".magenta().bold(),
            "version".cyan(),
            version.green()
        );
    }
}
