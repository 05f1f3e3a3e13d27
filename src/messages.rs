use crate::ui::{AURORA_GREEN, CELESTIAL_BLUE, GALAXY_PINK, NEBULA_PURPLE, PLASMA_CYAN, SOLAR_YELLOW};
use rand::prelude::*;
use ratatui::style::Color;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColoredMessage {
    pub text: String,
    pub color: Color,
}

impl ColoredMessage {
    fn new(text: &str, color: Color) -> Self {
        Self {
            text: text.to_string(),
            color,
        }
    }
}

/// Rotated in order while a try-on is running
const STYLING_MESSAGES: &[(&str, Color)] = &[
    ("Dressing the model...", NEBULA_PURPLE),
    ("Applying the latest fashion...", CELESTIAL_BLUE),
    ("Styling with AI magic...", GALAXY_PINK),
    ("This can take a moment...", SOLAR_YELLOW),
    ("Getting the perfect fit...", AURORA_GREEN),
    ("Almost ready for the runway...", PLASMA_CYAN),
];

const ITEM_MESSAGES: &[(&str, Color)] = &[
    ("✂️ Cutting fresh fabric...", GALAXY_PINK),
    ("🧵 Threading the needle...", NEBULA_PURPLE),
    ("📸 Setting up the product shot...", CELESTIAL_BLUE),
    ("🪡 Stitching the seams...", AURORA_GREEN),
    ("🎨 Picking this season's colors...", SOLAR_YELLOW),
];

/// Number of styling messages in the rotation
pub fn styling_message_count() -> usize {
    STYLING_MESSAGES.len()
}

/// Styling message at `index`, wrapping around
pub fn styling_message(index: usize) -> ColoredMessage {
    let (text, color) = STYLING_MESSAGES[index % STYLING_MESSAGES.len()];
    ColoredMessage::new(text, color)
}

/// A random message shown while a clothing item is being generated
pub fn item_generation_message() -> ColoredMessage {
    let mut rng = rand::rng();
    let (text, color) = ITEM_MESSAGES
        .choose(&mut rng)
        .copied()
        .unwrap_or(("Generating...", PLASMA_CYAN));
    ColoredMessage::new(text, color)
}
