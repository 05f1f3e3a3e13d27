use std::time::{Duration, Instant};

use ratatui::style::Color;
use unicode_width::UnicodeWidthStr;

use super::STATUS_ROTATION;
use crate::messages::{ColoredMessage, styling_message};

const FRAMES: [char; 10] = ['✦', '✧', '✶', '✷', '✸', '✹', '✺', '✻', '✼', '✽'];

/// Spinner plus rotating status text shown while a try-on is in flight
#[derive(Debug, Default)]
pub struct StatusSpinner {
    current_frame: usize,
    started: Option<Instant>,
}

impl StatusSpinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.current_frame = 0;
        self.started = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.started = None;
    }

    pub fn is_active(&self) -> bool {
        self.started.is_some()
    }

    /// Advance one animation frame
    pub fn tick(&mut self) {
        if self.is_active() {
            self.current_frame = (self.current_frame + 1) % FRAMES.len();
        }
    }

    pub fn frame(&self) -> char {
        FRAMES[self.current_frame]
    }

    /// Status message for a try-on that has been running for `elapsed`
    pub fn message_for(elapsed: Duration) -> ColoredMessage {
        let step = elapsed.as_millis() / STATUS_ROTATION.as_millis();
        styling_message(usize::try_from(step).unwrap_or(usize::MAX))
    }

    /// Spinner glyph, message text, color and display width
    pub fn current(&self) -> Option<(String, String, Color, usize)> {
        let started = self.started?;
        let message = Self::message_for(started.elapsed());
        let spinner_with_space = format!("{} ", self.frame());
        let width = spinner_with_space.width() + message.text.width();
        Some((spinner_with_space, message.text, message.color, width))
    }
}
