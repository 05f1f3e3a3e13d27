//! State for the studio
//!
//! Owns both stores plus everything the screen needs that is not part of the
//! session data: cursor, modal, banner, in-flight flags and notifications.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::spinner::StatusSpinner;
use crate::config::Config;
use crate::image_ref::ImageInfo;
use crate::messages::ColoredMessage;
use crate::settings::Settings;
use crate::store::{ClothingItem, StudioStore, WardrobeStore};

// ═══════════════════════════════════════════════════════════════════════════════
// Notifications
// ═══════════════════════════════════════════════════════════════════════════════

/// Notification severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
}

/// Short-lived message in the status bar; errors go to the banner instead
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: Instant,
}

impl Notification {
    fn with_level(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            timestamp: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Warning)
    }

    /// Check if this notification has expired (older than 5 seconds)
    pub fn is_expired(&self) -> bool {
        self.timestamp.elapsed() > Duration::from_secs(5)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// In-flight Work
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifies one try-on and the model image it was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub id: u64,
    pub model_revision: u64,
}

/// What is currently running in the background
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Pending {
    pub try_on: Option<RequestToken>,
    pub random_item: bool,
    pub described_item: bool,
    pub model_upload: bool,
    pub clothing_upload: bool,
}

impl Pending {
    /// Any call to the generation service
    pub fn generating(&self) -> bool {
        self.try_on.is_some() || self.random_item || self.described_item
    }

    pub fn item_generating(&self) -> bool {
        self.random_item || self.described_item
    }

    pub fn loading_files(&self) -> bool {
        self.model_upload || self.clothing_upload
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Modals
// ═══════════════════════════════════════════════════════════════════════════════

/// What a text prompt is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    ModelPath,
    ClothingPaths,
    Description,
}

impl InputPurpose {
    pub fn title(self) -> &'static str {
        match self {
            Self::ModelPath => " Upload Model ",
            Self::ClothingPaths => " Upload Clothing ",
            Self::Description => " Describe an Item ",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::ModelPath => "Path or URL of a photo of your model",
            Self::ClothingPaths => "Paths, globs or URLs separated by spaces",
            Self::Description => "e.g. a red silk dress",
        }
    }
}

/// Overlay currently capturing keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Input {
        purpose: InputPurpose,
        buffer: String,
    },
    ConfirmClearWardrobe,
    Help,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Studio State
// ═══════════════════════════════════════════════════════════════════════════════

pub struct StudioState {
    pub wardrobe: WardrobeStore,
    pub studio: StudioStore,
    pub settings: Settings,

    /// Highlighted row in the wardrobe list
    pub cursor: usize,
    pub modal: Option<Modal>,

    /// Banner text; only the most recent failure is kept
    pub error: Option<String>,
    pub notifications: VecDeque<Notification>,

    pub pending: Pending,
    pub spinner: StatusSpinner,
    /// Status line while a clothing item is being generated
    pub item_status: Option<ColoredMessage>,

    pub model_info: Option<ImageInfo>,
    pub composite_info: Option<ImageInfo>,
    /// Where the current composite was exported
    pub last_saved: Option<PathBuf>,

    /// Drop try-on results that were made for a replaced model image
    pub discard_stale_results: bool,

    next_request_id: u64,
    dirty: bool,
}

impl StudioState {
    pub fn new(config: &Config, settings: Settings) -> Self {
        Self {
            wardrobe: WardrobeStore::new(),
            studio: StudioStore::new(),
            settings,
            cursor: 0,
            modal: None,
            error: None,
            notifications: VecDeque::new(),
            pending: Pending::default(),
            spinner: StatusSpinner::new(),
            item_status: None,
            model_info: None,
            composite_info: None,
            last_saved: None,
            discard_stale_results: config.discard_stale_results,
            next_request_id: 1,
            dirty: true,
        }
    }

    /// Model present, something selected and nothing generating
    pub fn can_try_on(&self) -> bool {
        self.studio.has_model() && self.wardrobe.selection_len() > 0 && !self.pending.generating()
    }

    /// Clothing uploads and item generation are blocked while any generation runs
    pub fn can_start_work(&self) -> bool {
        !self.pending.generating()
    }

    /// The model can be swapped at any time, one upload at a time
    pub fn can_load_model(&self) -> bool {
        !self.pending.model_upload
    }

    pub fn can_clear_selection(&self) -> bool {
        !self.pending.generating() && !self.pending.loading_files()
    }

    pub fn next_token(&mut self) -> RequestToken {
        let token = RequestToken {
            id: self.next_request_id,
            model_revision: self.studio.model_revision(),
        };
        self.next_request_id += 1;
        token
    }

    pub fn item_at_cursor(&self) -> Option<&ClothingItem> {
        self.wardrobe.items().get(self.cursor)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.wardrobe.len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    pub fn set_error(&mut self, message: impl std::fmt::Display) {
        self.error = Some(message.to_string());
        self.dirty = true;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > 5 {
            self.notifications.pop_front();
        }
        self.dirty = true;
    }

    /// Get the current notification (most recent non-expired)
    pub fn current_notification(&self) -> Option<&Notification> {
        self.notifications.iter().rev().find(|n| !n.is_expired())
    }

    fn cleanup_notifications(&mut self) {
        let had_notifications = !self.notifications.is_empty();
        self.notifications.retain(|n| !n.is_expired());
        if had_notifications && self.notifications.is_empty() {
            self.dirty = true;
        }
    }

    /// Mark state as dirty (needs redraw)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check and clear dirty flag
    pub fn check_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    /// Advance animations and expire notifications
    pub fn tick(&mut self) {
        self.spinner.tick();
        self.cleanup_notifications();

        if self.spinner.is_active() || self.item_status.is_some() {
            self.dirty = true;
        }
    }
}
