//! Try-On Studio terminal interface
//!
//! Wardrobe on the left, model viewer on the right. Key presses become
//! events for a pure reducer; file and network work runs in spawned tasks
//! whose results come back to the loop as events.

mod app;
mod events;
mod reducer;
mod render;
mod spinner;
mod state;
mod theme;

#[cfg(test)]
mod tests;

use std::time::Duration;

pub use app::{StudioApp, StudioLaunch, run_studio};
pub use events::{ItemKind, ItemRequest, SideEffect, StudioEvent};
pub use reducer::reduce;
pub use state::{InputPurpose, Modal, Notification, NotificationLevel, Pending, RequestToken, StudioState};

/// How long each status message stays up while a try-on runs
pub const STATUS_ROTATION: Duration = Duration::from_millis(2500);
