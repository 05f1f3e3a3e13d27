//! Try-On Studio - AI virtual try-on in the terminal
//!
//! Load a photo of a model and pictures of clothing, pick a few items, and
//! have an image model render the model wearing them.

// Allow certain clippy warnings that are either stylistic or from external dependencies
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine
#![allow(clippy::missing_errors_doc)] // Error types document themselves
#![allow(clippy::must_use_candidate)] // Getters everywhere

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod gemini;
pub mod image_ref;
pub mod ingest;
pub mod logger;
pub mod messages;
pub mod settings;
pub mod store;
pub mod tui;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use config::Config;
pub use error::{GenerationError, Result, StudioError, ValidationError};
pub use image_ref::ImageRef;
pub use store::{ClothingItem, ItemId, StudioStore, WardrobeStore};
