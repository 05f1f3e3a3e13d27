//! Events into the reducer and side effects out of it

use crossterm::event::KeyEvent;
use std::path::PathBuf;

use super::state::RequestToken;
use crate::error::StudioError;
use crate::gemini::GeneratedItem;
use crate::image_ref::ImageRef;
use crate::ingest::{BatchIngest, UploadedImage};
use crate::settings::ThemePreference;
use crate::store::TryOnRequest;

/// Which item generation a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Random,
    Described,
}

/// A request to create a new clothing item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRequest {
    Random,
    Described(String),
}

impl ItemRequest {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Random => ItemKind::Random,
            Self::Described(_) => ItemKind::Described,
        }
    }
}

/// Everything that can change studio state
#[derive(Debug)]
pub enum StudioEvent {
    // ─────────────────────────────────────────────────────────────────────────
    // User Input
    // ─────────────────────────────────────────────────────────────────────────
    KeyPressed(KeyEvent),
    /// Path or URL typed into the model prompt
    LoadModel(String),
    /// Paths, globs or URLs typed into the clothing prompt
    LoadClothing(String),
    MoveCursor(isize),
    ToggleAtCursor,
    ClearSelection,
    RequestClearWardrobe,
    ClearWardrobe,
    TryOn,
    GenerateItem(ItemRequest),
    ToggleTheme,
    DismissError,
    ShowHelp,
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // Task Results
    // ─────────────────────────────────────────────────────────────────────────
    ModelLoaded(Result<UploadedImage, StudioError>),
    ClothingLoaded(BatchIngest),
    TryOnFinished {
        token: RequestToken,
        result: Result<ImageRef, StudioError>,
    },
    ItemFinished {
        kind: ItemKind,
        result: Result<GeneratedItem, StudioError>,
    },
    CompositeSaved(Result<PathBuf, StudioError>),

    Tick,
}

/// Work the app performs after the reducer returns
#[derive(Debug)]
pub enum SideEffect {
    LoadModel(String),
    LoadClothing(String),
    TryOn {
        token: RequestToken,
        request: TryOnRequest,
    },
    GenerateItem(ItemRequest),
    SaveComposite(ImageRef),
    /// Apply and persist a theme preference
    SetTheme(ThemePreference),
    Quit,
}
