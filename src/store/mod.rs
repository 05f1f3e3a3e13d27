//! Session state: what is in the wardrobe and what is on the model.
//!
//! Both stores are plain owned data; the studio event loop is their only
//! writer.

mod studio;
mod wardrobe;

pub use studio::StudioStore;
pub use wardrobe::{ClothingItem, ItemId, ItemOrigin, WardrobeStore};

use crate::error::ValidationError;
use crate::image_ref::ImageRef;

/// Everything a styled-composite call needs, captured at request time
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub model_image: ImageRef,
    pub items: Vec<ClothingItem>,
    pub model_revision: u64,
}

/// Check the try-on preconditions and snapshot the inputs
///
/// Fails with [`ValidationError::MissingModelImage`] when no model is set and
/// with [`ValidationError::EmptySelection`] when nothing is selected. The
/// stores are not modified either way.
pub fn prepare_try_on(
    studio: &StudioStore,
    wardrobe: &WardrobeStore,
) -> Result<TryOnRequest, ValidationError> {
    let model_image = studio
        .model_image()
        .ok_or(ValidationError::MissingModelImage)?
        .clone();
    let items: Vec<ClothingItem> = wardrobe.selected_items().into_iter().cloned().collect();
    if items.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    Ok(TryOnRequest {
        model_image,
        items,
        model_revision: studio.model_revision(),
    })
}
