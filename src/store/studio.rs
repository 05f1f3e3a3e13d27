//! Studio store: the model image and the latest composite.

use crate::image_ref::ImageRef;

#[derive(Debug, Default)]
pub struct StudioStore {
    model_image: Option<ImageRef>,
    generated_image: Option<ImageRef>,
    /// Bumped on every model change so late results can be recognised
    model_revision: u64,
}

impl StudioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the model image. Any composite made from the old one is dropped.
    pub fn set_model_image(&mut self, image: ImageRef) {
        self.model_image = Some(image);
        self.generated_image = None;
        self.model_revision += 1;
    }

    pub fn set_generated_image(&mut self, image: ImageRef) {
        self.generated_image = Some(image);
    }

    pub fn clear_generated(&mut self) {
        self.generated_image = None;
    }

    pub fn model_image(&self) -> Option<&ImageRef> {
        self.model_image.as_ref()
    }

    pub fn generated_image(&self) -> Option<&ImageRef> {
        self.generated_image.as_ref()
    }

    pub fn has_model(&self) -> bool {
        self.model_image.is_some()
    }

    pub fn model_revision(&self) -> u64 {
        self.model_revision
    }

    /// What the viewer shows: the composite when there is one, else the model
    pub fn display_image(&self) -> Option<&ImageRef> {
        self.generated_image.as_ref().or(self.model_image.as_ref())
    }
}
