//! Wardrobe store: clothing items and the try-on selection.

use std::collections::BTreeSet;
use std::fmt;

use crate::image_ref::ImageRef;
use crate::ingest::UploadedImage;

/// Identifier of a clothing item, unique for the lifetime of a wardrobe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A clothing item. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClothingItem {
    pub id: ItemId,
    pub name: String,
    pub image: ImageRef,
}

/// Where a new item came from; decides where it lands in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Uploaded files are appended in arrival order
    Upload,
    /// AI-generated items go to the front so they are visible immediately
    Generated,
}

/// Clothing items plus the set of selected identifiers
#[derive(Debug, Default)]
pub struct WardrobeStore {
    items: Vec<ClothingItem>,
    selected: BTreeSet<ItemId>,
    next_id: u64,
}

impl WardrobeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    /// Add one item, placing it according to its origin
    pub fn add(&mut self, name: impl Into<String>, image: ImageRef, origin: ItemOrigin) -> ItemId {
        let item = ClothingItem {
            id: self.allocate_id(),
            name: name.into(),
            image,
        };
        let id = item.id;
        match origin {
            ItemOrigin::Upload => self.items.push(item),
            ItemOrigin::Generated => self.items.insert(0, item),
        }
        id
    }

    /// Append a batch of uploads in order
    pub fn add_uploaded(&mut self, uploads: Vec<UploadedImage>) -> Vec<ItemId> {
        uploads
            .into_iter()
            .map(|u| self.add(u.name, u.image, ItemOrigin::Upload))
            .collect()
    }

    /// Prepend a generated item
    pub fn add_generated(&mut self, name: impl Into<String>, image: ImageRef) -> ItemId {
        self.add(name, image, ItemOrigin::Generated)
    }

    /// Remove every item. The selection goes with them.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected.clear();
    }

    /// Flip selection membership. Returns whether the item is now selected.
    ///
    /// Identifiers not present in the wardrobe are ignored.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&ClothingItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn selection(&self) -> &BTreeSet<ItemId> {
        &self.selected
    }

    /// Selected items in wardrobe order
    pub fn selected_items(&self) -> Vec<&ClothingItem> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Select every item, used by the headless try-on command
    pub fn select_all(&mut self) {
        self.selected = self.items.iter().map(|item| item.id).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageRef {
        ImageRef::from_bytes("image/png", b"png")
    }

    #[test]
    fn test_uploads_append_and_generated_prepend() {
        let mut wardrobe = WardrobeStore::new();
        let first = wardrobe.add("jacket", image(), ItemOrigin::Upload);
        let second = wardrobe.add("jeans", image(), ItemOrigin::Upload);
        let generated = wardrobe.add_generated("A red scarf", image());

        let ids: Vec<ItemId> = wardrobe.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![generated, first, second]);
    }

    #[test]
    fn test_ids_are_never_reused_after_clear() {
        let mut wardrobe = WardrobeStore::new();
        let before = wardrobe.add("a", image(), ItemOrigin::Upload);
        wardrobe.clear();
        let after = wardrobe.add("b", image(), ItemOrigin::Upload);
        assert!(after > before);
    }

    #[test]
    fn test_toggle_ignores_unknown_ids() {
        let mut wardrobe = WardrobeStore::new();
        let id = wardrobe.add("a", image(), ItemOrigin::Upload);
        wardrobe.clear();
        assert!(!wardrobe.toggle(id));
        assert_eq!(wardrobe.selection_len(), 0);
    }

    #[test]
    fn test_selected_items_follow_wardrobe_order() {
        let mut wardrobe = WardrobeStore::new();
        let a = wardrobe.add("a", image(), ItemOrigin::Upload);
        let b = wardrobe.add("b", image(), ItemOrigin::Upload);
        wardrobe.toggle(b);
        wardrobe.toggle(a);
        let names: Vec<&str> = wardrobe
            .selected_items()
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
