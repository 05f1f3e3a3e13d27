use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tryon_studio::gemini::GenerationClient;
use tryon_studio::store::{ItemOrigin, prepare_try_on};
use tryon_studio::{ImageRef, ItemId, StudioStore, ValidationError, WardrobeStore};

#[path = "test_utils.rs"]
mod test_utils;
use test_utils::{StubBackend, png_bytes};

fn image() -> ImageRef {
    ImageRef::from_bytes("image/png", &png_bytes())
}

fn assert_selection_within_wardrobe(wardrobe: &WardrobeStore) {
    for id in wardrobe.selection() {
        assert!(
            wardrobe.contains(*id),
            "selected {id} is not in the wardrobe"
        );
    }
}

#[test]
fn test_selection_stays_within_wardrobe() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut wardrobe = WardrobeStore::new();
    let mut seen: Vec<ItemId> = Vec::new();

    for step in 0..500 {
        match rng.random_range(0..10) {
            0..=3 => {
                let origin = if rng.random_bool(0.5) {
                    ItemOrigin::Upload
                } else {
                    ItemOrigin::Generated
                };
                seen.push(wardrobe.add(format!("item {step}"), image(), origin));
            }
            4..=7 if !seen.is_empty() => {
                let id = seen[rng.random_range(0..seen.len())];
                wardrobe.toggle(id);
            }
            8 => wardrobe.clear_selection(),
            9 if rng.random_bool(0.2) => wardrobe.clear(),
            _ => {}
        }
        assert_selection_within_wardrobe(&wardrobe);
        assert!(wardrobe.selection_len() <= wardrobe.len());
    }
}

#[test]
fn test_clear_wardrobe_empties_selection() {
    let mut wardrobe = WardrobeStore::new();
    let a = wardrobe.add("jacket", image(), ItemOrigin::Upload);
    let b = wardrobe.add("jeans", image(), ItemOrigin::Upload);
    wardrobe.toggle(a);
    wardrobe.toggle(b);

    wardrobe.clear();

    assert!(wardrobe.is_empty());
    assert_eq!(wardrobe.selection_len(), 0);
    assert!(!wardrobe.is_selected(a));
}

#[test]
fn test_toggle_twice_restores_selection() {
    let mut wardrobe = WardrobeStore::new();
    let a = wardrobe.add("jacket", image(), ItemOrigin::Upload);
    let b = wardrobe.add("jeans", image(), ItemOrigin::Upload);
    wardrobe.toggle(b);
    let before = wardrobe.selection().clone();

    assert!(wardrobe.toggle(a));
    assert!(!wardrobe.toggle(a));
    assert_eq!(wardrobe.selection(), &before);
}

#[test]
fn test_prepare_try_on_preconditions() {
    let mut studio = StudioStore::new();
    let mut wardrobe = WardrobeStore::new();
    let id = wardrobe.add("jacket", image(), ItemOrigin::Upload);

    // Missing model wins over an empty selection
    assert_eq!(
        prepare_try_on(&studio, &wardrobe).map(|_| ()),
        Err(ValidationError::MissingModelImage)
    );

    studio.set_model_image(image());
    assert_eq!(
        prepare_try_on(&studio, &wardrobe).map(|_| ()),
        Err(ValidationError::EmptySelection)
    );

    wardrobe.toggle(id);
    let request = prepare_try_on(&studio, &wardrobe).expect("Preconditions hold");
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].name, "jacket");
    assert_eq!(request.model_revision, studio.model_revision());
}

#[test]
fn test_prepare_try_on_keeps_wardrobe_order() {
    let mut studio = StudioStore::new();
    studio.set_model_image(image());
    let mut wardrobe = WardrobeStore::new();
    let jeans = wardrobe.add("jeans", image(), ItemOrigin::Upload);
    let scarf = wardrobe.add_generated("A red scarf", image());
    wardrobe.toggle(jeans);
    wardrobe.toggle(scarf);

    let request = prepare_try_on(&studio, &wardrobe).expect("Preconditions hold");
    let names: Vec<&str> = request.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["A red scarf", "jeans"]);
}

#[test]
fn test_new_model_drops_composite() {
    let mut studio = StudioStore::new();
    studio.set_model_image(image());
    let first_revision = studio.model_revision();
    studio.set_generated_image(ImageRef::from_bytes("image/png", b"composite"));
    assert_eq!(
        studio.display_image().map(ImageRef::payload),
        studio.generated_image().map(ImageRef::payload)
    );

    studio.set_model_image(image());
    assert!(studio.generated_image().is_none());
    assert!(studio.model_revision() > first_revision);
    assert_eq!(studio.display_image(), studio.model_image());
}

#[tokio::test]
async fn test_try_on_without_model_never_calls_service() {
    let backend = StubBackend::new(Vec::new());
    let client = GenerationClient::new(backend.clone(), "image-model", "text-model");
    let studio = StudioStore::new();
    let mut wardrobe = WardrobeStore::new();
    let id = wardrobe.add("jacket", image(), ItemOrigin::Upload);
    wardrobe.toggle(id);

    let outcome = match prepare_try_on(&studio, &wardrobe) {
        Ok(request) => client
            .generate_styled_image(&request.model_image, &request.items)
            .await
            .map(|_| ()),
        Err(e) => Err(e.into()),
    };

    assert_eq!(
        outcome.map_err(|e| e.to_string()),
        Err("Please upload a model image first.".to_string())
    );
    assert_eq!(backend.call_count(), 0);
}
