//! Tests for the reducer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::error::{GenerationError, StudioError};
use crate::gemini::GeneratedItem;
use crate::image_ref::ImageRef;
use crate::ingest::{BatchIngest, UploadedImage};
use crate::settings::{Settings, ThemePreference};
use crate::tui::events::{ItemKind, ItemRequest, SideEffect, StudioEvent};
use crate::tui::reducer::reduce;
use crate::tui::state::{Modal, NotificationLevel, RequestToken, StudioState};

fn test_state() -> StudioState {
    StudioState::new(&Config::default(), Settings::in_memory(ThemePreference::Dark))
}

fn png(tag: &str) -> ImageRef {
    ImageRef::from_bytes("image/png", format!("\u{89}PNG-{tag}").as_bytes())
}

fn upload(name: &str) -> UploadedImage {
    UploadedImage {
        name: name.to_string(),
        image: png(name),
    }
}

fn key(code: KeyCode) -> StudioEvent {
    StudioEvent::KeyPressed(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Model loaded, one item in the wardrobe and selected
fn ready_state() -> StudioState {
    let mut state = test_state();
    let _ = reduce(&mut state, StudioEvent::ModelLoaded(Ok(upload("model"))));
    let ids = state.wardrobe.add_uploaded(vec![upload("jacket")]);
    state.wardrobe.toggle(ids[0]);
    state
}

fn start_try_on(state: &mut StudioState) -> RequestToken {
    let effects = reduce(state, StudioEvent::TryOn);
    match effects.as_slice() {
        [SideEffect::TryOn { token, .. }] => *token,
        other => panic!("expected a single try-on effect, got {other:?}"),
    }
}

#[test]
fn test_try_on_without_model_is_rejected() {
    let mut state = test_state();
    let ids = state.wardrobe.add_uploaded(vec![upload("jacket")]);
    state.wardrobe.toggle(ids[0]);

    let effects = reduce(&mut state, StudioEvent::TryOn);

    assert!(effects.is_empty());
    assert_eq!(state.error.as_deref(), Some("Please upload a model image first."));
    assert!(state.pending.try_on.is_none());
    assert_eq!(state.wardrobe.len(), 1);
    assert_eq!(state.wardrobe.selection_len(), 1);
}

#[test]
fn test_try_on_without_selection_is_rejected() {
    let mut state = test_state();
    let _ = reduce(&mut state, StudioEvent::ModelLoaded(Ok(upload("model"))));
    state.wardrobe.add_uploaded(vec![upload("jacket")]);

    let effects = reduce(&mut state, StudioEvent::TryOn);

    assert!(effects.is_empty());
    assert_eq!(
        state.error.as_deref(),
        Some("Please select at least one item to try on.")
    );
}

#[test]
fn test_in_flight_try_on_blocks_other_generation() {
    let mut state = ready_state();
    assert!(state.can_try_on());
    let _ = start_try_on(&mut state);

    assert!(!state.can_try_on());
    assert!(reduce(&mut state, StudioEvent::TryOn).is_empty());
    assert!(reduce(&mut state, StudioEvent::GenerateItem(ItemRequest::Random)).is_empty());
    assert!(reduce(&mut state, StudioEvent::LoadClothing("more.png".into())).is_empty());
    assert!(!state.pending.random_item);
}

#[test]
fn test_successful_try_on_sets_composite_and_saves() {
    let mut state = ready_state();
    let token = start_try_on(&mut state);

    let effects = reduce(
        &mut state,
        StudioEvent::TryOnFinished {
            token,
            result: Ok(png("composite")),
        },
    );

    assert!(state.pending.try_on.is_none());
    assert!(!state.spinner.is_active());
    assert_eq!(state.studio.generated_image(), Some(&png("composite")));
    assert!(matches!(effects.as_slice(), [SideEffect::SaveComposite(_)]));
}

#[test]
fn test_failed_try_on_releases_flag_and_keeps_prior_composite() {
    let mut state = ready_state();
    state.studio.set_generated_image(png("earlier"));
    let token = start_try_on(&mut state);

    let effects = reduce(
        &mut state,
        StudioEvent::TryOnFinished {
            token,
            result: Err(StudioError::from(GenerationError::NoImage(
                "Failed to generate the styled image. The service returned no image.",
            ))),
        },
    );

    assert!(effects.is_empty());
    assert!(state.pending.try_on.is_none());
    assert_eq!(state.studio.generated_image(), Some(&png("earlier")));
    assert!(state.error.as_deref().is_some_and(|e| e.contains("no image")));
}

#[test]
fn test_stale_try_on_is_discarded_by_default() {
    let mut state = ready_state();
    let token = start_try_on(&mut state);

    // Model swapped while the request is out
    let _ = reduce(&mut state, StudioEvent::ModelLoaded(Ok(upload("other-model"))));
    let effects = reduce(
        &mut state,
        StudioEvent::TryOnFinished {
            token,
            result: Ok(png("old-composite")),
        },
    );

    assert!(effects.is_empty());
    assert!(state.pending.try_on.is_none());
    assert!(state.studio.generated_image().is_none());
    assert_eq!(state.studio.model_image(), Some(&png("other-model")));
    assert_eq!(
        state.current_notification().map(|n| n.level),
        Some(NotificationLevel::Warning)
    );
}

#[test]
fn test_model_can_be_replaced_during_try_on() {
    let mut state = ready_state();
    let token = start_try_on(&mut state);

    let _ = reduce(&mut state, key(KeyCode::Char('m')));
    assert!(matches!(state.modal, Some(Modal::Input { .. })));
    for c in "new.png".chars() {
        let _ = reduce(&mut state, key(KeyCode::Char(c)));
    }
    let effects = reduce(&mut state, key(KeyCode::Enter));
    assert!(matches!(
        effects.as_slice(),
        [SideEffect::LoadModel(path)] if path == "new.png"
    ));
    assert!(state.pending.try_on.is_some());

    let _ = reduce(&mut state, StudioEvent::ModelLoaded(Ok(upload("new"))));
    assert!(!state.pending.model_upload);
    let effects = reduce(
        &mut state,
        StudioEvent::TryOnFinished {
            token,
            result: Ok(png("old-composite")),
        },
    );

    assert!(effects.is_empty());
    assert!(state.pending.try_on.is_none());
    assert!(state.studio.generated_image().is_none());
    assert_eq!(state.studio.model_image(), Some(&png("new")));
}

#[test]
fn test_second_model_upload_waits_for_first() {
    let mut state = test_state();
    let first = reduce(&mut state, StudioEvent::LoadModel("a.png".into()));
    assert_eq!(first.len(), 1);

    assert!(reduce(&mut state, StudioEvent::LoadModel("b.png".into())).is_empty());
    let _ = reduce(&mut state, key(KeyCode::Char('m')));
    assert!(state.modal.is_none());
}

#[test]
fn test_stale_try_on_applies_when_discard_disabled() {
    let mut state = ready_state();
    state.discard_stale_results = false;
    let token = start_try_on(&mut state);

    let _ = reduce(&mut state, StudioEvent::ModelLoaded(Ok(upload("other-model"))));
    let _ = reduce(
        &mut state,
        StudioEvent::TryOnFinished {
            token,
            result: Ok(png("old-composite")),
        },
    );

    assert!(state.pending.try_on.is_none());
    assert_eq!(state.studio.generated_image(), Some(&png("old-composite")));
}

#[test]
fn test_space_twice_restores_selection() {
    let mut state = test_state();
    state.wardrobe.add_uploaded(vec![upload("jacket"), upload("jeans")]);
    let before = state.wardrobe.selection().clone();

    let _ = reduce(&mut state, key(KeyCode::Char(' ')));
    assert_eq!(state.wardrobe.selection_len(), 1);
    let _ = reduce(&mut state, key(KeyCode::Char(' ')));

    assert_eq!(state.wardrobe.selection(), &before);
}

#[test]
fn test_cursor_stays_in_bounds() {
    let mut state = test_state();
    state.wardrobe.add_uploaded(vec![upload("a"), upload("b")]);

    let _ = reduce(&mut state, key(KeyCode::Up));
    assert_eq!(state.cursor, 0);
    for _ in 0..5 {
        let _ = reduce(&mut state, key(KeyCode::Char('j')));
    }
    assert_eq!(state.cursor, 1);
}

#[test]
fn test_clear_wardrobe_needs_confirmation() {
    let mut state = ready_state();
    state.studio.set_generated_image(png("composite"));

    let _ = reduce(&mut state, key(KeyCode::Char('X')));
    assert_eq!(state.modal, Some(Modal::ConfirmClearWardrobe));

    let _ = reduce(&mut state, key(KeyCode::Char('y')));

    assert!(state.modal.is_none());
    assert!(state.wardrobe.is_empty());
    assert_eq!(state.wardrobe.selection_len(), 0);
    assert!(state.studio.generated_image().is_none());
    assert!(state.studio.has_model());
}

#[test]
fn test_clear_wardrobe_dismisses_error() {
    let mut state = ready_state();
    state.set_error("Failed to load coat.png: not a valid image");

    let _ = reduce(&mut state, key(KeyCode::Char('X')));
    let _ = reduce(&mut state, key(KeyCode::Enter));

    assert!(state.wardrobe.is_empty());
    assert!(state.error.is_none());
}

#[test]
fn test_clear_wardrobe_cancelled() {
    let mut state = ready_state();
    let _ = reduce(&mut state, key(KeyCode::Char('X')));
    let _ = reduce(&mut state, key(KeyCode::Char('n')));

    assert!(state.modal.is_none());
    assert_eq!(state.wardrobe.len(), 1);
}

#[test]
fn test_clear_selection_resets_composite() {
    let mut state = ready_state();
    state.studio.set_generated_image(png("composite"));

    let _ = reduce(&mut state, key(KeyCode::Char('c')));

    assert_eq!(state.wardrobe.selection_len(), 0);
    assert!(state.studio.generated_image().is_none());
    assert_eq!(state.studio.display_image(), Some(&png("model")));
}

#[test]
fn test_batch_errors_accumulate_in_banner() {
    let mut state = test_state();
    let _ = reduce(&mut state, StudioEvent::LoadClothing("*.png".into()));
    assert!(state.pending.clothing_upload);

    let batch = BatchIngest {
        loaded: vec![upload("jacket")],
        failures: vec![
            StudioError::ingestion("broken.png", "file is empty"),
            StudioError::ingestion("notes.txt", "unsupported image format"),
        ],
    };
    let _ = reduce(&mut state, StudioEvent::ClothingLoaded(batch));

    assert!(!state.pending.clothing_upload);
    assert_eq!(state.wardrobe.len(), 1);
    let banner = state.error.as_deref().unwrap_or_default();
    assert!(banner.contains("broken.png"));
    assert!(banner.contains("notes.txt"));
}

#[test]
fn test_new_error_replaces_old_one() {
    let mut state = test_state();
    let _ = reduce(&mut state, StudioEvent::TryOn);
    let _ = reduce(
        &mut state,
        StudioEvent::ModelLoaded(Err(StudioError::ingestion("me.png", "file is empty"))),
    );

    assert_eq!(
        state.error.as_deref(),
        Some("Failed to load me.png: file is empty")
    );

    let _ = reduce(&mut state, key(KeyCode::Char('x')));
    assert!(state.error.is_none());
}

#[test]
fn test_empty_description_is_rejected() {
    let mut state = test_state();
    let effects = reduce(
        &mut state,
        StudioEvent::GenerateItem(ItemRequest::Described("   ".into())),
    );

    assert!(effects.is_empty());
    assert!(!state.pending.described_item);
    assert_eq!(
        state.error.as_deref(),
        Some("Please enter a description for the clothing item.")
    );
}

#[test]
fn test_generated_item_is_prepended() {
    let mut state = test_state();
    state.wardrobe.add_uploaded(vec![upload("jacket")]);

    let effects = reduce(&mut state, StudioEvent::GenerateItem(ItemRequest::Random));
    assert!(matches!(
        effects.as_slice(),
        [SideEffect::GenerateItem(ItemRequest::Random)]
    ));
    assert!(state.item_status.is_some());

    let _ = reduce(
        &mut state,
        StudioEvent::ItemFinished {
            kind: ItemKind::Random,
            result: Ok(GeneratedItem {
                name: "A black leather biker jacket".into(),
                image: png("biker"),
            }),
        },
    );

    assert!(!state.pending.random_item);
    assert!(state.item_status.is_none());
    assert_eq!(state.wardrobe.items()[0].name, "A black leather biker jacket");
    assert_eq!(state.wardrobe.items()[1].name, "jacket");
}

#[test]
fn test_failed_item_generation_releases_flag() {
    let mut state = test_state();
    let _ = reduce(
        &mut state,
        StudioEvent::GenerateItem(ItemRequest::Described("a red silk dress".into())),
    );
    assert!(state.pending.described_item);

    let _ = reduce(
        &mut state,
        StudioEvent::ItemFinished {
            kind: ItemKind::Described,
            result: Err(GenerationError::InvalidRequest.into()),
        },
    );

    assert!(!state.pending.described_item);
    assert!(state.wardrobe.is_empty());
    assert!(state.error.is_some());
}

#[test]
fn test_model_prompt_submits_typed_path() {
    let mut state = test_state();
    let _ = reduce(&mut state, key(KeyCode::Char('m')));
    for c in "me.png".chars() {
        let _ = reduce(&mut state, key(KeyCode::Char(c)));
    }
    let _ = reduce(&mut state, key(KeyCode::Backspace));
    let _ = reduce(&mut state, key(KeyCode::Char('g')));

    let effects = reduce(&mut state, key(KeyCode::Enter));

    assert!(state.modal.is_none());
    assert!(state.pending.model_upload);
    assert!(matches!(
        effects.as_slice(),
        [SideEffect::LoadModel(path)] if path == "me.png"
    ));
}

#[test]
fn test_escape_cancels_prompt() {
    let mut state = test_state();
    let _ = reduce(&mut state, key(KeyCode::Char('d')));
    let _ = reduce(&mut state, key(KeyCode::Char('x')));
    let effects = reduce(&mut state, key(KeyCode::Esc));

    assert!(effects.is_empty());
    assert!(state.modal.is_none());
    assert!(!state.pending.described_item);
}

#[test]
fn test_theme_toggle_requests_opposite_theme() {
    let mut state = test_state();
    let effects = reduce(&mut state, key(KeyCode::Char('T')));
    assert!(matches!(
        effects.as_slice(),
        [SideEffect::SetTheme(ThemePreference::Light)]
    ));
}

#[test]
fn test_quit() {
    let mut state = test_state();
    let effects = reduce(&mut state, key(KeyCode::Char('q')));
    assert!(matches!(effects.as_slice(), [SideEffect::Quit]));
}
