//! Pure reducer for the studio
//!
//! All state transitions happen here. No I/O and no async: anything that
//! touches files or the network is returned as a [`SideEffect`] for the app
//! to run, and its outcome comes back as another [`StudioEvent`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::events::{ItemKind, ItemRequest, SideEffect, StudioEvent};
use super::state::{InputPurpose, Modal, Notification, RequestToken, StudioState};
use crate::error::{StudioError, ValidationError};
use crate::gemini::GeneratedItem;
use crate::image_ref::ImageRef;
use crate::ingest::{BatchIngest, UploadedImage};
use crate::messages::item_generation_message;
use crate::store::prepare_try_on;
use crate::{log_debug, log_info, log_warn};

/// Reducer: (state, event) → effects
#[allow(clippy::too_many_lines)]
pub fn reduce(state: &mut StudioState, event: StudioEvent) -> Vec<SideEffect> {
    let mut effects = Vec::new();

    if !matches!(event, StudioEvent::Tick) {
        state.mark_dirty();
    }

    match event {
        StudioEvent::KeyPressed(key) => {
            if let Some(next) = event_for_key(state, key) {
                effects.extend(reduce(state, next));
            }
        }

        // ─────────────────────────────────────────────────────────────────────
        // Uploads
        // ─────────────────────────────────────────────────────────────────────
        StudioEvent::LoadModel(input) => {
            let input = input.trim();
            if input.is_empty() || !state.can_load_model() {
                return effects;
            }
            state.error = None;
            state.pending.model_upload = true;
            effects.push(SideEffect::LoadModel(input.to_string()));
        }

        StudioEvent::LoadClothing(input) => {
            if input.trim().is_empty() || !state.can_start_work() {
                return effects;
            }
            state.error = None;
            state.pending.clothing_upload = true;
            effects.push(SideEffect::LoadClothing(input));
        }

        StudioEvent::ModelLoaded(result) => {
            state.pending.model_upload = false;
            match result {
                Ok(upload) => apply_model(state, upload),
                Err(e) => state.set_error(e),
            }
        }

        StudioEvent::ClothingLoaded(batch) => {
            state.pending.clothing_upload = false;
            apply_clothing(state, batch);
        }

        // ─────────────────────────────────────────────────────────────────────
        // Wardrobe
        // ─────────────────────────────────────────────────────────────────────
        StudioEvent::MoveCursor(delta) => state.move_cursor(delta),

        StudioEvent::ToggleAtCursor => {
            if let Some(id) = state.item_at_cursor().map(|item| item.id) {
                state.wardrobe.toggle(id);
            }
        }

        StudioEvent::ClearSelection => {
            if state.can_clear_selection() {
                state.wardrobe.clear_selection();
                state.studio.clear_generated();
                state.composite_info = None;
                state.last_saved = None;
                state.error = None;
            }
        }

        StudioEvent::RequestClearWardrobe => {
            if !state.wardrobe.is_empty() && state.can_clear_selection() {
                state.modal = Some(Modal::ConfirmClearWardrobe);
            }
        }

        StudioEvent::ClearWardrobe => {
            state.modal = None;
            if state.can_clear_selection() {
                let removed = state.wardrobe.len();
                state.wardrobe.clear();
                state.studio.clear_generated();
                state.composite_info = None;
                state.last_saved = None;
                state.error = None;
                state.cursor = 0;
                state.notify(Notification::info(format!("Removed {removed} items")));
            }
        }

        // ─────────────────────────────────────────────────────────────────────
        // Generation
        // ─────────────────────────────────────────────────────────────────────
        StudioEvent::TryOn => {
            if state.pending.generating() {
                return effects;
            }
            match prepare_try_on(&state.studio, &state.wardrobe) {
                Ok(request) => {
                    let token = state.next_token();
                    log_info!(
                        "Try-on #{} with {} items (model revision {})",
                        token.id,
                        request.items.len(),
                        token.model_revision
                    );
                    state.error = None;
                    state.pending.try_on = Some(token);
                    state.spinner.start();
                    effects.push(SideEffect::TryOn { token, request });
                }
                Err(e) => state.set_error(e),
            }
        }

        StudioEvent::TryOnFinished { token, result } => {
            apply_try_on(state, token, result, &mut effects);
        }

        StudioEvent::GenerateItem(request) => {
            if !state.can_start_work() {
                return effects;
            }
            if let ItemRequest::Described(description) = &request
                && description.trim().is_empty()
            {
                state.set_error(ValidationError::EmptyDescription);
                return effects;
            }
            state.error = None;
            match request.kind() {
                ItemKind::Random => state.pending.random_item = true,
                ItemKind::Described => state.pending.described_item = true,
            }
            state.item_status = Some(item_generation_message());
            effects.push(SideEffect::GenerateItem(request));
        }

        StudioEvent::ItemFinished { kind, result } => apply_item(state, kind, result),

        StudioEvent::CompositeSaved(result) => match result {
            Ok(path) => state.last_saved = Some(path),
            Err(e) => state.set_error(e),
        },

        // ─────────────────────────────────────────────────────────────────────
        // Chrome
        // ─────────────────────────────────────────────────────────────────────
        StudioEvent::ToggleTheme => {
            effects.push(SideEffect::SetTheme(state.settings.theme().toggled()));
        }

        StudioEvent::DismissError => state.error = None,
        StudioEvent::ShowHelp => state.modal = Some(Modal::Help),
        StudioEvent::Quit => effects.push(SideEffect::Quit),
        StudioEvent::Tick => state.tick(),
    }

    effects
}

fn apply_model(state: &mut StudioState, upload: UploadedImage) {
    state.model_info = upload.image.probe();
    state.studio.set_model_image(upload.image);
    state.composite_info = None;
    state.last_saved = None;
    state.error = None;
    state.notify(Notification::success(format!("Model loaded: {}", upload.name)));
}

fn apply_clothing(state: &mut StudioState, batch: BatchIngest) {
    if let Some(summary) = batch.error_summary() {
        state.set_error(summary);
    }
    let added = state.wardrobe.add_uploaded(batch.loaded).len();
    if added > 0 {
        let noun = if added == 1 { "item" } else { "items" };
        state.notify(Notification::success(format!("Added {added} {noun} to the wardrobe")));
    }
}

fn apply_try_on(
    state: &mut StudioState,
    token: RequestToken,
    result: Result<ImageRef, StudioError>,
    effects: &mut Vec<SideEffect>,
) {
    if state.pending.try_on.is_some_and(|pending| pending.id == token.id) {
        state.pending.try_on = None;
        state.spinner.stop();
    }

    let stale = token.model_revision != state.studio.model_revision();
    if stale && state.discard_stale_results {
        log_warn!(
            "Discarding try-on #{} made for model revision {} (now {})",
            token.id,
            token.model_revision,
            state.studio.model_revision()
        );
        state.notify(Notification::warning(
            "Discarded a try-on made for the previous model image",
        ));
        return;
    }

    match result {
        Ok(image) => {
            log_debug!("Try-on #{} produced {} bytes", token.id, image.byte_len());
            state.composite_info = image.probe();
            state.last_saved = None;
            state.studio.set_generated_image(image.clone());
            state.notify(Notification::success("Your new look is ready"));
            effects.push(SideEffect::SaveComposite(image));
        }
        Err(e) => state.set_error(e),
    }
}

fn apply_item(state: &mut StudioState, kind: ItemKind, result: Result<GeneratedItem, StudioError>) {
    match kind {
        ItemKind::Random => state.pending.random_item = false,
        ItemKind::Described => state.pending.described_item = false,
    }
    if !state.pending.item_generating() {
        state.item_status = None;
    }

    match result {
        Ok(item) => {
            state.notify(Notification::success(format!("Created {}", item.name)));
            state.wardrobe.add_generated(item.name, item.image);
            state.cursor = 0;
        }
        Err(e) => state.set_error(e),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key Handling
// ═══════════════════════════════════════════════════════════════════════════════

/// Translate a key into an event, editing modal input in place
fn event_for_key(state: &mut StudioState, key: KeyEvent) -> Option<StudioEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(StudioEvent::Quit);
    }

    match state.modal.take() {
        Some(Modal::Input {
            purpose,
            mut buffer,
        }) => {
            let event = match key.code {
                KeyCode::Esc => None,
                KeyCode::Enter => Some(submit_input(purpose, buffer)),
                KeyCode::Backspace => {
                    buffer.pop();
                    state.modal = Some(Modal::Input { purpose, buffer });
                    None
                }
                KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    state.modal = Some(Modal::Input {
                        purpose,
                        buffer: String::new(),
                    });
                    None
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    state.modal = Some(Modal::Input { purpose, buffer });
                    None
                }
                _ => {
                    state.modal = Some(Modal::Input { purpose, buffer });
                    None
                }
            };
            return event;
        }
        Some(Modal::ConfirmClearWardrobe) => {
            return match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(StudioEvent::ClearWardrobe),
                _ => None,
            };
        }
        // Any key closes help
        Some(Modal::Help) => return None,
        None => {}
    }

    match key.code {
        KeyCode::Char('q') => Some(StudioEvent::Quit),
        KeyCode::Char('?') => Some(StudioEvent::ShowHelp),
        KeyCode::Char('m') if state.can_load_model() => {
            open_input(state, InputPurpose::ModelPath);
            None
        }
        KeyCode::Char('u') if state.can_start_work() => {
            open_input(state, InputPurpose::ClothingPaths);
            None
        }
        KeyCode::Char('d') if state.can_start_work() => {
            open_input(state, InputPurpose::Description);
            None
        }
        KeyCode::Char('g') => Some(StudioEvent::GenerateItem(ItemRequest::Random)),
        KeyCode::Up | KeyCode::Char('k') => Some(StudioEvent::MoveCursor(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(StudioEvent::MoveCursor(1)),
        KeyCode::Home => Some(StudioEvent::MoveCursor(isize::MIN)),
        KeyCode::End => Some(StudioEvent::MoveCursor(isize::MAX)),
        KeyCode::Char(' ') => Some(StudioEvent::ToggleAtCursor),
        KeyCode::Enter | KeyCode::Char('t') => Some(StudioEvent::TryOn),
        KeyCode::Char('c') => Some(StudioEvent::ClearSelection),
        KeyCode::Char('X') => Some(StudioEvent::RequestClearWardrobe),
        KeyCode::Char('T') => Some(StudioEvent::ToggleTheme),
        KeyCode::Char('x') | KeyCode::Esc => Some(StudioEvent::DismissError),
        _ => None,
    }
}

fn open_input(state: &mut StudioState, purpose: InputPurpose) {
    state.modal = Some(Modal::Input {
        purpose,
        buffer: String::new(),
    });
}

fn submit_input(purpose: InputPurpose, buffer: String) -> StudioEvent {
    match purpose {
        InputPurpose::ModelPath => StudioEvent::LoadModel(buffer),
        InputPurpose::ClothingPaths => StudioEvent::LoadClothing(buffer),
        InputPurpose::Description => StudioEvent::GenerateItem(ItemRequest::Described(buffer)),
    }
}
