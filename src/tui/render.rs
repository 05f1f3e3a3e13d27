//! Drawing the studio
//!
//! Images are not rasterized in the terminal; the viewer describes what is
//! on screen (model or composite, its size) and where composites were saved.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use regex::Regex;
use std::sync::LazyLock;
use unicode_width::UnicodeWidthStr;

use super::state::{InputPurpose, Modal, NotificationLevel, StudioState};
use super::theme::Palette;
use crate::gemini::prompts::capitalize_first;
use crate::store::ClothingItem;

static ARTICLE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^a (pair of )?").expect("valid article regex"));

/// Wardrobe card label: leading "a " / "a pair of " dropped, first letter capitalized
pub fn card_label(name: &str) -> String {
    capitalize_first(&ARTICLE_PREFIX.replace(name, ""))
}

pub fn render(frame: &mut Frame, state: &StudioState) {
    let palette = Palette::for_theme(state.settings.theme());
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let banner_height = if state.error.is_some() { 3 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(banner_height),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, rows[0], state, &palette);
    if let Some(error) = &state.error {
        render_error_banner(frame, rows[1], error, &palette);
    }

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[2]);
    render_wardrobe(frame, panels[0], state, &palette);
    render_viewer(frame, panels[1], state, &palette);

    render_status(frame, rows[3], state, &palette);
    render_modal(frame, state, &palette);
}

fn render_header(frame: &mut Frame, area: Rect, state: &StudioState, palette: &Palette) {
    let title = Line::from(vec![
        Span::styled(" 👗 Virtual Try-On Studio ", palette.title()),
        Span::styled(
            format!(" {} theme ", state.settings.theme()),
            palette.dimmed(),
        ),
    ]);
    let subtitle = Line::from(Span::styled(
        " Upload a model, build a wardrobe, and see the look come together",
        palette.dimmed(),
    ));
    frame.render_widget(Paragraph::new(vec![title, subtitle]), area);
}

fn render_error_banner(frame: &mut Frame, area: Rect, error: &str, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.error))
        .title(Span::styled(" Error ", palette.error()))
        .title_bottom(Line::from(Span::styled(" [x] dismiss ", palette.dimmed())).right_aligned());
    let banner = Paragraph::new(Span::styled(error, Style::default().fg(palette.error)))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(banner, area);
}

fn render_wardrobe(frame: &mut Frame, area: Rect, state: &StudioState, palette: &Palette) {
    let selected = state.wardrobe.selection_len();
    let title = Line::from(vec![
        Span::styled(" Your Wardrobe ", palette.title()),
        Span::styled(format!("{} items", state.wardrobe.len()), palette.count()),
        Span::styled(format!(" · {selected} selected "), palette.dimmed()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(palette.border(state.modal.is_none()));

    if state.wardrobe.is_empty() {
        let hint = if state.pending.clothing_upload {
            vec![Line::from(Span::styled("Loading clothing...", palette.warning()))]
        } else {
            vec![
                Line::from("Your wardrobe is empty."),
                Line::from(""),
                key_hint('u', "upload clothing", state.can_start_work(), palette),
                key_hint('g', "generate a random item", state.can_start_work(), palette),
                key_hint('d', "describe an item", state.can_start_work(), palette),
            ]
        };
        frame.render_widget(Paragraph::new(hint).block(block), area);
        return;
    }

    let items: Vec<ListItem> = state
        .wardrobe
        .items()
        .iter()
        .map(|item| wardrobe_row(item, state.wardrobe.is_selected(item.id), palette))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.cursor())
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(Some(state.cursor));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn wardrobe_row<'a>(item: &ClothingItem, selected: bool, palette: &Palette) -> ListItem<'a> {
    let (marker, style) = if selected {
        ("◉ ", palette.selected())
    } else {
        ("○ ", Style::default().fg(palette.text))
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, style),
        Span::styled(card_label(&item.name), style),
        Span::styled(format!("  {}", item.image.mime()), palette.dimmed()),
    ]))
}

fn render_viewer(frame: &mut Frame, area: Rect, state: &StudioState, palette: &Palette) {
    let block = Block::default()
        .title(Span::styled(" Your Model ", palette.title()))
        .borders(Borders::ALL)
        .border_style(palette.border(false));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();

    if state.studio.has_model() {
        let (showing, info) = if state.studio.generated_image().is_some() {
            ("Styled composite", state.composite_info.as_ref())
        } else {
            ("Model photo", state.model_info.as_ref())
        };
        lines.push(Line::from(vec![
            Span::styled("Showing: ", palette.dimmed()),
            Span::styled(showing, Style::default().fg(palette.focus).add_modifier(Modifier::BOLD)),
        ]));
        if let Some(info) = info {
            lines.push(Line::from(Span::styled(info.to_string(), palette.dimmed())));
        }
        if let Some(path) = &state.last_saved {
            lines.push(Line::from(vec![
                Span::styled("Saved to ", palette.dimmed()),
                Span::styled(path.display().to_string(), palette.success()),
            ]));
        }
    } else if state.pending.model_upload {
        lines.push(Line::from(Span::styled("Loading model image...", palette.warning())));
    } else {
        lines.push(Line::from("No model image yet."));
        lines.push(Line::from(Span::styled(
            "Load a full-body photo to start trying things on.",
            palette.dimmed(),
        )));
    }

    let selected: Vec<String> = state
        .wardrobe
        .selected_items()
        .iter()
        .map(|item| card_label(&item.name))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Wearing: ", palette.dimmed()),
        Span::styled(
            if selected.is_empty() {
                "nothing selected".to_string()
            } else {
                selected.join(", ")
            },
            Style::default().fg(palette.text),
        ),
    ]));

    lines.push(Line::from(""));
    if let Some((spinner, text, color, _)) = state.spinner.current() {
        lines.push(Line::from(vec![
            Span::styled(spinner, Style::default().fg(palette.accent)),
            Span::styled(text, Style::default().fg(color)),
        ]));
    }
    if let Some(status) = &state.item_status {
        lines.push(Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(status.color),
        )));
    }

    lines.push(Line::from(""));
    lines.push(key_hint('m', "upload model", state.can_load_model(), palette));
    lines.push(key_hint('t', "try it on", state.can_try_on(), palette));
    lines.push(key_hint(
        'c',
        "clear selection",
        state.can_clear_selection() && state.wardrobe.selection_len() > 0,
        palette,
    ));
    lines.push(key_hint(
        'X',
        "clear wardrobe",
        state.can_clear_selection() && !state.wardrobe.is_empty(),
        palette,
    ));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn key_hint<'a>(key: char, label: &'a str, enabled: bool, palette: &Palette) -> Line<'a> {
    if enabled {
        Line::from(vec![
            Span::styled(format!("[{key}] "), palette.key()),
            Span::styled(label, Style::default().fg(palette.text)),
        ])
    } else {
        Line::from(Span::styled(format!("[{key}] {label}"), palette.disabled()))
    }
}

fn render_status(frame: &mut Frame, area: Rect, state: &StudioState, palette: &Palette) {
    let left = if let Some(notification) = state.current_notification() {
        let style = match notification.level {
            NotificationLevel::Info => palette.dimmed(),
            NotificationLevel::Success => palette.success(),
            NotificationLevel::Warning => palette.warning(),
        };
        Span::styled(notification.message.clone(), style)
    } else {
        Span::styled(
            "[space] select  [t] try on  [T] theme  [?] help  [q] quit",
            palette.dimmed(),
        )
    };

    let right = Span::styled(
        if state.pending.generating() {
            "working…"
        } else {
            "ready"
        },
        palette.dimmed(),
    );

    let used = left.content.width() + right.content.width() + 2;
    let padding = usize::from(area.width).saturating_sub(used).max(1);
    let line = Line::from(vec![
        Span::raw(" "),
        left,
        Span::raw(" ".repeat(padding)),
        right,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Modals
// ═══════════════════════════════════════════════════════════════════════════════

fn render_modal(frame: &mut Frame, state: &StudioState, palette: &Palette) {
    let Some(modal) = &state.modal else {
        return;
    };
    let area = frame.area();

    let (modal_width, modal_height) = match modal {
        Modal::Input { .. } => (70.min(area.width.saturating_sub(4)), 7),
        Modal::ConfirmClearWardrobe => (54.min(area.width.saturating_sub(4)), 6),
        Modal::Help => (60.min(area.width.saturating_sub(4)), 20),
    };
    let modal_height = modal_height.min(area.height.saturating_sub(2));

    let x = (area.width.saturating_sub(modal_width)) / 2;
    let y = (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(x, y, modal_width, modal_height);

    frame.render_widget(Clear, modal_area);

    match modal {
        Modal::Input { purpose, buffer } => render_input(frame, modal_area, *purpose, buffer, palette),
        Modal::ConfirmClearWardrobe => render_confirm(frame, modal_area, state, palette),
        Modal::Help => render_help(frame, modal_area, palette),
    }
}

fn render_input(frame: &mut Frame, area: Rect, purpose: InputPurpose, buffer: &str, palette: &Palette) {
    let block = Block::default()
        .title(Span::styled(purpose.title(), palette.title()))
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .style(palette.base());
    let lines = vec![
        Line::from(Span::styled(purpose.hint(), palette.dimmed())),
        Line::from(""),
        Line::from(vec![
            Span::styled("› ", palette.key()),
            Span::styled(buffer, Style::default().fg(palette.text)),
            Span::styled("█", Style::default().fg(palette.focus)),
        ]),
        Line::from(""),
        Line::from(Span::styled("[enter] confirm  [esc] cancel", palette.dimmed())),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_confirm(frame: &mut Frame, area: Rect, state: &StudioState, palette: &Palette) {
    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(palette.warning())
        .style(palette.base());
    let lines = vec![
        Line::from(format!(
            "Remove all {} items from the wardrobe?",
            state.wardrobe.len()
        )),
        Line::from(""),
        Line::from(Span::styled("Press y to confirm, any other key to cancel", palette.dimmed())),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

const HELP_KEYS: &[(&str, &str)] = &[
    ("m", "Upload a model image"),
    ("u", "Upload clothing (paths, globs, URLs)"),
    ("g", "Generate a random item"),
    ("d", "Describe an item to generate"),
    ("↑/↓ j/k", "Move through the wardrobe"),
    ("space", "Select or deselect an item"),
    ("enter t", "Try the selection on"),
    ("c", "Clear selection and composite"),
    ("X", "Clear the wardrobe"),
    ("T", "Toggle light/dark theme"),
    ("x esc", "Dismiss the error"),
    ("?", "This help"),
    ("q", "Quit"),
];

fn render_help(frame: &mut Frame, area: Rect, palette: &Palette) {
    let block = Block::default()
        .title(Span::styled(" Keys ", palette.title()))
        .borders(Borders::ALL)
        .border_style(palette.border(true))
        .style(palette.base());
    let mut lines: Vec<Line> = HELP_KEYS
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>10}  "), palette.key()),
                Span::styled(*action, Style::default().fg(palette.text)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press any key to close", palette.dimmed())).alignment(Alignment::Center));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
