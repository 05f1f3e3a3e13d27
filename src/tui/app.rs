//! Main application for the studio
//!
//! Event loop, task spawning and terminal setup.

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

use super::events::{ItemRequest, SideEffect, StudioEvent};
use super::reducer::reduce;
use super::render::render;
use super::state::{Notification, StudioState};
use crate::config::Config;
use crate::export::save_to_dir;
use crate::gemini::GenerationClient;
use crate::ingest::{expand_sources, ingest_batch, ingest_source};
use crate::settings::Settings;
use crate::{log_debug, log_error, log_info};

/// Files to load as soon as the studio opens
#[derive(Debug, Default, Clone)]
pub struct StudioLaunch {
    pub model: Option<String>,
    pub items: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Studio Application
// ═══════════════════════════════════════════════════════════════════════════════

pub struct StudioApp {
    /// Application state
    pub state: StudioState,
    client: GenerationClient,
    http: reqwest::Client,
    output_dir: PathBuf,
    /// Channel for receiving task results
    result_rx: mpsc::UnboundedReceiver<StudioEvent>,
    /// Sender cloned into every spawned task
    result_tx: mpsc::UnboundedSender<StudioEvent>,
}

impl StudioApp {
    pub fn new(config: &Config, settings: Settings, client: GenerationClient) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            state: StudioState::new(config, settings),
            client,
            http: reqwest::Client::new(),
            output_dir: config.output_dir.clone(),
            result_rx,
            result_tx,
        }
    }

    /// Feed an event through the reducer and run what it asks for
    pub fn dispatch(&mut self, event: StudioEvent) -> bool {
        let effects = reduce(&mut self.state, event);
        let mut keep_running = true;
        for effect in effects {
            if !self.execute(effect) {
                keep_running = false;
            }
        }
        keep_running
    }

    /// Run the TUI application
    pub fn run(&mut self, launch: StudioLaunch) -> Result<()> {
        if let Some(model) = launch.model {
            self.dispatch(StudioEvent::LoadModel(model));
        }
        if !launch.items.is_empty() {
            self.dispatch(StudioEvent::LoadClothing(launch.items.join(" ")));
        }

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Cleanup terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            // Check for completed tasks
            while let Ok(event) = self.result_rx.try_recv() {
                if !self.dispatch(event) {
                    return Ok(());
                }
            }

            // Render if dirty
            if self.state.check_dirty() {
                terminal.draw(|frame| render(frame, &self.state))?;
            }

            // Poll for events with timeout for animations
            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && !self.dispatch(StudioEvent::KeyPressed(key))
            {
                return Ok(());
            }

            self.dispatch(StudioEvent::Tick);
        }
    }

    /// Run one side effect; returns false when the studio should exit
    fn execute(&mut self, effect: SideEffect) -> bool {
        match effect {
            SideEffect::Quit => return false,

            SideEffect::LoadModel(source) => {
                let http = self.http.clone();
                let tx = self.result_tx.clone();
                tokio::spawn(async move {
                    let result = ingest_source(&http, &source).await;
                    let _ = tx.send(StudioEvent::ModelLoaded(result));
                });
            }

            SideEffect::LoadClothing(input) => {
                let http = self.http.clone();
                let tx = self.result_tx.clone();
                tokio::spawn(async move {
                    let (sources, pattern_errors) = expand_sources(&input);
                    let mut batch = ingest_batch(&http, &sources).await;
                    batch.failures.extend(pattern_errors);
                    let _ = tx.send(StudioEvent::ClothingLoaded(batch));
                });
            }

            SideEffect::TryOn { token, request } => {
                let client = self.client.clone();
                let tx = self.result_tx.clone();
                tokio::spawn(async move {
                    let result = client
                        .generate_styled_image(&request.model_image, &request.items)
                        .await;
                    if let Err(e) = &result {
                        log_error!("Try-on #{} failed: {}", token.id, e);
                    }
                    let _ = tx.send(StudioEvent::TryOnFinished { token, result });
                });
            }

            SideEffect::GenerateItem(request) => {
                let client = self.client.clone();
                let tx = self.result_tx.clone();
                let kind = request.kind();
                tokio::spawn(async move {
                    let result = match request {
                        ItemRequest::Random => client.generate_random_item().await,
                        ItemRequest::Described(description) => {
                            client.generate_described_item(&description).await
                        }
                    };
                    let _ = tx.send(StudioEvent::ItemFinished { kind, result });
                });
            }

            SideEffect::SaveComposite(image) => {
                let dir = self.output_dir.clone();
                let tx = self.result_tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result = save_to_dir(&image, &dir, "try-on");
                    let _ = tx.send(StudioEvent::CompositeSaved(result));
                });
            }

            SideEffect::SetTheme(theme) => {
                log_debug!("Switching to {} theme", theme);
                if let Err(e) = self.state.settings.set_theme(theme) {
                    self.state.notify(Notification::warning(format!(
                        "Theme changed but not saved: {e}"
                    )));
                }
                self.state.mark_dirty();
            }
        }
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Public Entry Point
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the studio until the user quits
pub fn run_studio(config: &Config, launch: StudioLaunch) -> Result<()> {
    let settings = Settings::load_default();
    let client = GenerationClient::from_config(config);
    log_info!(
        "Starting studio (image model {}, {} theme)",
        client.image_model(),
        settings.theme()
    );

    let mut app = StudioApp::new(config, settings, client);
    app.run(launch)
}
