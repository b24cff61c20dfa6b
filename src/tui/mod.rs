// Terminal card viewer: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` built from the loaded roster. Key presses mutate
// it through `input::handle_key`; the loop re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use image::DynamicImage;
use ratatui::{DefaultTerminal, Frame};
use tracing::{info, warn};

use crate::card::{build_card, StatCard};
use crate::config::Config;
use crate::export;
use crate::images;
use crate::stats::{PlayerRecord, Roster};

use layout::build_layout;

/// Actions that leave the local view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Export,
    Quit,
}

/// One-line feedback shown in the help bar until the selection moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Everything the viewer renders from.
pub struct ViewState {
    /// Players in file order; `cards[i]` belongs to `players[i]`.
    pub players: Vec<PlayerRecord>,
    pub cards: Vec<StatCard>,
    /// Position of the selection within `visible()`.
    pub selected: usize,
    /// Case-insensitive name filter.
    pub filter_text: String,
    /// Whether the filter input is capturing keys.
    pub filter_mode: bool,
    pub status: Option<StatusMessage>,
    pub school: String,
    pub export_dir: PathBuf,
    pub spray_chart: PathBuf,
    /// Decoded previews by path; `None` records a failed load so it is not
    /// retried every frame.
    pub images: HashMap<PathBuf, Option<DynamicImage>>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            players: Vec::new(),
            cards: Vec::new(),
            selected: 0,
            filter_text: String::new(),
            filter_mode: false,
            status: None,
            school: String::new(),
            export_dir: PathBuf::from("."),
            spray_chart: PathBuf::new(),
            images: HashMap::new(),
        }
    }
}

impl ViewState {
    pub fn new(roster: Roster, config: &Config) -> Self {
        let players = roster.into_players();
        let cards = players.iter().map(|p| build_card(p, config)).collect();
        ViewState {
            players,
            cards,
            school: config.team.school.clone(),
            export_dir: config.export_dir(),
            spray_chart: config.spray_chart_path(),
            ..ViewState::default()
        }
    }

    /// Indices into `players` whose names match the filter.
    pub fn visible(&self) -> Vec<usize> {
        let needle = self.filter_text.to_lowercase();
        self.players
            .iter()
            .enumerate()
            .filter(|(_, p)| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Index into `players` of the highlighted row, if any row is visible.
    pub fn selected_index(&self) -> Option<usize> {
        self.visible().get(self.selected).copied()
    }

    pub fn selected_player(&self) -> Option<&PlayerRecord> {
        self.selected_index().map(|i| &self.players[i])
    }

    pub fn selected_card(&self) -> Option<&StatCard> {
        self.selected_index().map(|i| &self.cards[i])
    }

    pub fn select_next(&mut self, step: usize) {
        let last = self.visible().len().saturating_sub(1);
        self.move_to((self.selected + step).min(last));
    }

    pub fn select_prev(&mut self, step: usize) {
        self.move_to(self.selected.saturating_sub(step));
    }

    pub fn select_first(&mut self) {
        self.move_to(0);
    }

    pub fn select_last(&mut self) {
        let last = self.visible().len().saturating_sub(1);
        self.move_to(last);
    }

    fn move_to(&mut self, position: usize) {
        if position != self.selected {
            self.selected = position;
            self.status = None;
        }
    }

    /// Edit the filter text, keeping the highlighted player selected when it
    /// still matches.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut String)) {
        let current = self.selected_index();
        edit(&mut self.filter_text);
        let visible = self.visible();
        self.selected = current
            .and_then(|i| visible.iter().position(|&v| v == i))
            .unwrap_or(0);
    }

    /// Cached preview for a path. `None` when not loaded or undecodable.
    pub fn image(&self, path: &Path) -> Option<&DynamicImage> {
        self.images.get(path).and_then(Option::as_ref)
    }

    /// Decode the selected player's photo and the spray chart if they have
    /// not been tried yet.
    pub fn load_images(&mut self) {
        let mut wanted = vec![self.spray_chart.clone()];
        if let Some(card) = self.selected_card() {
            wanted.push(card.profile.photo.clone());
        }
        for path in wanted {
            self.images.entry(path).or_insert_with_key(|path| {
                match images::load_preview(path) {
                    Ok(img) => Some(img),
                    Err(e) => {
                        warn!("{}", e);
                        None
                    }
                }
            });
        }
    }

    /// Write the selected player's CSV and report the outcome in the status
    /// line.
    pub fn export_selected(&mut self) {
        let status = match self.selected_player() {
            None => StatusMessage::Error("No player selected".to_string()),
            Some(player) => match export::export_player(player, &self.export_dir) {
                Ok(path) => {
                    let file = path
                        .file_name()
                        .map(|f| f.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    StatusMessage::Info(format!("Exported to `{file}`"))
                }
                Err(e) => StatusMessage::Error(e.to_string()),
            },
        };
        self.status = Some(status);
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete viewer frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.title_bar, state);
    widgets::player_list::render(frame, layout.player_list, state);
    widgets::profile::render(frame, layout.photo, layout.profile, state);
    widgets::stat_panels::render(frame, layout.stats, state);
    widgets::spray_chart::render(frame, layout.spray_chart, state);
    widgets::help_bar::render(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the viewer until the user quits.
///
/// Enters the alternate screen, installs a panic hook that restores the
/// terminal, and restores it again on every exit path.
pub async fn run(mut state: ViewState) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    info!("Viewer started with {} players", state.players.len());
    let result = event_loop(&mut terminal, &mut state).await;
    ratatui::restore();
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, state: &mut ViewState) -> anyhow::Result<()> {
    state.load_images();

    let mut event_stream = EventStream::new();
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match input::handle_key(key_event, state) {
                            Some(UserCommand::Quit) => break,
                            Some(UserCommand::Export) => state.export_selected(),
                            None => {}
                        }
                        state.load_images();
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, state))?;
            }
        }
    }

    info!("Viewer closed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::config::fixtures::config;
    use crate::stats::fixtures::player;

    /// Three players: a hitter with everything, a pitcher with blanks, and an
    /// outfielder with almost nothing.
    pub fn state() -> ViewState {
        let mut roster = Roster::new();
        roster.upsert(player(
            "Alex Rivera",
            &[("AVG", Some(0.318)), ("OBP", Some(0.4)), ("SLG", Some(0.5)), ("HR", Some(3.0))],
            &[("ERA", Some(2.5)), ("WHIP", Some(1.1))],
            &[("TC", Some(40.0)), ("FPCT", Some(0.975))],
        ));
        roster.upsert(player(
            "Sam Chen",
            &[("H", Some(0.0)), ("AB", Some(12.0))],
            &[("ERA", None), ("FIP", Some(2.84))],
            &[("PO", Some(10.0)), ("A", Some(4.0)), ("E", Some(1.0))],
        ));
        roster.upsert(player("Jordan Okafor", &[("SB", Some(6.0))], &[], &[]));
        ViewState::new(roster, &config(Path::new("/nonexistent")))
    }
}
