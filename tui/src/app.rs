//! Main Application
//!
//! The App manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, resize)
//! - CuratorClient for orchestration
//! - DisplayState for rendering
//!
//! Typing goes to the search box and re-applies the filter on every
//! keystroke; arrow keys move between pages and cards; control chords do
//! the rest (see the status bar).

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Terminal;

use curator_core::{CuratorPhase, GalleryConfig, NotifyLevel, SortMode};

use crate::curator_client::CuratorClient;
use crate::display::DisplayState;
use crate::theme;
use crate::widgets::{grid_slots, render_card};

/// How long one event-loop tick waits for terminal input
const TICK: Duration = Duration::from_millis(50);

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// Client for communicating with the embedded Curator
    client: CuratorClient,
    /// Display state derived from CuratorMessages
    display: DisplayState,
    /// Search input buffer
    input_buffer: String,
    /// Selected card on the current page
    selected: usize,
    /// Sort mode mirrored for the header line
    sort: SortMode,
}

impl App {
    /// Create a new App over the given configuration
    pub fn new(config: GalleryConfig) -> Self {
        let sort = config.sort;
        Self {
            running: true,
            client: CuratorClient::new(config),
            display: DisplayState::new(),
            input_buffer: String::new(),
            selected: 0,
            sort,
        }
    }

    /// Run the app until quit
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        self.client.start().await?;
        self.client.connect().await?;

        while self.running {
            self.pump_messages();
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key).await?;
                    }
                    Event::Resize(width, height) => {
                        self.client.resized(u32::from(width), u32::from(height)).await?;
                    }
                    _ => {}
                }
            }

            self.client.poll_probes().await;
        }
        Ok(())
    }

    /// Drain pending Curator messages into display state
    fn pump_messages(&mut self) {
        for message in self.client.recv_all() {
            self.display.apply_message(message);
        }
        if self.display.quitting {
            self.running = false;
        }
        self.sort = self.client.sort();
        // Keep the selection on the page
        if self.selected >= self.display.cards.len() {
            self.selected = self.display.cards.len().saturating_sub(1);
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match (key.code, ctrl) {
            (KeyCode::Char('q' | 'c'), true) => self.client.request_quit().await?,
            (KeyCode::Char('r'), true) => {
                self.selected = 0;
                self.client.refresh().await?;
            }
            (KeyCode::Char('a'), true) => {
                let mode = match self.sort {
                    SortMode::Sheet => SortMode::Alphabetical,
                    SortMode::Alphabetical => SortMode::Sheet,
                };
                self.selected = 0;
                self.client.sort_changed(mode).await?;
            }
            (KeyCode::Char('f'), true) => {
                if let Some(card) = self.display.cards.get(self.selected) {
                    let title = card.title.clone();
                    self.client.toggle_favorite(title).await?;
                }
            }
            (KeyCode::Left, _) | (KeyCode::PageUp, _) => {
                self.selected = 0;
                self.client.prev_page().await?;
            }
            (KeyCode::Right, _) | (KeyCode::PageDown, _) => {
                self.selected = 0;
                self.client.next_page().await?;
            }
            (KeyCode::Home, _) => {
                self.selected = 0;
                self.client.go_to_page(1).await?;
            }
            (KeyCode::Up, _) => {
                self.selected = self.selected.saturating_sub(1);
            }
            (KeyCode::Down, _) => {
                if self.selected + 1 < self.display.cards.len() {
                    self.selected += 1;
                }
            }
            (KeyCode::Enter, _) => {
                let query = self.input_buffer.clone();
                self.client.search_submitted(query).await?;
            }
            (KeyCode::Esc, _) => {
                self.input_buffer.clear();
                self.client.query_changed(String::new()).await?;
            }
            (KeyCode::Backspace, _) => {
                self.input_buffer.pop();
                let query = self.input_buffer.clone();
                self.client.query_changed(query).await?;
            }
            (KeyCode::Char(c), false) => {
                self.input_buffer.push(c);
                let query = self.input_buffer.clone();
                self.client.query_changed(query).await?;
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(3), // search box
                Constraint::Min(0),    // gallery
                Constraint::Length(1), // status bar
            ])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_search(frame, chunks[1]);
        self.draw_gallery(frame, chunks[2]);
        self.draw_status(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled(
                " cardwall ",
                Style::default()
                    .fg(theme::CARDWALL_CORAL)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("· sort: {} ", self.sort),
                Style::default().fg(theme::DIM_GRAY),
            ),
            Span::styled(
                format!("· {}/{} cards", self.display.matched, self.display.total),
                Style::default().fg(theme::DIM_GRAY),
            ),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn draw_search(&self, frame: &mut ratatui::Frame, area: Rect) {
        let input = Paragraph::new(Span::styled(
            self.input_buffer.as_str(),
            Style::default().fg(theme::SEARCH_GREEN),
        ))
        .block(Block::default().borders(Borders::ALL).title("Search"));
        frame.render_widget(input, area);
    }

    fn draw_gallery(&self, frame: &mut ratatui::Frame, area: Rect) {
        // A terminal load failure replaces the gallery with the error text
        if let Some(error) = &self.display.error {
            let message = Paragraph::new(Span::styled(
                error.as_str(),
                Style::default().fg(theme::ERROR_RED),
            ))
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, area);
            return;
        }

        if self.display.phase == CuratorPhase::Loading {
            let loading = Paragraph::new(Span::styled(
                "Loading the gallery...",
                Style::default().fg(theme::DIM_GRAY),
            ));
            frame.render_widget(loading, area);
            return;
        }

        let grid_area = if self.display.preloader_done {
            area
        } else {
            // Preload gauge on top until every image probe settled
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(theme::CARDWALL_CORAL))
                .percent(u16::from(self.display.progress));
            frame.render_widget(gauge, split[0]);
            split[1]
        };

        if self.display.cards.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "Nothing matches - try another search.",
                Style::default().fg(theme::DIM_GRAY),
            ));
            frame.render_widget(empty, grid_area);
            return;
        }

        for (index, (card, slot)) in self
            .display
            .cards
            .iter()
            .zip(grid_slots(grid_area, self.display.cards.len()))
            .enumerate()
        {
            render_card(
                frame,
                slot,
                card,
                index == self.selected,
                self.display.is_favorite(card),
            );
        }
    }

    fn draw_status(&self, frame: &mut ratatui::Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.display.page_indicator()),
                Style::default()
                    .fg(theme::CARDWALL_CORAL)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "←/→ pages · ↑/↓ select · ^F fav · ^A sort · ^R reload · ^Q quit",
                Style::default().fg(theme::DIM_GRAY),
            ),
        ];

        if let Some(notification) = &self.display.notification {
            let color = match notification.level {
                NotifyLevel::Info => theme::DIM_GRAY,
                NotifyLevel::Warning => theme::BADGE_FIXING,
                NotifyLevel::Error => theme::ERROR_RED,
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                notification.message.clone(),
                Style::default().fg(color),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
