//! Display State Types
//!
//! State derived from CuratorMessages and used for rendering. The TUI is a
//! "thin client" - it draws exactly the page view it was last handed and
//! never recomputes filtering or paging locally.

use std::collections::HashSet;

use curator_core::{CardRecord, CuratorMessage, CuratorPhase, NotifyLevel};

/// A pending notification line
#[derive(Clone, Debug)]
pub struct DisplayNotification {
    /// Severity
    pub level: NotifyLevel,
    /// Message content
    pub message: String,
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Curator lifecycle phase
    pub phase: CuratorPhase,
    /// Preload progress, 0-100
    pub progress: u8,
    /// Whether the preloader finished its grace delay
    pub preloader_done: bool,
    /// Cards on the current page, in page order
    pub cards: Vec<CardRecord>,
    /// Current page, 1-based
    pub current_page: u32,
    /// Highest active page
    pub pages: u32,
    /// Cards matching the active query across all pages
    pub matched: usize,
    /// All cards in the gallery
    pub total: usize,
    /// Lowercase favorite titles
    pub favorites: HashSet<String>,
    /// Terminal load error; replaces the gallery area when set
    pub error: Option<String>,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Whether the Curator asked us to quit
    pub quitting: bool,
    /// Goodbye message, if the Curator sent one
    pub goodbye: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            phase: CuratorPhase::Idle,
            progress: 0,
            preloader_done: false,
            cards: Vec::new(),
            current_page: 1,
            pages: 1,
            matched: 0,
            total: 0,
            favorites: HashSet::new(),
            error: None,
            notification: None,
            quitting: false,
            goodbye: None,
        }
    }
}

impl DisplayState {
    /// Create a fresh display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a CuratorMessage to update display state
    pub fn apply_message(&mut self, message: CuratorMessage) {
        match message {
            CuratorMessage::Phase { phase } => {
                self.phase = phase;
                if phase == CuratorPhase::Loading {
                    // A reload restarts the preloader and clears stale errors
                    self.progress = 0;
                    self.preloader_done = false;
                    self.error = None;
                }
            }

            CuratorMessage::Progress { percent } => {
                self.progress = self.progress.max(percent.min(100));
            }

            CuratorMessage::PreloaderDone => {
                if self.phase != CuratorPhase::Loading {
                    self.preloader_done = true;
                }
            }

            CuratorMessage::PageView {
                current,
                pages,
                matched,
                total,
                cards,
            } => {
                self.current_page = current;
                self.pages = pages;
                self.matched = matched;
                self.total = total;
                self.cards = cards;
                self.error = None;
            }

            CuratorMessage::FavoritesChanged { titles } => {
                self.favorites = titles.into_iter().collect();
            }

            CuratorMessage::LoadFailed { error } => {
                self.cards.clear();
                self.matched = 0;
                self.total = 0;
                self.error = Some(error);
            }

            CuratorMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification { level, message });
            }

            CuratorMessage::Quit { message } => {
                self.quitting = true;
                self.goodbye = message;
            }

            CuratorMessage::Ack { .. } => {}
        }
    }

    /// Whether a card is in the favorites set
    pub fn is_favorite(&self, card: &CardRecord) -> bool {
        self.favorites.contains(&card.title.to_lowercase())
    }

    /// Pagination indicator text
    pub fn page_indicator(&self) -> String {
        format!("Page {} of {}", self.current_page, self.pages)
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }
}
