//! Curator Messages
//!
//! Messages sent from the Curator to UI surfaces. The surface is a pure
//! renderer: it draws the page view it is handed and never recomputes
//! filtering or paging on its own.
//!
//! # Design Philosophy
//!
//! The Curator orchestrates the gallery; surfaces display it. The split
//! keeps the core headless - the same messages could drive a terminal
//! grid, a web page, or a test harness that just records them.

use serde::{Deserialize, Serialize};

use crate::card::CardRecord;

/// Unique event identifier (surface to Curator)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

/// Curator lifecycle phase
///
/// `Idle -> Loading -> {Rendered, Failed}`, with a single automatic
/// `Failed -> Loading` retry before Failed becomes terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CuratorPhase {
    /// Created; nothing fetched yet
    Idle,
    /// Feed fetch in flight
    Loading,
    /// Cards rendered and wired to search and paging
    Rendered,
    /// Load failed (terminal after the retry)
    Failed,
}

/// Notification severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Something degraded but the gallery still works
    Warning,
    /// Something went wrong
    Error,
}

/// Messages from the Curator to UI surfaces
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CuratorMessage {
    /// Acknowledgment of a received event
    Ack {
        /// Event ID being acknowledged
        event_id: EventId,
    },

    /// Lifecycle phase change
    Phase {
        /// The new phase
        phase: CuratorPhase,
    },

    /// Image-preload progress, monotonically non-decreasing
    Progress {
        /// Settled probes as a percentage of all probes (0-100)
        percent: u8,
    },

    /// The preloader can be hidden (sent a grace delay after 100%)
    PreloaderDone,

    /// The visible slice of the gallery
    ///
    /// Sent after every change to visibility: load, filter, page
    /// navigation, sort change, and fallback art swaps on the current page.
    PageView {
        /// Current page, 1-based
        current: u32,
        /// Highest active page ("Page {current} of {pages}")
        pages: u32,
        /// Cards matching the active query, across all pages
        matched: usize,
        /// All cards in the gallery
        total: usize,
        /// The cards to draw, in page order
        cards: Vec<CardRecord>,
    },

    /// Favorites changed
    FavoritesChanged {
        /// Lowercase favorite titles, sorted
        titles: Vec<String>,
    },

    /// Loading failed after the automatic retry
    ///
    /// The error text replaces the gallery area; no cards are shown.
    LoadFailed {
        /// Human-readable description
        error: String,
    },

    /// Out-of-band notification
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Message content
        message: String,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}
