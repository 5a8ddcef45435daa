//! Curator Client
//!
//! Thin wrapper around the Curator for TUI integration. The client embeds
//! the Curator directly (no network) and provides a convenient interface
//! for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any gallery logic.
//! All orchestration happens in the Curator. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to the Curator
//! 3. Receive CuratorMessages
//! 4. Render display state based on messages

use std::sync::Arc;

use tokio::sync::mpsc;

use curator_core::{
    Curator, CuratorMessage, CuratorPhase, FavoritesFile, GalleryConfig, HttpProber, SessionStore,
    SheetFeed, SortMode, SurfaceEvent, SurfaceKind,
};

/// Client for communicating with the embedded Curator
pub struct CuratorClient {
    /// The embedded Curator instance
    curator: Curator<SheetFeed>,
    /// Receiver for messages from the Curator
    rx: mpsc::Receiver<CuratorMessage>,
}

impl CuratorClient {
    /// Create a new client with an embedded Curator for this config
    pub fn new(config: GalleryConfig) -> Self {
        // Channel for Curator -> TUI messages
        let (tx, rx) = mpsc::channel(100);

        let feed = SheetFeed::from_config(&config.feed);
        let prober = Arc::new(HttpProber::new(config.feed.request_timeout()));
        let session = Box::new(SessionStore::open_default());

        let mut curator = Curator::new(feed, prober, config, session, tx);
        if let Some(favorites) = FavoritesFile::open_default() {
            curator = curator.with_favorites_file(favorites);
        }

        Self { curator, rx }
    }

    /// Start the Curator (fetch, render, spawn probes)
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.curator.start().await
    }

    /// Connect this surface to the Curator
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
            surface: SurfaceKind::Tui,
        };
        self.curator.handle_event(event).await
    }

    /// Re-apply the filter for a changed query (every keystroke)
    pub async fn query_changed(&mut self, query: String) -> anyhow::Result<()> {
        self.curator
            .handle_event(SurfaceEvent::QueryChanged { query })
            .await
    }

    /// Apply the filter from the submit trigger
    pub async fn search_submitted(&mut self, query: String) -> anyhow::Result<()> {
        let event = SurfaceEvent::SearchSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            query,
        };
        self.curator.handle_event(event).await
    }

    /// Advance to the next active page
    pub async fn next_page(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::NextPage {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.curator.handle_event(event).await
    }

    /// Go back to the previous active page
    pub async fn prev_page(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::PrevPage {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.curator.handle_event(event).await
    }

    /// Jump to a specific page
    pub async fn go_to_page(&mut self, page: u32) -> anyhow::Result<()> {
        let event = SurfaceEvent::GoToPage {
            event_id: SurfaceEvent::new_event_id(),
            page,
        };
        self.curator.handle_event(event).await
    }

    /// Change the card ordering
    pub async fn sort_changed(&mut self, mode: SortMode) -> anyhow::Result<()> {
        let event = SurfaceEvent::SortChanged {
            event_id: SurfaceEvent::new_event_id(),
            mode,
        };
        self.curator.handle_event(event).await
    }

    /// Toggle a title in the favorites list
    pub async fn toggle_favorite(&mut self, title: String) -> anyhow::Result<()> {
        let event = SurfaceEvent::FavoriteToggled {
            event_id: SurfaceEvent::new_event_id(),
            title,
        };
        self.curator.handle_event(event).await
    }

    /// Reload the feed from scratch
    pub async fn refresh(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::RefreshRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.curator.handle_event(event).await
    }

    /// Notify the Curator of a resize
    pub async fn resized(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        self.curator
            .handle_event(SurfaceEvent::Resized { width, height })
            .await
    }

    /// Request quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        let event = SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        };
        self.curator.handle_event(event).await
    }

    /// Drain settled image probes (must be called regularly)
    pub async fn poll_probes(&mut self) -> bool {
        self.curator.poll_probes().await
    }

    /// Try to receive a message from the Curator (non-blocking)
    pub fn try_recv(&mut self) -> Option<CuratorMessage> {
        self.rx.try_recv().ok()
    }

    /// Receive all pending messages from the Curator (non-blocking)
    pub fn recv_all(&mut self) -> Vec<CuratorMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Current Curator phase
    pub fn phase(&self) -> CuratorPhase {
        self.curator.phase()
    }

    /// Active sort mode
    pub fn sort(&self) -> SortMode {
        self.curator.sort()
    }
}
