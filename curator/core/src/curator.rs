//! Curator - The Orchestration Core
//!
//! The Curator is the "brain" of cardwall. It sequences the gallery
//! pipeline: fetch the feed, render rows into cards, assign pages, bind
//! the filter, and report image-preload progress, retrying the fetch once
//! automatically before giving up.
//!
//! # Design Philosophy
//!
//! The Curator is UI-agnostic. It doesn't know or care whether it's
//! talking to a terminal grid, a web page, or a test harness. It
//! communicates through:
//! - `CuratorMessage`: directives sent TO the UI surface
//! - `SurfaceEvent`: user actions received FROM the UI surface
//!
//! # Lifecycle
//!
//! `Idle -> Loading -> {Rendered, Failed}`. The first failure waits a
//! fixed backoff and re-enters Loading once; a second failure is terminal
//! and replaces the gallery with an error message. Rendering spawns one
//! image probe per card; progress hits 100% only once every probe has
//! settled (success or failure both count), and a short grace delay later
//! the preloader-done signal fires.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::card::{self, SortMode};
use crate::config::GalleryConfig;
use crate::events::{SurfaceEvent, SurfaceKind};
use crate::favorites::FavoritesFile;
use crate::feed::{FeedRow, FeedSource};
use crate::filter;
use crate::messages::{CuratorMessage, CuratorPhase, EventId, NotifyLevel};
use crate::probe::{ArtProber, ProbeOutcome};
use crate::state::GalleryState;
use crate::store::{KvStore, CURRENT_PAGE_KEY};

/// The Curator - headless gallery orchestration core
pub struct Curator<F: FeedSource> {
    /// Configuration
    config: GalleryConfig,
    /// Feed source
    feed: Arc<F>,
    /// Image prober
    prober: Arc<dyn ArtProber>,
    /// Gallery state (cards, paging, query, favorites)
    state: GalleryState,
    /// Current lifecycle phase
    phase: CuratorPhase,
    /// Active sort mode
    sort: SortMode,
    /// Channel to send messages to the UI surface
    tx: mpsc::Sender<CuratorMessage>,
    /// Session-scoped persistence (current page)
    session: Box<dyn KvStore>,
    /// Persistent favorites storage, when available
    favorites_file: Option<FavoritesFile>,
    /// Connected surface info
    surface: Option<SurfaceKind>,
    /// Rows from the last successful fetch (re-rendered on sort change)
    last_rows: Vec<FeedRow>,
    /// Receiver for in-flight probe outcomes
    probe_rx: Option<mpsc::Receiver<ProbeOutcome>>,
    /// Generation counter; outcomes from superseded reloads are ignored
    probe_generation: u64,
    /// Probes issued for the current generation
    probes_total: usize,
    /// Probes settled for the current generation
    probes_settled: usize,
    /// Last progress percentage sent (keeps reporting monotonic)
    last_percent: u8,
}

impl<F: FeedSource + 'static> Curator<F> {
    /// Create a new Curator with the given feed, prober, and session store
    pub fn new(
        feed: F,
        prober: Arc<dyn ArtProber>,
        config: GalleryConfig,
        session: Box<dyn KvStore>,
        tx: mpsc::Sender<CuratorMessage>,
    ) -> Self {
        let sort = config.sort;
        let state = GalleryState::new(config.page_size);
        Self {
            config,
            feed: Arc::new(feed),
            prober,
            state,
            phase: CuratorPhase::Idle,
            sort,
            tx,
            session,
            favorites_file: None,
            surface: None,
            last_rows: Vec::new(),
            probe_rx: None,
            probe_generation: 0,
            probes_total: 0,
            probes_settled: 0,
            last_percent: 0,
        }
    }

    /// Attach persistent favorites storage
    #[must_use]
    pub fn with_favorites_file(mut self, file: FavoritesFile) -> Self {
        self.favorites_file = Some(file);
        self
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> CuratorPhase {
        self.phase
    }

    /// Read access to the gallery state
    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Active sort mode
    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Whether the gallery reached the rendered state
    pub fn is_rendered(&self) -> bool {
        self.phase == CuratorPhase::Rendered
    }

    /// The connected surface, if any
    pub fn surface(&self) -> Option<&SurfaceKind> {
        self.surface.as_ref()
    }

    /// Start the Curator: load favorites, then fetch and render the feed
    ///
    /// A load failure is a reported state, not an error - this only fails
    /// on internal channel breakage.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        if let Some(file) = &self.favorites_file {
            self.state.favorites = file.load();
            if !self.state.favorites.is_empty() {
                self.send_favorites().await;
            }
        }
        self.load().await;
        Ok(())
    }

    /// Fetch the feed with the single automatic retry
    async fn load(&mut self) {
        self.set_phase(CuratorPhase::Loading).await;
        let first_error = match self.feed.fetch_rows().await {
            Ok(rows) => {
                self.build(rows).await;
                return;
            }
            Err(e) => e,
        };

        tracing::warn!(source = self.feed.name(), "Feed load failed, retrying once: {first_error}");
        self.set_phase(CuratorPhase::Failed).await;
        self.notify(NotifyLevel::Warning, "Load failed, retrying...")
            .await;
        tokio::time::sleep(self.config.feed.retry_backoff()).await;

        self.set_phase(CuratorPhase::Loading).await;
        match self.feed.fetch_rows().await {
            Ok(rows) => self.build(rows).await,
            Err(e) => {
                tracing::error!(source = self.feed.name(), "Feed load failed twice, giving up: {e}");
                self.state.cards.clear();
                self.set_phase(CuratorPhase::Failed).await;
                self.send(CuratorMessage::LoadFailed {
                    error: format!("Could not load the gallery: {e}"),
                })
                .await;
            }
        }
    }

    /// Render fetched rows into cards and wire up paging and filtering
    async fn build(&mut self, rows: Vec<FeedRow>) {
        let cards = card::render(&rows, self.sort, &self.config.art);
        let dropped = rows.len() - cards.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped blank feed rows");
        }
        self.last_rows = rows;
        self.state.install_cards(cards);

        // Restore the session's page before the first snap
        if let Some(page) = self
            .session
            .get(CURRENT_PAGE_KEY)
            .and_then(|value| value.parse::<u32>().ok())
        {
            self.state.paging.restore(page);
        }

        let query = self.state.query.clone();
        filter::apply_query(&mut self.state, &query);
        self.persist_page();

        tracing::info!(
            cards = self.state.cards.len(),
            pages = self.state.page_count(),
            sort = %self.sort,
            "Gallery rendered"
        );
        self.set_phase(CuratorPhase::Rendered).await;
        self.send_page_view().await;
        self.spawn_probes().await;
    }

    /// Issue one image probe per card for the current generation
    async fn spawn_probes(&mut self) {
        self.probe_generation += 1;
        let generation = self.probe_generation;
        self.probes_total = self.state.cards.len();
        self.probes_settled = 0;
        self.last_percent = 0;

        if self.probes_total == 0 {
            self.probe_rx = None;
            self.send(CuratorMessage::Progress { percent: 100 }).await;
            self.schedule_preloader_done();
            return;
        }

        let (probe_tx, probe_rx) = mpsc::channel(self.probes_total);
        for (index, card) in self.state.cards.iter().enumerate() {
            let prober = Arc::clone(&self.prober);
            let url = card.image_url.clone();
            let probe_tx = probe_tx.clone();
            tokio::spawn(async move {
                let ok = prober.probe(&url).await;
                let _ = probe_tx
                    .send(ProbeOutcome {
                        generation,
                        index,
                        ok,
                    })
                    .await;
            });
        }
        self.probe_rx = Some(probe_rx);
    }

    /// Drain settled probes; must be called regularly from the event loop
    ///
    /// Swaps fallback art for failed probes, reports monotonic progress,
    /// and schedules the preloader-done signal once everything settled.
    /// Returns whether any outcome was processed.
    pub async fn poll_probes(&mut self) -> bool {
        let mut outcomes = Vec::new();
        if let Some(rx) = self.probe_rx.as_mut() {
            while let Ok(outcome) = rx.try_recv() {
                outcomes.push(outcome);
            }
        }
        if outcomes.is_empty() {
            return false;
        }

        let mut visible_changed = false;
        for outcome in outcomes {
            if outcome.generation != self.probe_generation {
                continue;
            }
            self.probes_settled += 1;
            if !outcome.ok {
                if let Some(card) = self.state.cards.get_mut(outcome.index) {
                    if card.image_url != self.config.art.fallback_image {
                        tracing::warn!(title = %card.title, "Image probe failed, using fallback art");
                        card.image_url = self.config.art.fallback_image.clone();
                        if card.filtered && card.page == self.state.paging.current() {
                            visible_changed = true;
                        }
                    }
                }
            }
        }

        let percent = if self.probes_total == 0 {
            100
        } else {
            ((self.probes_settled * 100) / self.probes_total) as u8
        };
        if percent > self.last_percent {
            self.last_percent = percent;
            self.send(CuratorMessage::Progress { percent }).await;
        }

        if self.probes_settled >= self.probes_total && self.probe_rx.is_some() {
            self.probe_rx = None;
            self.schedule_preloader_done();
        }

        if visible_changed {
            self.send_page_view().await;
        }
        true
    }

    /// Emit PreloaderDone after the cosmetic grace delay
    fn schedule_preloader_done(&self) {
        let tx = self.tx.clone();
        let grace = self.config.preloader_grace();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = tx.send(CuratorMessage::PreloaderDone).await;
        });
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        match event {
            SurfaceEvent::Connected { event_id, surface } => {
                tracing::info!(surface = surface.name(), "Surface connected");
                self.surface = Some(surface);
                self.ack(event_id).await;
                self.send(CuratorMessage::Phase { phase: self.phase }).await;
                if !self.state.favorites.is_empty() {
                    self.send_favorites().await;
                }
                if self.phase == CuratorPhase::Rendered {
                    self.send_page_view().await;
                }
            }

            SurfaceEvent::QueryChanged { query } => {
                self.apply_query(&query).await;
            }

            SurfaceEvent::SearchSubmitted { event_id, query } => {
                self.ack(event_id).await;
                self.apply_query(&query).await;
            }

            SurfaceEvent::NextPage { event_id } => {
                self.ack(event_id).await;
                self.state.paging.next(&self.state.cards);
                self.page_changed().await;
            }

            SurfaceEvent::PrevPage { event_id } => {
                self.ack(event_id).await;
                self.state.paging.prev(&self.state.cards);
                self.page_changed().await;
            }

            SurfaceEvent::GoToPage { event_id, page } => {
                self.ack(event_id).await;
                self.state.paging.go_to(page, &self.state.cards);
                self.page_changed().await;
            }

            SurfaceEvent::SortChanged { event_id, mode } => {
                self.ack(event_id).await;
                if mode != self.sort {
                    self.sort = mode;
                    let rows = self.last_rows.clone();
                    self.build(rows).await;
                }
            }

            SurfaceEvent::FavoriteToggled { event_id, title } => {
                self.ack(event_id).await;
                let now_favorite = self.state.favorites.toggle(&title);
                tracing::debug!(%title, now_favorite, "Favorite toggled");
                if let Some(file) = &self.favorites_file {
                    if let Err(e) = file.save(&self.state.favorites) {
                        tracing::warn!(path = %file.path().display(), "Failed to save favorites: {e}");
                    }
                }
                self.send_favorites().await;
            }

            SurfaceEvent::RefreshRequested { event_id } => {
                self.ack(event_id).await;
                self.load().await;
            }

            SurfaceEvent::Resized { .. } => {
                // Layout is the surface's concern
            }

            SurfaceEvent::QuitRequested { event_id } => {
                self.ack(event_id).await;
                self.send(CuratorMessage::Quit { message: None }).await;
            }
        }
        Ok(())
    }

    /// Run a query through the filter and publish the new visible set
    async fn apply_query(&mut self, query: &str) {
        let before = self.state.paging.current();
        let matched = filter::apply_query(&mut self.state, query);
        tracing::debug!(query = %self.state.query, matched, "Filter applied");
        if self.state.paging.current() != before {
            self.persist_page();
        }
        self.send_page_view().await;
    }

    /// Persist and publish after a page move
    async fn page_changed(&mut self) {
        self.persist_page();
        self.send_page_view().await;
    }

    fn persist_page(&mut self) {
        let current = self.state.paging.current();
        self.session.set(CURRENT_PAGE_KEY, &current.to_string());
    }

    async fn send_page_view(&mut self) {
        let message = CuratorMessage::PageView {
            current: self.state.paging.current(),
            pages: self.state.page_count(),
            matched: self.state.matched(),
            total: self.state.cards.len(),
            cards: self.state.visible_cards(),
        };
        self.send(message).await;
    }

    async fn send_favorites(&self) {
        self.send(CuratorMessage::FavoritesChanged {
            titles: self.state.favorites.titles(),
        })
        .await;
    }

    async fn set_phase(&mut self, phase: CuratorPhase) {
        if self.phase != phase {
            tracing::info!(?phase, "Curator phase");
        }
        self.phase = phase;
        self.send(CuratorMessage::Phase { phase }).await;
    }

    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(CuratorMessage::Notify {
            level,
            message: message.to_string(),
        })
        .await;
    }

    async fn ack(&self, event_id: EventId) {
        self.send(CuratorMessage::Ack { event_id }).await;
    }

    async fn send(&self, message: CuratorMessage) {
        if self.tx.send(message).await.is_err() {
            tracing::debug!("Surface channel closed, dropping message");
        }
    }
}
