//! Integration tests for the gallery orchestration pipeline
//!
//! These tests drive the Curator end to end with feed and prober doubles:
//! - Load, render, page, and filter flow over the message channel
//! - The single automatic retry and the terminal failed state
//! - Preload progress reaching 100% despite failing probes
//! - Session-scoped current-page persistence across orchestration runs
//! - Favorites toggling and on-disk shape

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use curator_core::{
    ArtProber, Curator, CuratorMessage, CuratorPhase, FavoritesFile, FeedError, FeedRow,
    FeedSource, GalleryConfig, KvStore, MemoryStore, SessionStore, SortMode, SurfaceEvent,
    SurfaceKind, CURRENT_PAGE_KEY,
};

// =============================================================================
// Test Doubles
// =============================================================================

/// Feed that succeeds after a configurable number of failures
struct FlakyFeed {
    rows: Vec<FeedRow>,
    failures: AtomicUsize,
}

impl FlakyFeed {
    fn new(rows: Vec<FeedRow>, failures: usize) -> Self {
        Self {
            rows,
            failures: AtomicUsize::new(failures),
        }
    }

    fn reliable(rows: Vec<FeedRow>) -> Self {
        Self::new(rows, 0)
    }
}

#[async_trait]
impl FeedSource for FlakyFeed {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn fetch_rows(&self) -> Result<Vec<FeedRow>, FeedError> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(FeedError::Status {
                status: 500,
                body: "macro exploded".to_string(),
            });
        }
        Ok(self.rows.clone())
    }
}

/// Prober that fails for a fixed set of URLs
#[derive(Default)]
struct FakeProber {
    broken: HashSet<String>,
}

impl FakeProber {
    fn broken(urls: &[&str]) -> Self {
        Self {
            broken: urls.iter().map(|u| (*u).to_string()).collect(),
        }
    }
}

#[async_trait]
impl ArtProber for FakeProber {
    async fn probe(&self, url: &str) -> bool {
        !self.broken.contains(url)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn row(title: &str, author: &str) -> FeedRow {
    FeedRow {
        title: Some(title.to_string()),
        author: Some(author.to_string()),
        image: Some(format!("https://cdn.example.com/{}.png", title.to_lowercase())),
        link: Some(format!("https://example.com/{}", title.to_lowercase())),
        ..FeedRow::default()
    }
}

fn rows(count: usize) -> Vec<FeedRow> {
    (0..count).map(|i| row(&format!("Card {i:02}"), "ava")).collect()
}

fn test_config() -> GalleryConfig {
    let mut config = GalleryConfig::default();
    config.feed.endpoint = "https://example.com/rows".to_string();
    config.feed.retry_backoff_ms = 5;
    config.preloader_grace_ms = 5;
    config
}

struct Harness {
    curator: Curator<FlakyFeed>,
    rx: mpsc::Receiver<CuratorMessage>,
}

fn harness_with(
    feed: FlakyFeed,
    prober: FakeProber,
    config: GalleryConfig,
    session: Box<dyn KvStore>,
) -> Harness {
    let (tx, rx) = mpsc::channel(256);
    let curator = Curator::new(feed, Arc::new(prober), config, session, tx);
    Harness { curator, rx }
}

fn harness(feed: FlakyFeed) -> Harness {
    harness_with(
        feed,
        FakeProber::default(),
        test_config(),
        Box::new(MemoryStore::new()),
    )
}

impl Harness {
    fn drain(&mut self) -> Vec<CuratorMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    /// Pump probes until the preloader-done signal arrives
    async fn run_preload(&mut self) -> Vec<CuratorMessage> {
        let mut messages = Vec::new();
        for _ in 0..200 {
            self.curator.poll_probes().await;
            messages.extend(self.drain());
            if messages
                .iter()
                .any(|m| matches!(m, CuratorMessage::PreloaderDone))
            {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("preloader never finished; saw {} messages", messages.len());
    }
}

fn last_page_view(messages: &[CuratorMessage]) -> (u32, u32, usize, usize, usize) {
    messages
        .iter()
        .rev()
        .find_map(|m| match m {
            CuratorMessage::PageView {
                current,
                pages,
                matched,
                total,
                cards,
            } => Some((*current, *pages, *matched, *total, cards.len())),
            _ => None,
        })
        .expect("expected a PageView message")
}

// =============================================================================
// Test 1: Happy-Path Load
// =============================================================================

/// Loading a healthy feed renders cards, assigns pages, and finishes the
/// preloader with monotonic progress ending at 100.
#[tokio::test]
async fn test_load_renders_and_finishes_preload() {
    let mut h = harness(FlakyFeed::reliable(rows(23)));
    h.curator.start().await.unwrap();

    assert_eq!(h.curator.phase(), CuratorPhase::Rendered);
    let startup = h.drain();
    let (current, pages, matched, total, visible) = last_page_view(&startup);
    assert_eq!(current, 1);
    assert_eq!(pages, 3);
    assert_eq!(matched, 23);
    assert_eq!(total, 23);
    assert_eq!(visible, 10);

    let preload = h.run_preload().await;
    let percents: Vec<u8> = preload
        .iter()
        .filter_map(|m| match m {
            CuratorMessage::Progress { percent } => Some(*percent),
            _ => None,
        })
        .collect();
    assert!(!percents.is_empty());
    assert!(percents.windows(2).all(|w| w[0] <= w[1]), "progress must be monotonic");
    assert_eq!(*percents.last().unwrap(), 100);
}

// =============================================================================
// Test 2: Retry Once, Then Succeed
// =============================================================================

/// One fetch failure is recovered by the automatic retry.
#[tokio::test]
async fn test_single_failure_recovers_via_retry() {
    let mut h = harness(FlakyFeed::new(rows(3), 1));
    h.curator.start().await.unwrap();

    assert_eq!(h.curator.phase(), CuratorPhase::Rendered);
    let messages = h.drain();
    // The retry leaves a visible Failed -> Loading trace
    let phases: Vec<CuratorPhase> = messages
        .iter()
        .filter_map(|m| match m {
            CuratorMessage::Phase { phase } => Some(*phase),
            _ => None,
        })
        .collect();
    assert!(phases.contains(&CuratorPhase::Failed));
    assert_eq!(*phases.last().unwrap(), CuratorPhase::Rendered);
    let (_, _, _, total, _) = last_page_view(&messages);
    assert_eq!(total, 3);
}

// =============================================================================
// Test 3: Terminal Failure
// =============================================================================

/// Two consecutive fetch failures end terminal-Failed with an error message
/// and no cards rendered.
#[tokio::test]
async fn test_double_failure_is_terminal() {
    let mut h = harness(FlakyFeed::new(rows(3), 2));
    h.curator.start().await.unwrap();

    assert_eq!(h.curator.phase(), CuratorPhase::Failed);
    assert!(h.curator.state().cards.is_empty());

    let messages = h.drain();
    let error = messages.iter().find_map(|m| match m {
        CuratorMessage::LoadFailed { error } => Some(error.clone()),
        _ => None,
    });
    let error = error.expect("expected LoadFailed");
    assert!(error.contains("Could not load the gallery"));
    assert!(
        !messages
            .iter()
            .any(|m| matches!(m, CuratorMessage::PageView { .. })),
        "no cards may be rendered after a terminal failure"
    );
}

// =============================================================================
// Test 4: Broken Art Falls Back, Progress Still Completes
// =============================================================================

/// Failed probes swap in the fallback image and still count toward 100%.
#[tokio::test]
async fn test_broken_art_swaps_fallback_and_completes() {
    let broken_url = "https://cdn.example.com/card 01.png";
    let mut config = test_config();
    config.art.fallback_image = "https://cdn.example.com/blank.png".to_string();

    let mut h = harness_with(
        FlakyFeed::reliable(rows(4)),
        FakeProber::broken(&[broken_url]),
        config,
        Box::new(MemoryStore::new()),
    );
    h.curator.start().await.unwrap();
    let preload = h.run_preload().await;

    let percents: Vec<u8> = preload
        .iter()
        .filter_map(|m| match m {
            CuratorMessage::Progress { percent } => Some(*percent),
            _ => None,
        })
        .collect();
    assert_eq!(*percents.last().unwrap(), 100);

    let swapped = h
        .curator
        .state()
        .cards
        .iter()
        .find(|c| c.title == "Card 01")
        .expect("card exists");
    assert_eq!(swapped.image_url, "https://cdn.example.com/blank.png");

    let intact = h
        .curator
        .state()
        .cards
        .iter()
        .find(|c| c.title == "Card 02")
        .expect("card exists");
    assert_eq!(intact.image_url, "https://cdn.example.com/card 02.png");
}

// =============================================================================
// Test 5: Pagination Events
// =============================================================================

/// Next/prev wrap through active pages and a full cycle returns home.
#[tokio::test]
async fn test_pagination_events_wrap() {
    let mut h = harness(FlakyFeed::reliable(rows(23)));
    h.curator.start().await.unwrap();
    h.drain();

    h.curator
        .handle_event(SurfaceEvent::NextPage {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
        .unwrap();
    let (current, ..) = last_page_view(&h.drain());
    assert_eq!(current, 2);

    // Two more nexts wrap back to page 1
    for _ in 0..2 {
        h.curator
            .handle_event(SurfaceEvent::NextPage {
                event_id: SurfaceEvent::new_event_id(),
            })
            .await
            .unwrap();
    }
    let (current, ..) = last_page_view(&h.drain());
    assert_eq!(current, 1);

    h.curator
        .handle_event(SurfaceEvent::PrevPage {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
        .unwrap();
    let (current, ..) = last_page_view(&h.drain());
    assert_eq!(current, 3);
}

// =============================================================================
// Test 6: Filtering Through Events
// =============================================================================

/// Typing narrows the visible set; every visible card matches the query;
/// clearing restores everything; the current page snaps into range.
#[tokio::test]
async fn test_filter_events() {
    let mut feed_rows = rows(12);
    feed_rows.push(row("Zebra Crossing", "mori"));
    let mut h = harness(FlakyFeed::reliable(feed_rows));
    h.curator.start().await.unwrap();
    h.drain();

    // Move to page 2, then filter to a single page-1 card
    h.curator
        .handle_event(SurfaceEvent::NextPage {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
        .unwrap();
    h.curator
        .handle_event(SurfaceEvent::QueryChanged {
            query: "card 03".to_string(),
        })
        .await
        .unwrap();

    let messages = h.drain();
    let (current, pages, matched, _, visible) = last_page_view(&messages);
    assert_eq!(current, 1, "page snaps back into the active set");
    assert_eq!(pages, 1);
    assert_eq!(matched, 1);
    assert_eq!(visible, 1);

    // Author search matches across fields
    h.curator
        .handle_event(SurfaceEvent::SearchSubmitted {
            event_id: SurfaceEvent::new_event_id(),
            query: "MORI".to_string(),
        })
        .await
        .unwrap();
    let (_, _, matched, _, _) = last_page_view(&h.drain());
    assert_eq!(matched, 1);

    // Empty query restores the full set
    h.curator
        .handle_event(SurfaceEvent::QueryChanged {
            query: String::new(),
        })
        .await
        .unwrap();
    let (_, _, matched, total, _) = last_page_view(&h.drain());
    assert_eq!(matched, total);
}

// =============================================================================
// Test 7: Sort Change Re-renders
// =============================================================================

/// Switching to alphabetical re-renders with non-decreasing titles and
/// re-assigns pages from the new order.
#[tokio::test]
async fn test_sort_change_event() {
    let feed_rows = vec![row("Banana", "a"), row("apple", "b"), row("Cherry", "c")];
    let mut h = harness(FlakyFeed::reliable(feed_rows));
    h.curator.start().await.unwrap();
    h.drain();

    h.curator
        .handle_event(SurfaceEvent::SortChanged {
            event_id: SurfaceEvent::new_event_id(),
            mode: SortMode::Alphabetical,
        })
        .await
        .unwrap();

    let titles: Vec<String> = h
        .curator
        .state()
        .cards
        .iter()
        .map(|c| c.title.clone())
        .collect();
    assert_eq!(titles, vec!["apple", "Banana", "Cherry"]);
    assert_eq!(h.curator.sort(), SortMode::Alphabetical);
}

// =============================================================================
// Test 8: Session-Scoped Current Page
// =============================================================================

/// The current page survives a new orchestration run over the same session
/// store, and an out-of-range page snaps back.
#[tokio::test]
async fn test_current_page_persists_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let session = Box::new(SessionStore::open(&path));
        let mut h = harness_with(
            FlakyFeed::reliable(rows(23)),
            FakeProber::default(),
            test_config(),
            session,
        );
        h.curator.start().await.unwrap();
        h.curator
            .handle_event(SurfaceEvent::GoToPage {
                event_id: SurfaceEvent::new_event_id(),
                page: 3,
            })
            .await
            .unwrap();
    }

    // Same session, fresh run: the page is restored
    {
        let session = SessionStore::open(&path);
        assert_eq!(session.get(CURRENT_PAGE_KEY), Some("3".to_string()));

        let mut h = harness_with(
            FlakyFeed::reliable(rows(23)),
            FakeProber::default(),
            test_config(),
            Box::new(session),
        );
        h.curator.start().await.unwrap();
        let (current, ..) = last_page_view(&h.drain());
        assert_eq!(current, 3);
    }

    // Fresh run over a smaller feed: the remembered page is out of range
    {
        let session = Box::new(SessionStore::open(&path));
        let mut h = harness_with(
            FlakyFeed::reliable(rows(5)),
            FakeProber::default(),
            test_config(),
            session,
        );
        h.curator.start().await.unwrap();
        let (current, ..) = last_page_view(&h.drain());
        assert_eq!(current, 1);
    }
}

// =============================================================================
// Test 9: Favorites
// =============================================================================

/// Toggling favorites persists a lowercase-title JSON array and surfaces
/// a FavoritesChanged message; a reconnect replays the stored set.
#[tokio::test]
async fn test_favorites_toggle_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let favorites = FavoritesFile::new(dir.path().join("favorites.json"));

    let (tx, mut rx) = mpsc::channel(256);
    let mut curator = Curator::new(
        FlakyFeed::reliable(rows(3)),
        Arc::new(FakeProber::default()),
        test_config(),
        Box::new(MemoryStore::new()),
        tx,
    )
    .with_favorites_file(favorites.clone());
    curator.start().await.unwrap();

    curator
        .handle_event(SurfaceEvent::FavoriteToggled {
            event_id: SurfaceEvent::new_event_id(),
            title: "Card 01".to_string(),
        })
        .await
        .unwrap();

    let mut titles = None;
    while let Ok(message) = rx.try_recv() {
        if let CuratorMessage::FavoritesChanged { titles: t } = message {
            titles = Some(t);
        }
    }
    assert_eq!(titles, Some(vec!["card 01".to_string()]));

    // On-disk shape: JSON array of lowercase titles
    let body = std::fs::read_to_string(favorites.path()).unwrap();
    let stored: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(stored, vec!["card 01"]);

    // A fresh curator over the same file replays the set on connect
    let (tx, mut rx) = mpsc::channel(256);
    let mut curator = Curator::new(
        FlakyFeed::reliable(rows(3)),
        Arc::new(FakeProber::default()),
        test_config(),
        Box::new(MemoryStore::new()),
        tx,
    )
    .with_favorites_file(favorites);
    curator.start().await.unwrap();
    curator
        .handle_event(SurfaceEvent::Connected {
            event_id: SurfaceEvent::new_event_id(),
            surface: SurfaceKind::Headless,
        })
        .await
        .unwrap();

    let mut replayed = false;
    while let Ok(message) = rx.try_recv() {
        if let CuratorMessage::FavoritesChanged { titles } = message {
            replayed = titles == vec!["card 01".to_string()];
        }
    }
    assert!(replayed, "Connected should replay the favorites set");
}

// =============================================================================
// Test 10: Empty Feed
// =============================================================================

/// An empty feed renders an empty gallery with page count 1 and finishes
/// the preloader immediately.
#[tokio::test]
async fn test_empty_feed() {
    let mut h = harness(FlakyFeed::reliable(Vec::new()));
    h.curator.start().await.unwrap();

    assert_eq!(h.curator.phase(), CuratorPhase::Rendered);
    let messages = h.run_preload().await;
    let (current, pages, matched, total, visible) = last_page_view(&messages);
    assert_eq!((current, pages, matched, total, visible), (1, 1, 0, 0, 0));
}

// =============================================================================
// Test 11: Quit Round Trip
// =============================================================================

/// QuitRequested is acked and answered with a Quit directive.
#[tokio::test]
async fn test_quit_round_trip() {
    let mut h = harness(FlakyFeed::reliable(rows(1)));
    h.curator.start().await.unwrap();
    h.drain();

    h.curator
        .handle_event(SurfaceEvent::QuitRequested {
            event_id: SurfaceEvent::new_event_id(),
        })
        .await
        .unwrap();

    let messages = h.drain();
    assert!(messages.iter().any(|m| matches!(m, CuratorMessage::Ack { .. })));
    assert!(messages.iter().any(|m| matches!(m, CuratorMessage::Quit { .. })));
}
