//! Image Probes
//!
//! Each rendered card gets one probe against its image URL so the gallery
//! can report preload progress and swap broken art for the fallback. A
//! probe never errors and always settles - success and failure both count
//! toward completion, so one dead link cannot stall the preloader.
//!
//! The Curator spawns one task per probe and drains their outcomes through
//! an mpsc channel from its poll loop; the join is an unordered
//! wait-for-all. Outcomes carry a generation number so results from a
//! superseded reload are ignored instead of cancelled.

use std::time::Duration;

use async_trait::async_trait;

/// Outcome of one settled probe
#[derive(Clone, Copy, Debug)]
pub struct ProbeOutcome {
    /// Which probe generation this outcome belongs to
    pub generation: u64,
    /// Index of the probed card in the card collection
    pub index: usize,
    /// Whether the image URL resolved
    pub ok: bool,
}

/// Probes art URLs; infallible by contract
#[async_trait]
pub trait ArtProber: Send + Sync {
    /// Probe a single URL; `true` when the art is reachable
    async fn probe(&self, url: &str) -> bool;
}

/// HTTP prober using plain GET requests
pub struct HttpProber {
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl ArtProber for HttpProber {
    async fn probe(&self, url: &str) -> bool {
        // Invalid URLs, timeouts, and transport errors all settle as failure
        match self.http_client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_settles_false() {
        let prober = HttpProber::default();
        assert!(!prober.probe("not a url").await);
    }

    #[tokio::test]
    async fn test_unreachable_host_settles_false() {
        let prober = HttpProber::new(Duration::from_millis(200));
        assert!(!prober.probe("http://127.0.0.1:1/missing.png").await);
    }
}
