//! Surface Events
//!
//! Events sent from UI surfaces to the Curator. Surfaces are "dumb"
//! renderers that forward user actions - they report what happened and the
//! Curator decides how the gallery responds.

use serde::{Deserialize, Serialize};

use crate::card::SortMode;
use crate::messages::EventId;

/// Events from UI surfaces to the Curator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SurfaceEvent {
    /// Surface connected to the Curator
    Connected {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Surface kind identifier
        surface: SurfaceKind,
    },

    /// Search input changed (fires on every keystroke)
    QueryChanged {
        /// Raw query text
        query: String,
    },

    /// Search trigger pressed; runs the same filter path as typing
    SearchSubmitted {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Raw query text
        query: String,
    },

    /// Advance to the next active page (wraps)
    NextPage {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// Go back to the previous active page (wraps)
    PrevPage {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// Jump to a specific page
    GoToPage {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Target page, 1-based
        page: u32,
    },

    /// Change the card ordering (re-renders and re-assigns pages)
    SortChanged {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// The new sort mode
        mode: SortMode,
    },

    /// Toggle a title in the favorites list
    FavoriteToggled {
        /// Event ID for acknowledgment
        event_id: EventId,
        /// Card title (any casing)
        title: String,
    },

    /// Reload the feed from scratch
    RefreshRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },

    /// Surface viewport resized
    Resized {
        /// New width (surface-specific units)
        width: u32,
        /// New height (surface-specific units)
        height: u32,
    },

    /// User requested quit
    QuitRequested {
        /// Event ID for acknowledgment
        event_id: EventId,
    },
}

impl SurfaceEvent {
    /// Generate a new event ID
    pub fn new_event_id() -> EventId {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        EventId(format!("evt_{id}"))
    }

    /// Get the event ID if this event carries one
    pub fn event_id(&self) -> Option<&EventId> {
        match self {
            Self::Connected { event_id, .. }
            | Self::SearchSubmitted { event_id, .. }
            | Self::NextPage { event_id }
            | Self::PrevPage { event_id }
            | Self::GoToPage { event_id, .. }
            | Self::SortChanged { event_id, .. }
            | Self::FavoriteToggled { event_id, .. }
            | Self::RefreshRequested { event_id }
            | Self::QuitRequested { event_id } => Some(event_id),
            Self::QueryChanged { .. } | Self::Resized { .. } => None,
        }
    }
}

/// Kind of UI surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Terminal UI
    Tui,
    /// Headless (testing/automation)
    Headless,
    /// Custom surface kind
    Custom(String),
}

impl SurfaceKind {
    /// Human-readable name
    pub fn name(&self) -> &str {
        match self {
            Self::Tui => "Terminal",
            Self::Headless => "Headless",
            Self::Custom(name) => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_unique() {
        let id1 = SurfaceEvent::new_event_id();
        let id2 = SurfaceEvent::new_event_id();
        assert_ne!(id1.0, id2.0);
    }

    #[test]
    fn test_event_id_presence() {
        let event = SurfaceEvent::NextPage {
            event_id: SurfaceEvent::new_event_id(),
        };
        assert!(event.event_id().is_some());

        let event = SurfaceEvent::QueryChanged {
            query: "x".to_string(),
        };
        assert!(event.event_id().is_none());
    }

    #[test]
    fn test_surface_kind_name() {
        assert_eq!(SurfaceKind::Tui.name(), "Terminal");
        assert_eq!(SurfaceKind::Custom("Web".to_string()).name(), "Web");
    }
}
