//! Curator Core - Headless Gallery Orchestration for cardwall
//!
//! This crate provides the core gallery logic for cardwall, completely
//! independent of any UI framework. It can drive a terminal grid, a web
//! view, or run headless for testing and automation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                           │
//! │        ┌──────────┐   ┌──────────┐   ┌────────────┐          │
//! │        │ Terminal │   │   Web    │   │  Headless  │          │
//! │        └────┬─────┘   └────┬─────┘   └─────┬──────┘          │
//! │             └──────────────┴───────────────┘                 │
//! │                          │                                   │
//! │                   SurfaceEvent (up)                          │
//! │                  CuratorMessage (down)                       │
//! │                          │                                   │
//! └──────────────────────────┼───────────────────────────────────┘
//!                            │
//! ┌──────────────────────────┼───────────────────────────────────┐
//! │                     CURATOR CORE                             │
//! │  ┌───────────────────────┴──────────────────────────────┐    │
//! │  │                      Curator                         │    │
//! │  │  ┌───────┐ ┌───────┐ ┌────────┐ ┌────────┐ ┌──────┐  │    │
//! │  │  │ Feed  │ │ Cards │ │ Paging │ │ Filter │ │Probes│  │    │
//! │  │  └───────┘ └───────┘ └────────┘ └────────┘ └──────┘  │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Curator`]: the orchestrator that sequences fetch, render, page,
//!   filter-bind, and preload progress, with one automatic retry
//! - [`CuratorMessage`]: directives sent from the Curator to UI surfaces
//! - [`SurfaceEvent`]: user actions sent from UI surfaces to the Curator
//! - [`GalleryState`]: the card collection plus paging, query, favorites
//! - [`FeedSource`] / [`ArtProber`]: the two I/O seams, both swappable
//!   for test doubles
//!
//! # Module Overview
//!
//! - [`card`]: row-to-card rendering, badges, fallbacks, natural sort
//! - [`config`]: TOML + environment + CLI-override configuration
//! - [`curator`]: the orchestration state machine
//! - [`events`]: events from UI surfaces to the Curator
//! - [`favorites`]: persistent favorites list
//! - [`feed`]: feed row schema and the HTTP sheet client
//! - [`filter`]: substring query filtering
//! - [`messages`]: messages from the Curator to UI surfaces
//! - [`paging`]: page assignment and wrap-around navigation
//! - [`probe`]: per-card image probes
//! - [`state`]: the gallery state struct
//! - [`store`]: session-scoped key-value persistence
//!
//! # No UI Dependencies
//!
//! This crate has **zero** dependencies on terminal or GUI frameworks.
//! It's pure gallery logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod card;
pub mod config;
pub mod curator;
pub mod events;
pub mod favorites;
pub mod feed;
pub mod filter;
pub mod messages;
pub mod paging;
pub mod probe;
pub mod state;
pub mod store;

// Re-exports for convenience
pub use card::{natural_cmp, Badge, CardRecord, Overlay, SortMode, UNTITLED};
pub use config::{
    default_config_path, load_config, load_config_from_path, ArtConfig, CardwallToml,
    ConfigError, ConfigOverrides, ConfigSource, FeedConfig, GalleryConfig,
};
pub use curator::Curator;
pub use events::{SurfaceEvent, SurfaceKind};
pub use favorites::{FavoriteSet, FavoritesFile};
pub use feed::{FeedError, FeedRow, FeedSource, SheetFeed};
pub use messages::{CuratorMessage, CuratorPhase, EventId, NotifyLevel};
pub use paging::PagingIndex;
pub use probe::{ArtProber, HttpProber, ProbeOutcome};
pub use state::GalleryState;
pub use store::{default_session_path, KvStore, MemoryStore, SessionStore, CURRENT_PAGE_KEY};
