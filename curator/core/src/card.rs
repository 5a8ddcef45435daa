//! Card Rendering
//!
//! Turns feed rows into renderable card records: fallback substitution for
//! missing images and links, badge overlay resolution from flags and
//! status tokens, the disabled ("coming soon") state, and the optional
//! alphabetical sort that fixes the order pages are assigned in.
//!
//! Rendering never fails: malformed individual rows degrade to fallback
//! values instead of aborting the batch, and fully blank rows are dropped.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::ArtConfig;
use crate::feed::{blank, FeedRow};

/// Title used for rows that arrive without one
pub const UNTITLED: &str = "Untitled";

/// How cards are ordered before page numbers are assigned
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Preserve the order the feed delivered
    #[default]
    Sheet,
    /// Case-insensitive, numeric-aware title order
    Alphabetical,
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sheet" => Ok(Self::Sheet),
            "alphabetical" => Ok(Self::Alphabetical),
            other => Err(format!("unknown sort mode: {other} (expected \"sheet\" or \"alphabetical\")")),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sheet => write!(f, "sheet"),
            Self::Alphabetical => write!(f, "alphabetical"),
        }
    }
}

/// Overlay badge kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    /// Curator's pick (from the `featured` flag)
    Featured,
    /// Recently added (flag or `status == "new"`)
    New,
    /// Repaired (from the `fixed` flag)
    Fixed,
    /// Recently changed (`status == "updated"`)
    Updated,
    /// Repair in progress (`status == "fix"`)
    Fixing,
}

impl Badge {
    /// Stable key used to build overlay art file names
    pub fn key(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::New => "new",
            Self::Fixed => "fixed",
            Self::Updated => "updated",
            Self::Fixing => "fixing",
        }
    }
}

/// A badge with its resolved overlay art
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    /// Which badge this overlay draws
    pub badge: Badge,
    /// Resolved art URL
    pub art_url: String,
}

/// One renderable card, derived from one feed row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Trimmed title, never blank
    pub title: String,
    /// Trimmed author, possibly empty
    pub author: String,
    /// Resolved image source (row image or configured fallback)
    pub image_url: String,
    /// Resolved destination (row link or configured fallback)
    pub link_url: String,
    /// Overlays in flag-then-status order
    pub badges: Vec<Overlay>,
    /// Card is "coming soon": no navigable destination
    pub disabled: bool,
    /// Page number, 1-based; assigned after sort and stable across filtering
    pub page: u32,
    /// Whether the card matches the active search query
    pub filtered: bool,
}

/// Render feed rows into card records
///
/// Blank rows are dropped; every surviving row yields exactly one card.
/// With [`SortMode::Alphabetical`] the cards are reordered by
/// case-insensitive, numeric-aware title comparison before the caller
/// assigns page numbers; ties keep feed order (the sort is stable).
pub fn render(rows: &[FeedRow], sort: SortMode, art: &ArtConfig) -> Vec<CardRecord> {
    let mut cards: Vec<CardRecord> = rows
        .iter()
        .filter(|row| !row.is_blank())
        .map(|row| render_row(row, art))
        .collect();

    if sort == SortMode::Alphabetical {
        cards.sort_by(|a, b| natural_cmp(&a.title, &b.title));
    }

    cards
}

fn render_row(row: &FeedRow, art: &ArtConfig) -> CardRecord {
    let status = row
        .status
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    let title = row.title.as_deref().unwrap_or_default().trim();
    let title = if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    };

    let author = row.author.as_deref().unwrap_or_default().trim().to_string();

    let image = row.image.as_deref().unwrap_or_default().trim();
    let image_url = if image.is_empty() || image.eq_ignore_ascii_case("blank") || status == "blank"
    {
        art.fallback_image.clone()
    } else {
        image.to_string()
    };

    let link = row.link.as_deref().unwrap_or_default().trim();
    let link_url = if blank(&row.link) {
        art.fallback_link.clone()
    } else {
        link.to_string()
    };

    // Flag overlays first, then status overlays
    let mut badges = Vec::new();
    if row.featured {
        badges.push(Overlay {
            badge: Badge::Featured,
            art_url: art.static_overlay(Badge::Featured),
        });
    }
    if row.new {
        badges.push(Overlay {
            badge: Badge::New,
            art_url: art.static_overlay(Badge::New),
        });
    }
    if row.fixed {
        badges.push(Overlay {
            badge: Badge::Fixed,
            art_url: art.static_overlay(Badge::Fixed),
        });
    }
    match status.as_str() {
        "new" => badges.push(Overlay {
            badge: Badge::New,
            art_url: art.animated_overlay("new"),
        }),
        "updated" => badges.push(Overlay {
            badge: Badge::Updated,
            art_url: art.animated_overlay("updated"),
        }),
        "fix" => badges.push(Overlay {
            badge: Badge::Fixing,
            art_url: art.static_overlay(Badge::Fixing),
        }),
        _ => {}
    }

    CardRecord {
        title,
        author,
        image_url,
        link_url,
        badges,
        disabled: status == "soon",
        page: 1,
        filtered: true,
    }
}

/// Case-insensitive, numeric-aware string comparison
///
/// Digit runs compare as numbers ("Act 2" < "Act 10"); everything else
/// compares per lowercased character. Leading zeros break numeric ties so
/// the ordering stays total ("07" vs "7" is deterministic).
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().flat_map(char::to_lowercase).peekable();
    let mut right = b.chars().flat_map(char::to_lowercase).peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let xs = take_digits(&mut left);
                    let ys = take_digits(&mut right);
                    let xt = xs.trim_start_matches('0');
                    let yt = ys.trim_start_matches('0');
                    let ord = xt
                        .len()
                        .cmp(&yt.len())
                        .then_with(|| xt.cmp(yt))
                        .then_with(|| xs.len().cmp(&ys.len()));
                    if ord != Ordering::Equal {
                        return ord;
                    }
                } else {
                    let ord = x.cmp(&y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    left.next();
                    right.next();
                }
            }
        }
    }
}

fn take_digits<I: Iterator<Item = char>>(chars: &mut std::iter::Peekable<I>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied() {
        if c.is_ascii_digit() {
            digits.push(c);
            chars.next();
        } else {
            break;
        }
    }
    digits
}
