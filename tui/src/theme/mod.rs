//! Theme and Colors
//!
//! cardwall's palette: a warm accent for chrome and selection, muted badge
//! colors that stay readable on dark terminals.

use ratatui::style::Color;

// ============================================================================
// Chrome
// ============================================================================

/// Signature accent (headers, selection, gauge)
pub const CARDWALL_CORAL: Color = Color::Rgb(255, 140, 120);

/// Search input text
pub const SEARCH_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(110, 110, 110);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

// ============================================================================
// Badges
// ============================================================================

/// Featured badge - warm gold
pub const BADGE_FEATURED: Color = Color::Rgb(255, 210, 100);

/// New badge - fresh green
pub const BADGE_NEW: Color = Color::Rgb(120, 230, 120);

/// Fixed badge - steady blue
pub const BADGE_FIXED: Color = Color::Rgb(120, 180, 255);

/// Updated badge - bright orange
pub const BADGE_UPDATED: Color = Color::Rgb(255, 170, 90);

/// Fixing badge - caution yellow
pub const BADGE_FIXING: Color = Color::Rgb(235, 220, 110);

/// Favorite marker - soft pink
pub const FAVORITE_PINK: Color = Color::Rgb(255, 160, 180);
