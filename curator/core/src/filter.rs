//! Filter Engine
//!
//! Case-insensitive substring filtering over card titles and authors. No
//! fuzzy matching and no tokenization - a card matches when either field
//! contains the normalized query, and the empty query matches everything.
//! Applying a query never touches page assignment; it only flips the
//! `filtered` flags and re-snaps the current page into the active set.

use crate::card::CardRecord;
use crate::state::GalleryState;

/// Normalize a raw query: trim and lowercase
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Apply a query to the gallery, returning the matched count
///
/// Idempotent: applying the same query twice yields the same visible set.
pub fn apply_query(state: &mut GalleryState, query: &str) -> usize {
    let normalized = normalize(query);
    let mut matched = 0;
    for card in &mut state.cards {
        card.filtered = normalized.is_empty() || matches(card, &normalized);
        if card.filtered {
            matched += 1;
        }
    }
    state.query = normalized;
    state.paging.snap(&state.cards);
    matched
}

/// Substring containment over title OR author, against a normalized query
fn matches(card: &CardRecord, normalized: &str) -> bool {
    card.title.to_lowercase().contains(normalized)
        || card.author.to_lowercase().contains(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(title: &str, author: &str) -> CardRecord {
        CardRecord {
            title: title.to_string(),
            author: author.to_string(),
            image_url: String::new(),
            link_url: String::new(),
            badges: Vec::new(),
            disabled: false,
            page: 1,
            filtered: true,
        }
    }

    fn state() -> GalleryState {
        let mut state = GalleryState::new(2);
        state.install_cards(vec![
            card("Midnight Run", "ava"),
            card("Daybreak", "Rune"),
            card("Starlit Alley", "mori"),
            card("Quiet Hours", "AVA"),
        ]);
        state
    }

    #[test]
    fn test_title_substring_matches() {
        let mut state = state();
        assert_eq!(apply_query(&mut state, "day"), 1);
        let visible: Vec<&str> = state.visible().map(|c| c.title.as_str()).collect();
        assert_eq!(visible, vec!["Daybreak"]);
    }

    #[test]
    fn test_author_substring_matches() {
        let mut state = state();
        assert_eq!(apply_query(&mut state, "AVA"), 2);
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let mut state = state();
        assert_eq!(apply_query(&mut state, "  MIDNIGHT  "), 1);
        assert_eq!(state.query, "midnight");
    }

    #[test]
    fn test_empty_query_matches_all() {
        let mut state = state();
        apply_query(&mut state, "day");
        assert_eq!(apply_query(&mut state, ""), 4);
        assert!(state.cards.iter().all(|c| c.filtered));
    }

    #[test]
    fn test_idempotent() {
        let mut state = state();
        apply_query(&mut state, "run");
        let first: Vec<bool> = state.cards.iter().map(|c| c.filtered).collect();
        apply_query(&mut state, "run");
        let second: Vec<bool> = state.cards.iter().map(|c| c.filtered).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_match_contains_query() {
        let mut state = state();
        let query = "ru";
        apply_query(&mut state, query);
        for card in state.cards.iter().filter(|c| c.filtered) {
            assert!(
                card.title.to_lowercase().contains(query)
                    || card.author.to_lowercase().contains(query),
                "{} / {} should contain {query}",
                card.title,
                card.author
            );
        }
    }

    #[test]
    fn test_filter_does_not_touch_pages() {
        let mut state = state();
        let pages: Vec<u32> = state.cards.iter().map(|c| c.page).collect();
        apply_query(&mut state, "quiet");
        let after: Vec<u32> = state.cards.iter().map(|c| c.page).collect();
        assert_eq!(pages, after);
    }

    #[test]
    fn test_filter_snaps_current_page() {
        let mut state = state();
        state.paging.go_to(2, &state.cards);
        // Only "Midnight Run" (page 1) matches; page 2 empties out
        apply_query(&mut state, "midnight");
        assert_eq!(state.paging.current(), 1);
    }

    #[test]
    fn test_no_match_leaves_nothing_visible() {
        let mut state = state();
        assert_eq!(apply_query(&mut state, "zzz"), 0);
        assert_eq!(state.visible().count(), 0);
        assert_eq!(state.page_count(), 1);
    }
}
