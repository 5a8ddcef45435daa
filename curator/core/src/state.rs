//! Gallery State
//!
//! The single shared mutable resource of the core: the rendered card
//! collection plus the paging index, active query, and favorites set. The
//! Curator owns one [`GalleryState`] and hands it by reference to the
//! filter and paging operations - there are no ambient globals, and all
//! mutation happens on the event-loop task, so no locking is needed.

use crate::card::CardRecord;
use crate::favorites::FavoriteSet;
use crate::paging::PagingIndex;

/// All gallery state owned by the Curator
#[derive(Debug)]
pub struct GalleryState {
    /// Rendered cards, rebuilt from scratch on every full reload
    pub cards: Vec<CardRecord>,
    /// Page assignment and navigation
    pub paging: PagingIndex,
    /// Active normalized query (trimmed, lowercased)
    pub query: String,
    /// Favorite titles (lowercase)
    pub favorites: FavoriteSet,
}

impl GalleryState {
    /// Create empty state with the given page size
    pub fn new(page_size: usize) -> Self {
        Self {
            cards: Vec::new(),
            paging: PagingIndex::new(page_size),
            query: String::new(),
            favorites: FavoriteSet::new(),
        }
    }

    /// Replace the card set after a reload and assign page numbers
    ///
    /// The caller re-applies the active query afterwards; the fresh cards
    /// arrive with `filtered = true`.
    pub fn install_cards(&mut self, cards: Vec<CardRecord>) {
        self.cards = cards;
        self.paging.assign_pages(&mut self.cards);
    }

    /// Cards visible right now: filtered in and on the current page
    pub fn visible(&self) -> impl Iterator<Item = &CardRecord> {
        let current = self.paging.current();
        self.cards
            .iter()
            .filter(move |card| card.filtered && card.page == current)
    }

    /// Owned snapshot of the visible cards, for sending to a surface
    pub fn visible_cards(&self) -> Vec<CardRecord> {
        self.visible().cloned().collect()
    }

    /// How many cards match the active query
    pub fn matched(&self) -> usize {
        self.cards.iter().filter(|card| card.filtered).count()
    }

    /// Highest active page number (1 when the gallery is empty)
    pub fn page_count(&self) -> u32 {
        PagingIndex::page_count(&self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(title: &str) -> CardRecord {
        CardRecord {
            title: title.to_string(),
            author: String::new(),
            image_url: String::new(),
            link_url: String::new(),
            badges: Vec::new(),
            disabled: false,
            page: 1,
            filtered: true,
        }
    }

    #[test]
    fn test_install_assigns_pages() {
        let mut state = GalleryState::new(2);
        state.install_cards(vec![card("a"), card("b"), card("c")]);

        assert_eq!(state.cards[0].page, 1);
        assert_eq!(state.cards[1].page, 1);
        assert_eq!(state.cards[2].page, 2);
        assert_eq!(state.page_count(), 2);
    }

    #[test]
    fn test_visible_respects_page_and_filter() {
        let mut state = GalleryState::new(2);
        state.install_cards(vec![card("a"), card("b"), card("c")]);
        state.cards[1].filtered = false;

        let visible: Vec<&str> = state.visible().map(|c| c.title.as_str()).collect();
        assert_eq!(visible, vec!["a"]);
        assert_eq!(state.matched(), 2);
    }

    #[test]
    fn test_visible_cards_snapshot() {
        let mut state = GalleryState::new(10);
        state.install_cards(vec![card("a"), card("b")]);
        let snapshot = state.visible_cards();
        assert_eq!(snapshot.len(), 2);
    }
}
