//! Paging Index
//!
//! Fixed-size page assignment and wrap-around navigation. Page numbers are
//! assigned once per render, after the sort order is fixed, and never
//! change while the filter query changes - filtering only decides which
//! pages are "active" (still contain a matching card), and navigation
//! wraps circularly through that active set.

use crate::card::CardRecord;

/// Page assignment and current-page tracking
#[derive(Clone, Debug)]
pub struct PagingIndex {
    /// Cards per page
    page_size: usize,
    /// Current page, 1-based
    current: u32,
}

impl PagingIndex {
    /// Create a paging index; a page size of zero is clamped to one
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    /// Cards per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page, 1-based
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Restore a persisted current page; call [`PagingIndex::snap`] after
    /// the card set is installed to pull it back into range
    pub fn restore(&mut self, page: u32) {
        self.current = page.max(1);
    }

    /// Assign page numbers in sequence order
    ///
    /// Must run after the sort order is fixed and before any filtering, so
    /// page assignment stays stable for the life of the card set.
    pub fn assign_pages(&self, cards: &mut [CardRecord]) {
        for (index, card) in cards.iter_mut().enumerate() {
            card.page = (index / self.page_size) as u32 + 1;
        }
    }

    /// Sorted distinct page numbers that still contain a filtered-in card
    pub fn active_pages(cards: &[CardRecord]) -> Vec<u32> {
        let mut pages: Vec<u32> = cards
            .iter()
            .filter(|card| card.filtered)
            .map(|card| card.page)
            .collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }

    /// Highest active page number, or 1 when nothing is active
    pub fn page_count(cards: &[CardRecord]) -> u32 {
        Self::active_pages(cards).last().copied().unwrap_or(1)
    }

    /// Pull the current page back into the active set if filtering removed
    /// its last card; returns the (possibly unchanged) current page
    pub fn snap(&mut self, cards: &[CardRecord]) -> u32 {
        let active = Self::active_pages(cards);
        if !active.contains(&self.current) {
            self.current = active.first().copied().unwrap_or(1);
        }
        self.current
    }

    /// Jump to a page, snapping to the first active page when the target
    /// is not active
    pub fn go_to(&mut self, page: u32, cards: &[CardRecord]) -> u32 {
        let active = Self::active_pages(cards);
        self.current = if active.contains(&page) {
            page
        } else {
            active.first().copied().unwrap_or(1)
        };
        self.current
    }

    /// Advance to the next active page, wrapping from last to first
    pub fn next(&mut self, cards: &[CardRecord]) -> u32 {
        self.step(cards, 1)
    }

    /// Go back to the previous active page, wrapping from first to last
    pub fn prev(&mut self, cards: &[CardRecord]) -> u32 {
        self.step(cards, -1)
    }

    fn step(&mut self, cards: &[CardRecord], direction: isize) -> u32 {
        let active = Self::active_pages(cards);
        if active.is_empty() {
            self.current = 1;
            return self.current;
        }
        match active.iter().position(|&page| page == self.current) {
            Some(index) => {
                let len = active.len() as isize;
                let next = (index as isize + direction).rem_euclid(len) as usize;
                self.current = active[next];
            }
            // Current page fell out of the active set; snap to the start
            None => self.current = active[0],
        }
        self.current
    }

    /// Whether a card is visible on the current page
    pub fn is_visible(&self, card: &CardRecord) -> bool {
        card.filtered && card.page == self.current
    }
}
