//! Card Grid
//!
//! Lays visible cards out in fixed-size cells, left to right, top to
//! bottom, and draws one bordered card per cell: title, author, badge
//! tags, and either the destination link or the "coming soon" marker.

use curator_core::{Badge, CardRecord};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme;

/// Grid cell width in terminal columns
pub const CARD_WIDTH: u16 = 32;

/// Grid cell height in terminal rows
pub const CARD_HEIGHT: u16 = 7;

/// Compute grid cells for up to `count` cards inside `area`
///
/// Cells that would not fit entirely are dropped; the page size bounds how
/// many cards a page view can carry, the terminal bounds how many we draw.
pub fn grid_slots(area: Rect, count: usize) -> Vec<Rect> {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let rows = (area.height / CARD_HEIGHT) as usize;
    let capacity = columns * rows;

    (0..count.min(capacity))
        .map(|index| {
            let col = (index % columns) as u16;
            let row = (index / columns) as u16;
            Rect::new(
                area.x + col * CARD_WIDTH,
                area.y + row * CARD_HEIGHT,
                CARD_WIDTH.min(area.width),
                CARD_HEIGHT,
            )
        })
        .collect()
}

/// Truncate to a display width, appending an ellipsis when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Short text tag for a badge
fn badge_label(badge: Badge) -> &'static str {
    match badge {
        Badge::Featured => "[FEAT]",
        Badge::New => "[NEW]",
        Badge::Fixed => "[FIXED]",
        Badge::Updated => "[UPD]",
        Badge::Fixing => "[FIXING]",
    }
}

fn badge_style(badge: Badge) -> Style {
    let color = match badge {
        Badge::Featured => theme::BADGE_FEATURED,
        Badge::New => theme::BADGE_NEW,
        Badge::Fixed => theme::BADGE_FIXED,
        Badge::Updated => theme::BADGE_UPDATED,
        Badge::Fixing => theme::BADGE_FIXING,
    };
    Style::default().fg(color)
}

/// Draw one card into its grid cell
pub fn render_card(frame: &mut Frame, slot: Rect, card: &CardRecord, selected: bool, favorite: bool) {
    let border_style = if selected {
        Style::default()
            .fg(theme::CARDWALL_CORAL)
            .add_modifier(Modifier::BOLD)
    } else if card.disabled {
        Style::default().fg(theme::DIM_GRAY)
    } else {
        Style::default()
    };

    let inner_width = slot.width.saturating_sub(2) as usize;
    let mut title = truncate_to_width(&card.title, inner_width.saturating_sub(2));
    if favorite {
        title = format!("♥ {}", truncate_to_width(&card.title, inner_width.saturating_sub(4)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            title,
            if favorite {
                Style::default().fg(theme::FAVORITE_PINK)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            },
        ));

    let mut lines: Vec<Line> = Vec::new();

    if !card.author.is_empty() {
        let author = format!("by {}", card.author);
        for wrapped in textwrap::wrap(&author, inner_width.max(1)).into_iter().take(2) {
            lines.push(Line::from(Span::styled(
                wrapped.into_owned(),
                Style::default().fg(theme::DIM_GRAY),
            )));
        }
    }

    if !card.badges.is_empty() {
        let mut spans: Vec<Span> = Vec::new();
        for overlay in &card.badges {
            if !spans.is_empty() {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(badge_label(overlay.badge), badge_style(overlay.badge)));
        }
        lines.push(Line::from(spans));
    }

    if card.disabled {
        lines.push(Line::from(Span::styled(
            "coming soon",
            Style::default()
                .fg(theme::DIM_GRAY)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            truncate_to_width(&card.link_url, inner_width),
            Style::default().fg(theme::DIM_GRAY),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, slot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grid_slots_fill_left_to_right() {
        let area = Rect::new(0, 0, 70, 16);
        let slots = grid_slots(area, 4);

        // 70/32 = 2 columns, 16/7 = 2 rows
        assert_eq!(slots.len(), 4);
        assert_eq!((slots[0].x, slots[0].y), (0, 0));
        assert_eq!((slots[1].x, slots[1].y), (32, 0));
        assert_eq!((slots[2].x, slots[2].y), (0, 7));
        assert_eq!((slots[3].x, slots[3].y), (32, 7));
    }

    #[test]
    fn test_grid_slots_drop_overflow() {
        let area = Rect::new(0, 0, 70, 7);
        let slots = grid_slots(area, 10);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_grid_slots_narrow_terminal_keeps_one_column() {
        let area = Rect::new(0, 0, 20, 21);
        let slots = grid_slots(area, 5);
        assert_eq!(slots.len(), 3);
        assert!(slots.iter().all(|s| s.x == 0));
        assert!(slots.iter().all(|s| s.width == 20));
    }

    #[test]
    fn test_grid_slots_no_room() {
        let area = Rect::new(0, 0, 40, 3);
        assert!(grid_slots(area, 5).is_empty());
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a very long title", 8), "a very …");
        assert_eq!(truncate_to_width("exact", 5), "exact");
    }

    #[test]
    fn test_badge_labels() {
        assert_eq!(badge_label(Badge::Featured), "[FEAT]");
        assert_eq!(badge_label(Badge::Fixing), "[FIXING]");
    }
}
