//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Shell header (back/close control + view title)
    pub header: Rect,

    /// Content region
    pub content: Rect,

    /// One-line status bar (notices, prompts, key hints)
    pub status: Rect,
}

/// Split the screen into header, content and status rows
///
/// The header and content are bordered containers; the status bar is a
/// single bare row.
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Top border + title row + bottom border
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        content: chunks[1],
        status: chunks[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let layout = create(Rect::new(0, 0, 80, 24));

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.content.height, 20); // 24 - 3 - 1
        assert_eq!(layout.content.y, 3);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn test_create_layout_small_terminal() {
        let layout = create(Rect::new(0, 0, 40, 7));

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.content.height, 3);
        assert_eq!(layout.status.height, 1);
    }
}
