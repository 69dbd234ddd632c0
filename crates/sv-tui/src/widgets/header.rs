//! Shell header widget
//!
//! Shows the leading back/close control and the view title once a view has
//! rendered, a loading label while a fragment is in flight, and the app name
//! when the shell is closed.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};
use sv_app::{BackControl, Header, HeaderState, ShellPhase};
use sv_core::APP_NAME;

use crate::theme::{palette, styles};

pub struct ShellHeader<'a> {
    header: &'a HeaderState,
    phase: ShellPhase,
    location: &'a str,
}

impl<'a> ShellHeader<'a> {
    pub fn new(header: &'a HeaderState, phase: ShellPhase) -> Self {
        Self {
            header,
            phase,
            location: "",
        }
    }

    /// Show the current hash at the right edge
    pub fn location(mut self, location: &'a str) -> Self {
        self.location = location;
        self
    }

    fn back_spans(header: &Header) -> Vec<Span<'static>> {
        let label = match header.back {
            BackControl::Close => "✕ Close".to_string(),
            BackControl::Back(view) => format!("← {}", view.title()),
        };
        vec![
            Span::styled("[", styles::text_muted()),
            Span::styled("Esc", styles::keybinding()),
            Span::styled("] ", styles::text_muted()),
            Span::styled(label, styles::text_secondary()),
            Span::styled("  │  ", styles::text_muted()),
        ]
    }

    fn left_line(&self) -> Line<'static> {
        let loading = matches!(self.header, HeaderState::Loading);
        let (icon, _, icon_style) = styles::shell_indicator(self.phase, loading);

        let mut spans = vec![Span::raw(" "), Span::styled(icon, icon_style), Span::raw(" ")];
        match self.header {
            HeaderState::Hidden => {
                spans.push(Span::styled(APP_NAME, styles::accent_bold()));
                spans.push(Span::styled(" / ", styles::text_muted()));
                spans.push(Span::styled("Search", styles::text_secondary()));
            }
            HeaderState::Loading => {
                spans.push(Span::styled("Loading...", styles::text_muted()));
            }
            HeaderState::Ready(header) => {
                spans.extend(Self::back_spans(header));
                spans.push(Span::styled(header.title, styles::accent_bold()));
            }
        }
        Line::from(spans)
    }
}

impl Widget for ShellHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.phase == ShellPhase::Active)
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let left = self.left_line();
        let left_width = left.width() as u16;
        buf.set_line(inner.x, inner.y, &left, inner.width);

        if self.location.is_empty() {
            return;
        }
        let right = Line::from(Span::styled(format!("{} ", self.location), styles::text_muted()));
        let right_width = right.width() as u16;
        // Only when it fits without touching the left section
        if left_width + right_width + 2 <= inner.width {
            let x = inner.x + inner.width - right_width;
            buf.set_line(x, inner.y, &right, right_width);
        }
    }
}
