//! Content region widget
//!
//! Renders whatever the shell's content region holds: the search home with
//! its suggestions while the shell is closed, an explicit loading state, the fragment as text
//! followed by its feature controller's data, or an error panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use sv_app::features::FeatureController;
use sv_app::{ContentBody, ErrorPanel, ShellPhase};
use sv_core::APP_NAME;

use crate::fragment_text::fragment_lines;
use crate::theme::{palette, styles};

/// Key hints shown on the search home
const HOME_HINTS: &[(&str, &str)] = &[
    ("l", "Patient records"),
    ("a", "New patient"),
    ("d", "Dashboard"),
    ("u", "User management"),
    ("g", "Settings"),
    ("v", "Activity log"),
    ("c", "Change log"),
    ("q", "Quit"),
];

pub struct ContentView<'a> {
    body: &'a ContentBody,
    feature: Option<&'a FeatureController>,
    search: Vec<String>,
    phase: ShellPhase,
    scroll: usize,
}

impl<'a> ContentView<'a> {
    pub fn new(body: &'a ContentBody, phase: ShellPhase) -> Self {
        Self {
            body,
            feature: None,
            search: Vec::new(),
            phase,
            scroll: 0,
        }
    }

    pub fn feature(mut self, feature: Option<&'a FeatureController>) -> Self {
        self.feature = feature;
        self
    }

    /// Patient search lines for the home screen
    pub fn search(mut self, lines: Vec<String>) -> Self {
        self.search = lines;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

/// Styled lines for a content body, before scrolling
pub fn content_lines(
    body: &ContentBody,
    feature: Option<&FeatureController>,
    search: &[String],
) -> Vec<Line<'static>> {
    match body {
        ContentBody::Empty => home_lines(search),
        ContentBody::Loading(target) => vec![
            Line::default(),
            Line::from(Span::styled(
                format!("  Loading {}...", target.view.title()),
                styles::text_muted(),
            )),
        ],
        ContentBody::Fragment { html, .. } => {
            let mut lines: Vec<Line<'static>> = fragment_lines(html)
                .into_iter()
                .map(|text| Line::from(Span::styled(text, styles::text_primary())))
                .collect();
            if let Some(feature) = feature {
                if !lines.is_empty() {
                    lines.push(Line::default());
                }
                lines.extend(feature.lines().into_iter().map(feature_line));
            }
            lines
        }
        ContentBody::Error { panel, .. } => error_lines(panel),
    }
}

fn home_lines(search: &[String]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(format!("  {}", APP_NAME), styles::accent_bold())),
        Line::from(Span::styled(
            "  [/] Search patients, or open a view:",
            styles::text_secondary(),
        )),
        Line::default(),
    ];
    if !search.is_empty() {
        lines.extend(search.iter().map(|text| feature_line(format!("  {}", text.trim_end()))));
        lines.push(Line::default());
    }
    lines.extend(HOME_HINTS.iter().map(|(key, label)| {
        Line::from(vec![
            Span::styled("  [", styles::text_muted()),
            Span::styled(*key, styles::keybinding()),
            Span::styled("] ", styles::text_muted()),
            Span::styled(*label, styles::text_secondary()),
        ])
    }));
    lines
}

/// Feature data line; lists mark their selection with '>'
fn feature_line(text: String) -> Line<'static> {
    let marker = text.trim_start();
    if marker.starts_with('>') {
        Line::from(Span::styled(text, styles::focused_selected()))
    } else if marker.starts_with('!') {
        Line::from(Span::styled(text, styles::status_red()))
    } else {
        Line::from(Span::styled(text, styles::text_secondary()))
    }
}

fn error_lines(panel: &ErrorPanel) -> Vec<Line<'static>> {
    vec![
        Line::default(),
        Line::from(Span::styled(format!("  {}", panel.message), styles::text_primary())),
        Line::default(),
        Line::from(vec![
            Span::styled("  [", styles::text_muted()),
            Span::styled("Esc", styles::keybinding()),
            Span::styled("] Back   [", styles::text_muted()),
            Span::styled("r", styles::keybinding()),
            Span::styled("] Retry", styles::text_muted()),
        ]),
    ]
}

impl Widget for ContentView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = match self.body {
            ContentBody::Error { panel, .. } => {
                let title = match panel.status {
                    Some(status) => format!(" {} ({}) ", panel.title, status),
                    None => format!(" {} ", panel.title),
                };
                styles::error_block(title)
            }
            _ => styles::glass_block(self.phase == ShellPhase::Active),
        }
        .style(Style::default().bg(palette::CARD_BG));

        let mut lines = content_lines(self.body, self.feature, &self.search);
        if self.phase == ShellPhase::Exiting {
            for line in &mut lines {
                line.style = line.style.add_modifier(Modifier::DIM);
            }
        }

        let max_offset = lines.len().saturating_sub(1);
        let offset = self.scroll.min(max_offset).min(u16::MAX as usize) as u16;

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .render(area, buf);
    }
}
