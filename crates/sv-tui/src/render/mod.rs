//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use sv_app::AppState;

use crate::theme::palette;
use crate::{layout, widgets};

/// Render the complete UI (View function in TEA)
///
/// Pure with respect to the state: scrolling is clamped at draw time.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area);
    let router = &state.router;
    let shell = router.shell();

    frame.render_widget(
        widgets::ShellHeader::new(shell.header(), shell.phase()).location(router.location()),
        areas.header,
    );

    let body = shell.content();
    frame.render_widget(
        widgets::ContentView::new(&body, shell.phase())
            .feature(state.feature.as_ref())
            .search(state.search.lines())
            .scroll(state.scroll),
        areas.content,
    );

    frame.render_widget(widgets::StatusBar::new(state), areas.status);
}
