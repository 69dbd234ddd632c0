//! Status bar widget
//!
//! One row under the content. The left side holds a confirmation prompt,
//! the line being typed, the latest notice, or key hints; the right side
//! shows the shell state.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use sv_app::features::{FeatureController, FormKind};
use sv_app::{AppState, ContentBody, EditTarget, HeaderState, ShellPhase};
use sv_core::ViewId;

use crate::theme::styles;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn left_line(&self) -> Line<'static> {
        if let Some(confirm) = &self.state.confirm {
            return Line::from(vec![
                Span::styled(format!(" {} ", confirm.prompt()), styles::status_red()),
                Span::styled("[", styles::text_muted()),
                Span::styled("y", styles::keybinding()),
                Span::styled("] Yes  [", styles::text_muted()),
                Span::styled("n", styles::keybinding()),
                Span::styled("] No", styles::text_muted()),
            ]);
        }

        if let Some(edit) = &self.state.editing {
            return Line::from(vec![
                Span::styled(
                    format!(" {}: ", self.edit_label(edit.target)),
                    styles::text_secondary(),
                ),
                Span::styled(format!("{}_", edit.display()), styles::text_primary()),
                Span::styled("  [", styles::text_muted()),
                Span::styled("Enter", styles::keybinding()),
                Span::styled("] Done  [", styles::text_muted()),
                Span::styled("Esc", styles::keybinding()),
                Span::styled("] Cancel", styles::text_muted()),
            ]);
        }

        if let Some(notice) = &self.state.notice {
            return Line::from(Span::styled(format!(" {}", notice), styles::text_secondary()));
        }

        let mut spans = vec![Span::raw(" ")];
        for (key, label) in self.hints() {
            spans.push(Span::styled("[", styles::text_muted()));
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!("] {}  ", label), styles::text_muted()));
        }
        Line::from(spans)
    }

    fn edit_label(&self, target: EditTarget) -> String {
        match (target, &self.state.feature) {
            (EditTarget::SearchQuery, _) => "Search".to_string(),
            (EditTarget::Field(index), Some(FeatureController::Form(form))) => form
                .fields()
                .get(index)
                .map(|field| field.label.to_string())
                .unwrap_or_else(|| "Value".to_string()),
            (EditTarget::Field(_), _) => "Value".to_string(),
            (EditTarget::UserEmail(id), _) => format!("Email of user {}", id),
        }
    }

    /// Keys that do something in the current view
    fn hints(&self) -> Vec<(&'static str, &'static str)> {
        let mut hints = vec![("Esc", "Back"), ("r", "Reload"), ("q", "Quit")];
        if self.state.router.shell().phase() == ShellPhase::Inactive {
            hints.insert(0, ("/", "Search"));
            return hints;
        }
        if !matches!(
            self.state.router.shell().content(),
            ContentBody::Fragment { .. }
        ) {
            return hints;
        }

        let extra: &[(&str, &str)] = match (&self.state.feature, self.state.current().view) {
            (Some(FeatureController::Users(_)), _) => {
                &[("Enter", "Email"), ("o", "Role"), ("w", "Reset password")]
            }
            (Some(FeatureController::Form(form)), _) if form.kind() == FormKind::Patient => {
                &[("Enter", "Edit field"), ("p", "Predict")]
            }
            (Some(FeatureController::Form(_)), _) => &[("Enter", "Edit field"), ("p", "Save")],
            (_, ViewId::List) => &[("Enter", "Open")],
            (_, ViewId::Details) => &[("e", "Edit"), ("x", "Delete")],
            _ => &[],
        };
        extra.iter().copied().chain(hints).collect()
    }

    fn right_line(&self) -> Line<'static> {
        let shell = self.state.router.shell();
        let loading =
            matches!(shell.header(), HeaderState::Loading) || self.state.router.is_pending();
        let (icon, label, style) = styles::shell_indicator(shell.phase(), loading);
        Line::from(Span::styled(format!("{} {} ", icon, label), style))
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let right = self.right_line();
        let right_width = right.width() as u16;
        let left_room = area.width.saturating_sub(right_width);

        buf.set_line(area.x, area.y, &self.left_line(), left_room);
        if right_width <= area.width {
            buf.set_line(area.x + area.width - right_width, area.y, &right, right_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_app_state, TestTerminal};
    use sv_app::{PendingConfirm, TextEdit};
    use sv_core::EntityId;

    #[test]
    fn test_idle_shows_key_hints_and_search_state() {
        let mut term = TestTerminal::new();
        let state = test_app_state();
        term.render_widget(StatusBar::new(&state), Rect::new(0, 0, 80, 1));

        assert!(term.line_contains(0, "[/] Search"));
        assert!(term.line_contains(0, "[q] Quit"));
        assert!(term.line_contains(0, "○ Search"));
    }

    #[test]
    fn test_password_reset_prompt_names_user() {
        let mut term = TestTerminal::new();
        let mut state = test_app_state();
        state.confirm = Some(PendingConfirm::ResetPassword {
            user_id: 4,
            name: "Nia".to_string(),
        });
        term.render_widget(StatusBar::new(&state), Rect::new(0, 0, 80, 1));

        assert!(term.line_contains(0, "Reset the password of Nia? [y] Yes  [n] No"));
    }

    #[test]
    fn test_typed_query_is_shown() {
        let mut term = TestTerminal::new();
        let mut state = test_app_state();
        state.notice = Some("Deleted patient P-1".to_string());
        state.editing = Some(TextEdit::new(EditTarget::SearchQuery, "ada"));
        term.render_widget(StatusBar::new(&state), Rect::new(0, 0, 80, 1));

        assert!(term.line_contains(0, "Search: ada_"));
        assert!(term.line_contains(0, "[Esc] Cancel"));
        assert!(!term.line_contains(0, "Deleted patient P-1"));
    }

    #[test]
    fn test_secret_field_is_masked() {
        let mut term = TestTerminal::new();
        let mut state = test_app_state();
        state.editing = Some(TextEdit::new(EditTarget::Field(2), "hunter2").secret(true));
        term.render_widget(StatusBar::new(&state), Rect::new(0, 0, 80, 1));

        assert!(term.line_contains(0, "Value: *******_"));
        assert!(!term.buffer_contains("hunter2"));
    }

    #[test]
    fn test_confirm_prompt_takes_precedence() {
        let mut term = TestTerminal::new();
        let mut state = test_app_state();
        state.notice = Some("Deleted patient P-1".to_string());
        state.confirm = EntityId::new("P-7").map(PendingConfirm::DeletePatient);
        term.render_widget(StatusBar::new(&state), Rect::new(0, 0, 80, 1));

        assert!(term.line_contains(0, "Delete patient P-7?"));
        assert!(!term.line_contains(0, "Deleted patient P-1"));
    }

    #[test]
    fn test_notice_replaces_hints() {
        let mut term = TestTerminal::new();
        let mut state = test_app_state();
        state.notice = Some("Deleted patient P-1".to_string());
        term.render_widget(StatusBar::new(&state), Rect::new(0, 0, 80, 1));

        assert!(term.line_contains(0, "Deleted patient P-1"));
        assert!(!term.line_contains(0, "[q] Quit"));
    }
}
