//! Report-kind switcher drawn above the report table.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// One line of `label (count)` tabs with `active` bracketed.
pub fn render_sub_tabs(tabs: &[(&str, usize)], active: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(tabs.len() * 2 + 1);
    spans.push(Span::raw(" "));

    for (i, (label, count)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", theme::key_hint()));
        }
        if i == active {
            spans.push(Span::styled(
                format!("[{label} {count}]"),
                theme::tab_active().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(format!("{label} {count}"), theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_tab_is_bracketed() {
        let line = render_sub_tabs(&[("Tickets", 3), ("Tasks", 0)], 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " Tickets 3 │ [Tasks 0]");
    }
}
