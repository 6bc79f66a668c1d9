//! UI module: View components for the TUI.

pub mod form;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::SchemaVersion;
use crate::tui::theme::OrchardTheme;

pub fn render_title(f: &mut Frame, area: Rect, schema: SchemaVersion) {
    let line = Line::from(vec![
        Span::styled(" Almond Hull Rot Risk Predictor ", OrchardTheme::header()),
        Span::styled(format!(" {schema}"), OrchardTheme::text_muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: Indicative estimate from a model trained on historical orchard records.",
            OrchardTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "Confirm with field scouting before acting on it.",
            OrchardTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(OrchardTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
