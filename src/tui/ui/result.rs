//! Prediction result view.

use std::path::PathBuf;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::Assessment;
use crate::domain::{RiskThresholds, RiskTier, SchemaVersion};
use crate::tui::theme::OrchardTheme;

/// Result screen state
#[derive(Debug, Clone)]
pub struct ResultState {
    pub assessment: Assessment,
    pub schema: SchemaVersion,
    /// Outcome of the last export request
    pub export_status: Option<Result<PathBuf, String>>,
}

impl ResultState {
    #[must_use]
    pub fn new(assessment: Assessment, schema: SchemaVersion) -> Self {
        Self {
            assessment,
            schema,
            export_status: None,
        }
    }
}

/// Gauge bands on the 0-100 scale: `[0, medium)`, `[medium, high)`, `[high, 100]`.
#[must_use]
pub fn gauge_bands(thresholds: RiskThresholds) -> [(u16, u16, RiskTier); 3] {
    let edge = |t: f64| (t.clamp(0.0, 1.0) * 100.0).round() as u16;
    let medium = edge(thresholds.medium);
    let high = edge(thresholds.high).max(medium);
    [
        (0, medium, RiskTier::Low),
        (medium, high, RiskTier::Medium),
        (high, 100, RiskTier::High),
    ]
}

/// Probability on the 0-100 gauge scale, truncated.
#[must_use]
pub fn to_percent(probability: f64) -> u16 {
    (probability.clamp(0.0, 1.0) * 100.0).floor() as u16
}

/// Gauge position for `probability`, always inside the band of its tier.
#[must_use]
pub fn gauge_percent(probability: f64, thresholds: RiskThresholds) -> u16 {
    let percent = to_percent(probability);
    let [(_, medium, _), (_, high, _), _] = gauge_bands(thresholds);
    match thresholds.classify(probability) {
        RiskTier::Low => percent.min(medium.saturating_sub(1)),
        RiskTier::Medium => percent.clamp(medium, high.saturating_sub(1).max(medium)),
        RiskTier::High => percent.max(high),
    }
}

fn tier_icon(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::Low => "●",
        RiskTier::Medium => "▲",
        RiskTier::High => "■",
    }
}

/// Render the result view
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0], state);
    render_result_content(f, chunks[1], state);
    render_result_footer(f, chunks[2], state);
}

fn render_result_header(f: &mut Frame, area: Rect, state: &ResultState) {
    let record = &state.assessment.record;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", OrchardTheme::text()),
        Span::styled("Prediction Results", OrchardTheme::title()),
        Span::styled(
            format!(" │ {} · {}", record.orchard, record.variety),
            OrchardTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(OrchardTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_result_content(f: &mut Frame, area: Rect, state: &ResultState) {
    let result = &state.assessment.result;
    let tier = result.risk_tier;
    let tier_style = OrchardTheme::risk_tier(tier);

    let block = Block::default()
        .title(Span::styled(" HR Risk ", OrchardTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(OrchardTheme::border_focused());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Probability
            Constraint::Length(3), // Tier
            Constraint::Length(4), // Gauge
            Constraint::Length(1), // Bands
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let probability = Paragraph::new(Line::from(vec![
        Span::styled("Predicted HR Risk Probability: ", OrchardTheme::text_secondary()),
        Span::styled(result.display_probability(), OrchardTheme::title()),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(probability, chunks[0]);

    let tier_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} {} Risk", tier_icon(tier), tier),
            tier_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            tier.description(),
            OrchardTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(tier_display, chunks[1]);

    if state.schema.shows_gauge() {
        let percent = gauge_percent(result.probability, state.schema.thresholds());
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(" Risk Gauge ", OrchardTheme::text_secondary()))
                    .borders(Borders::ALL)
                    .border_style(OrchardTheme::border()),
            )
            .gauge_style(tier_style)
            .percent(percent)
            .label(format!("{percent} / 100"));
        f.render_widget(gauge, chunks[2]);

        render_bands(f, chunks[3], state.schema.thresholds());
    }
}

/// One row of colored blocks, each band as wide as its share of the scale.
fn render_bands(f: &mut Frame, area: Rect, thresholds: RiskThresholds) {
    let width = u32::from(area.width.saturating_sub(2));
    let mut spans = vec![Span::raw(" ")];
    let mut drawn = 0u32;
    for (i, (start, end, tier)) in gauge_bands(thresholds).into_iter().enumerate() {
        let cells = if i == 2 {
            width.saturating_sub(drawn)
        } else {
            width * u32::from(end - start) / 100
        };
        drawn += cells;
        let label = format!("{start}-{end}");
        let fill = (cells as usize).saturating_sub(label.len());
        spans.push(Span::styled(
            format!("{label}{}", "█".repeat(fill)),
            OrchardTheme::band(tier),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_result_footer(f: &mut Frame, area: Rect, state: &ResultState) {
    let content = match &state.export_status {
        Some(Ok(path)) => Line::from(vec![
            Span::styled("Saved ", OrchardTheme::success()),
            Span::styled(path.display().to_string(), OrchardTheme::text()),
            Span::styled("  [Enter] ", OrchardTheme::key_hint()),
            Span::styled("Back ", OrchardTheme::key_desc()),
            Span::styled("[N] ", OrchardTheme::key_hint()),
            Span::styled("New Assessment", OrchardTheme::key_desc()),
        ]),
        Some(Err(message)) => Line::from(vec![
            Span::styled("! ", OrchardTheme::danger()),
            Span::styled(message.clone(), OrchardTheme::danger()),
        ]),
        None => Line::from(vec![
            Span::styled("[D] ", OrchardTheme::key_hint()),
            Span::styled("Download CSV ", OrchardTheme::key_desc()),
            Span::styled("[Enter] ", OrchardTheme::key_hint()),
            Span::styled("Back ", OrchardTheme::key_desc()),
            Span::styled("[N] ", OrchardTheme::key_hint()),
            Span::styled("New Assessment", OrchardTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(OrchardTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_b_bands() {
        let bands = gauge_bands(SchemaVersion::B.thresholds());
        assert_eq!(
            bands,
            [
                (0, 30, RiskTier::Low),
                (30, 60, RiskTier::Medium),
                (60, 100, RiskTier::High),
            ]
        );
    }

    #[test]
    fn test_band_matches_tier() {
        for schema in [SchemaVersion::A, SchemaVersion::B] {
            let thresholds = schema.thresholds();
            let bands = gauge_bands(thresholds);
            for p in [
                0.0, 0.195, 0.2, 0.29, 0.295, 0.2999, 0.3, 0.45, 0.495, 0.5, 0.595, 0.5999,
                0.6, 0.99, 1.0,
            ] {
                let percent = gauge_percent(p, thresholds);
                let band = bands
                    .iter()
                    .find(|(start, end, tier)| {
                        percent >= *start && (percent < *end || *tier == RiskTier::High)
                    })
                    .map(|(_, _, tier)| *tier);
                assert_eq!(
                    band,
                    Some(thresholds.classify(p)),
                    "{schema}: p = {p}, gauge = {percent}"
                );
            }
        }
    }

    #[test]
    fn test_gauge_just_below_threshold() {
        let thresholds = SchemaVersion::B.thresholds();
        assert_eq!(gauge_percent(0.295, thresholds), 29);
        assert_eq!(gauge_percent(0.595, thresholds), 59);
        assert_eq!(gauge_percent(0.3, thresholds), 30);
        assert_eq!(gauge_percent(0.6, thresholds), 60);
    }

    #[test]
    fn test_to_percent_clamps() {
        assert_eq!(to_percent(-0.5), 0);
        assert_eq!(to_percent(0.456), 45);
        assert_eq!(to_percent(2.0), 100);
    }
}
