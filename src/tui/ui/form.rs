//! Orchard and weather data entry form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::domain::schema::{ORCHARD_COLUMN, VARIETY_COLUMN};
use crate::domain::{InputRecord, Measurements, NumericKind, SchemaVersion};
use crate::ports::CategoricalEncoder;
use crate::tui::theme::OrchardTheme;

const DEFAULT_VARIETY: &str = "NP";

/// How a field takes input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Free text
    Text { value: String, default: String },
    /// One of a fixed list, cycled with Left/Right
    Choice {
        options: Vec<String>,
        selected: usize,
        default: usize,
    },
    /// Number typed as text, parsed on submit
    Number {
        kind: NumericKind,
        value: String,
        default: f64,
    },
}

impl FieldInput {
    fn reset(&mut self) {
        match self {
            Self::Text { value, default } => *value = default.clone(),
            Self::Choice {
                selected, default, ..
            } => *selected = *default,
            Self::Number { value, default, .. } => *value = format_default(*default),
        }
    }
}

fn format_default(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Form field definition
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub input: FieldInput,
}

impl FormField {
    /// Text shown in the field box.
    #[must_use]
    pub fn display_value(&self) -> &str {
        match &self.input {
            FieldInput::Text { value, .. } | FieldInput::Number { value, .. } => value,
            FieldInput::Choice {
                options, selected, ..
            } => options.get(*selected).map_or("", String::as_str),
        }
    }
}

/// Form state for one schema version.
///
/// Fields 0 and 1 are Orchard and Variety; the numeric fields follow in record order.
#[derive(Debug, Clone)]
pub struct FormState {
    pub schema: SchemaVersion,
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl FormState {
    /// Build the form for `schema`, taking enumerated choices from the encoder where needed.
    pub fn new<E: CategoricalEncoder + ?Sized>(schema: SchemaVersion, encoder: &E) -> Self {
        let fitted = |column: &str| -> Vec<String> {
            encoder
                .categories(column)
                .map(<[String]>::to_vec)
                .unwrap_or_default()
        };

        let orchard = match schema.default_orchard() {
            Some(default) if schema.free_text_orchard() => FormField {
                label: "Orchard Name",
                hint: "free text",
                input: FieldInput::Text {
                    value: default.to_string(),
                    default: default.to_string(),
                },
            },
            _ => FormField {
                label: "Orchard",
                hint: "←/→ to choose",
                input: choice(fitted(ORCHARD_COLUMN), None),
            },
        };

        let varieties = schema.fixed_varieties().map_or_else(
            || fitted(VARIETY_COLUMN),
            |fixed| fixed.iter().map(|v| (*v).to_string()).collect(),
        );
        let variety = FormField {
            label: "Variety",
            hint: "←/→ to choose",
            input: choice(varieties, Some(DEFAULT_VARIETY)),
        };

        let mut fields = vec![orchard, variety];
        fields.extend(schema.numeric_fields().iter().map(|spec| FormField {
            label: spec.label,
            hint: match spec.kind {
                NumericKind::Rain => "amount",
                NumericKind::DayCount => "whole days",
            },
            input: FieldInput::Number {
                kind: spec.kind,
                value: format_default(spec.default),
                default: spec.default,
            },
        }));

        Self {
            schema,
            fields,
            selected_field: 0,
            error_message: None,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Cycle the current choice field.
    pub fn cycle_choice(&mut self, forward: bool) {
        if let Some(FormField {
            input: FieldInput::Choice {
                options, selected, ..
            },
            ..
        }) = self.fields.get_mut(self.selected_field)
        {
            if options.is_empty() {
                return;
            }
            *selected = if forward {
                (*selected + 1) % options.len()
            } else {
                (*selected + options.len() - 1) % options.len()
            };
            self.error_message = None;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.selected_field) else {
            return;
        };
        let accepted = match &mut field.input {
            FieldInput::Text { value, .. } => {
                if c.is_control() {
                    false
                } else {
                    value.push(c);
                    true
                }
            }
            FieldInput::Number { kind, value, .. } => {
                let ok = c.is_ascii_digit() || (c == '.' && *kind == NumericKind::Rain);
                if ok {
                    value.push(c);
                }
                ok
            }
            FieldInput::Choice { .. } => false,
        };
        if accepted {
            self.error_message = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let Some(FormField {
            input: FieldInput::Text { value, .. } | FieldInput::Number { value, .. },
            ..
        }) = self.fields.get_mut(self.selected_field)
        {
            value.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        if let Some(FormField {
            input: FieldInput::Text { value, .. } | FieldInput::Number { value, .. },
            ..
        }) = self.fields.get_mut(self.selected_field)
        {
            value.clear();
        }
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.input.reset();
        }
        self.selected_field = 0;
        self.error_message = None;
    }

    /// Parse the form into a record of this form's schema version.
    ///
    /// # Errors
    /// Returns a message naming the first field that cannot be parsed.
    pub fn to_record(&self) -> Result<InputRecord, String> {
        let [orchard, variety, numeric @ ..] = self.fields.as_slice() else {
            return Err("Form is incomplete".to_string());
        };

        let categorical = |field: &FormField| -> Result<String, String> {
            let value = field.display_value().trim();
            if value.is_empty() {
                return Err(format!("{}: A value is required", field.label));
            }
            Ok(value.to_string())
        };
        let orchard = categorical(orchard)?;
        let variety = categorical(variety)?;

        let mut values = Vec::with_capacity(numeric.len());
        for field in numeric {
            let text = field.display_value().trim();
            let value: f64 = text
                .parse()
                .map_err(|_| format!("{}: Invalid number", field.label))?;
            values.push(value);
        }

        let measurements = Measurements::from_vec(self.schema, &values)?;
        Ok(InputRecord::new(orchard, variety, measurements))
    }
}

fn choice(options: Vec<String>, preferred: Option<&str>) -> FieldInput {
    let default = preferred
        .and_then(|p| options.iter().position(|o| o == p))
        .unwrap_or(0);
    FieldInput::Choice {
        options,
        selected: default,
        default,
    }
}

/// Render the data entry form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state.schema);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, schema: SchemaVersion) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", OrchardTheme::text()),
        Span::styled("Enter Orchard and Weather Information", OrchardTheme::title()),
        Span::styled(format!(" │ {schema}"), OrchardTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(OrchardTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = state.fields.len().div_ceil(2);

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = if is_selected {
            OrchardTheme::border_focused()
        } else {
            OrchardTheme::border()
        };
        let title_style = if is_selected {
            OrchardTheme::focused()
        } else {
            OrchardTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value = field.display_value();
        let mut spans = vec![Span::raw(" ")];
        if let FieldInput::Choice { .. } = field.input {
            spans.push(Span::styled("◂ ", OrchardTheme::text_muted()));
            spans.push(Span::styled(value, OrchardTheme::text()));
            spans.push(Span::styled(" ▸", OrchardTheme::text_muted()));
        } else if value.is_empty() {
            spans.push(Span::styled(field.hint, OrchardTheme::text_muted()));
        } else {
            spans.push(Span::styled(value, OrchardTheme::text()));
        }
        if is_selected && !matches!(field.input, FieldInput::Choice { .. }) {
            spans.push(Span::styled("▌", OrchardTheme::cursor()));
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", OrchardTheme::danger()),
            Span::styled(err.clone(), OrchardTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", OrchardTheme::key_hint()),
            Span::styled("Navigate ", OrchardTheme::key_desc()),
            Span::styled("[←→] ", OrchardTheme::key_hint()),
            Span::styled("Choose ", OrchardTheme::key_desc()),
            Span::styled("[Enter] ", OrchardTheme::key_hint()),
            Span::styled("Predict HR Risk ", OrchardTheme::key_desc()),
            Span::styled("[Ctrl+R] ", OrchardTheme::key_hint()),
            Span::styled("Defaults ", OrchardTheme::key_desc()),
            Span::styled("[Esc] ", OrchardTheme::key_hint()),
            Span::styled("Quit", OrchardTheme::key_desc()),
        ])
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
    use crate::adapters::encoder::{EncodedColumn, ExportedEncoder, HandleUnknown};
    use crate::domain::{VariantAMeasurements, VariantBMeasurements};

    fn encoder() -> ExportedEncoder {
        ExportedEncoder::OneHot {
            columns: vec![
                EncodedColumn {
                    name: ORCHARD_COLUMN.into(),
                    categories: vec!["Arbuckle".into(), "Capay".into()],
                },
                EncodedColumn {
                    name: VARIETY_COLUMN.into(),
                    categories: vec!["Butte".into(), "NP".into(), "Padre".into()],
                },
            ],
            handle_unknown: HandleUnknown::Error,
        }
    }

    #[test]
    fn test_variant_a_defaults() {
        let form = FormState::new(SchemaVersion::A, &encoder());
        assert_eq!(form.fields.len(), 9);

        let record = form.to_record().expect("Defaults should parse");
        assert_eq!(record.orchard, "Belvedere");
        assert_eq!(record.variety, "NP");
        assert_eq!(
            record.measurements,
            Measurements::A(VariantAMeasurements::default())
        );
    }

    #[test]
    fn test_variant_b_choices_from_encoder() {
        let form = FormState::new(SchemaVersion::B, &encoder());
        assert_eq!(form.fields.len(), 8);

        let record = form.to_record().expect("Defaults should parse");
        assert_eq!(record.orchard, "Arbuckle");
        assert_eq!(record.variety, "NP");
        assert_eq!(
            record.measurements,
            Measurements::B(VariantBMeasurements::default())
        );
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let mut form = FormState::new(SchemaVersion::B, &encoder());
        form.cycle_choice(false);
        assert_eq!(form.fields[0].display_value(), "Capay");
        form.cycle_choice(true);
        assert_eq!(form.fields[0].display_value(), "Arbuckle");

        // Not a choice field: no effect.
        form.selected_field = 2;
        form.cycle_choice(true);
        assert_eq!(form.fields[2].display_value(), "20");
    }

    #[test]
    fn test_day_count_rejects_decimal_point() {
        let mut form = FormState::new(SchemaVersion::A, &encoder());
        form.selected_field = 6; // Days Over 35°C
        form.clear_field();
        form.input_char('1');
        form.input_char('.');
        form.input_char('2');
        assert_eq!(form.fields[6].display_value(), "12");

        form.selected_field = 2; // Total Rain
        form.clear_field();
        for c in "12.5".chars() {
            form.input_char(c);
        }
        assert_eq!(form.fields[2].display_value(), "12.5");
    }

    #[test]
    fn test_invalid_number_names_field() {
        let mut form = FormState::new(SchemaVersion::A, &encoder());
        form.selected_field = 3;
        form.clear_field();
        let err = form.to_record().unwrap_err();
        assert!(err.starts_with("Rain in January (mm)"), "{err}");
    }

    #[test]
    fn test_empty_orchard_rejected() {
        let mut form = FormState::new(SchemaVersion::A, &encoder());
        form.clear_field();
        assert!(form.to_record().is_err());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut form = FormState::new(SchemaVersion::A, &encoder());
        form.input_char('X');
        form.next_field();
        form.cycle_choice(true);
        form.error_message = Some("boom".into());

        form.reset();
        assert_eq!(form.selected_field, 0);
        assert!(form.error_message.is_none());
        assert_eq!(form.fields[0].display_value(), "Belvedere");
        assert_eq!(form.fields[1].display_value(), "NP");
    }

    #[test]
    fn test_navigation_wraps() {
        let mut form = FormState::new(SchemaVersion::B, &encoder());
        form.prev_field();
        assert_eq!(form.selected_field, 7);
        form.next_field();
        assert_eq!(form.selected_field, 0);
    }
}
