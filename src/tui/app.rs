//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling
//! - Service integration

use std::io;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::classifier::ExportedClassifier;
use crate::adapters::encoder::ExportedEncoder;
use crate::adapters::loader::ArtifactLoader;
use crate::application::{ResultExporter, RiskService};
use crate::config::AppConfig;

use super::ui::{
    form::{render_form, FormState},
    render_disclaimer, render_title,
    result::{render_result, ResultState},
};

/// Risk service over the shipped artifact formats.
pub type HullRotService = RiskService<ExportedEncoder, ExportedClassifier>;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    screen: Screen,
    should_quit: bool,
    service: HullRotService,
    exporter: ResultExporter,
    form_state: FormState,
    result_state: Option<ResultState>,
}

impl App {
    /// Load the artifacts named by `config` and build the application.
    ///
    /// Must succeed before the terminal is touched: a failure here means the
    /// form is never shown.
    ///
    /// # Errors
    /// Returns error if the artifacts cannot be loaded or do not fit the schema version.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let loader = ArtifactLoader::new(&config.model_dir, config.schema);
        let artifacts = loader.load().map_err(|e| {
            anyhow!(
                "Model or encoder could not be loaded from {:?}: {}. Set HULLROT_MODEL_DIR to a directory containing encoder.json and hr_risk_model.json.",
                loader.dir(),
                e
            )
        })?;

        let service = RiskService::new(config.schema, artifacts.encoder, artifacts.classifier);
        Ok(Self::with_dependencies(
            service,
            ResultExporter::new(&config.export_dir),
        ))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(service: HullRotService, exporter: ResultExporter) -> Self {
        let form_state = FormState::new(service.schema(), service.encoder());
        Self {
            screen: Screen::Form,
            should_quit: false,
            service,
            exporter,
            form_state,
            result_state: None,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let schema = self.service.schema();
        loop {
            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                render_title(f, chunks[0], schema);
                match (self.screen, &self.result_state) {
                    (Screen::Result, Some(state)) => render_result(f, chunks[1], state),
                    _ => render_form(f, chunks[1], &self.form_state),
                }
                render_disclaimer(f, chunks[2]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key, modifiers),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('r') {
                self.form_state.reset();
            }
            return;
        }

        match key {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::BackTab => {
                self.form_state.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.form_state.next_field();
            }
            KeyCode::Left => {
                self.form_state.cycle_choice(false);
            }
            KeyCode::Right => {
                self.form_state.cycle_choice(true);
            }
            KeyCode::Char(c) => {
                self.form_state.input_char(c);
            }
            KeyCode::Backspace => {
                self.form_state.delete_char();
            }
            KeyCode::Delete => {
                self.form_state.clear_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.export_result();
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.screen = Screen::Form;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.form_state.reset();
                self.result_state = None;
                self.screen = Screen::Form;
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let record = match self.form_state.to_record() {
            Ok(record) => record,
            Err(e) => {
                self.form_state.error_message = Some(e);
                return;
            }
        };

        match self.service.assess(record) {
            Ok(assessment) => {
                self.form_state.error_message = None;
                self.result_state = Some(ResultState::new(assessment, self.service.schema()));
                self.screen = Screen::Result;
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                self.form_state.error_message = Some(e.to_string());
            }
        }
    }

    fn export_result(&mut self) {
        let Some(state) = self.result_state.as_mut() else {
            return;
        };
        let outcome = self
            .exporter
            .write(&state.assessment.record, &state.assessment.result);
        state.export_status = Some(outcome.map_err(|e| {
            tracing::error!("Export failed: {}", e);
            e.to_string()
        }));
    }
}
