use tracing::{info, warn};

use crate::loader::{LoadError, load_report_bytes};
use crate::model::ValidationReport;
use crate::render::ViewState;

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedReport {
    pub source_name: String,
    pub byte_len: usize,
    pub report: ValidationReport,
}

/// Owns the single report being viewed plus its transient view toggles.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<LoadedReport>,
    error: Option<String>,
    view: ViewState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any current report. On failure the previous report is dropped
    /// as well and the message is kept for display.
    pub fn load_bytes(&mut self, bytes: &[u8], source_name: &str) -> Result<(), LoadError> {
        self.view = ViewState::default();
        match load_report_bytes(bytes) {
            Ok(report) => {
                info!(
                    source = %source_name,
                    result_type = %report.result_type,
                    qa_results = report.qa_results.len(),
                    "report loaded"
                );
                self.current = Some(LoadedReport {
                    source_name: source_name.to_string(),
                    byte_len: bytes.len(),
                    report,
                });
                self.error = None;
                Ok(())
            }
            Err(err) => {
                warn!(source = %source_name, kind = err.kind(), error = %err, "report rejected");
                self.current = None;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Records a failure that happened before any bytes could be parsed,
    /// such as an unreadable path. Leaves the session with no report.
    pub fn fail(&mut self, message: String) {
        warn!(error = %message, "report unavailable");
        self.current = None;
        self.error = Some(message);
        self.view = ViewState::default();
    }

    pub fn close(&mut self) {
        self.current = None;
        self.error = None;
        self.view = ViewState::default();
    }

    pub fn loaded(&self) -> Option<&LoadedReport> {
        self.current.as_ref()
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.current.as_ref().map(|loaded| &loaded.report)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Toggles are ignored while no report is loaded.
    pub fn view_mut(&mut self) -> Option<&mut ViewState> {
        if self.current.is_some() {
            Some(&mut self.view)
        } else {
            None
        }
    }

    pub fn toggle_chunk(&mut self, index: usize) -> bool {
        self.view_mut().map(|view| view.toggle_chunk(index)).is_some()
    }

    pub fn toggle_details(&mut self) -> bool {
        self.view_mut()
            .map(|view| view.show_details = !view.show_details)
            .is_some()
    }

    pub fn toggle_prompt(&mut self) -> bool {
        self.view_mut()
            .map(|view| view.show_prompt = !view.show_prompt)
            .is_some()
    }

    pub fn toggle_sql_facts(&mut self) -> bool {
        self.view_mut()
            .map(|view| view.show_sql_facts = !view.show_sql_facts)
            .is_some()
    }

    pub fn toggle_llm_summary(&mut self) -> bool {
        self.view_mut()
            .map(|view| view.show_llm_summary = !view.show_llm_summary)
            .is_some()
    }
}
