use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::data::model::Dataset;
use crate::report::chart::{ChartFigure, ChartKind, ChartSpec, render_chart};
use crate::report::session::ReportSession;
use crate::report::summary::{Summary, summarize};
use crate::report::{ReportArtifact, ReportRequest, assemble_report};
use crate::settings::ReportSettings;

// ---------------------------------------------------------------------------
// Per-dataset session
// ---------------------------------------------------------------------------

/// Everything derived from one loaded dataset.
///
/// Replaced as a whole when a new file is loaded, so the summary and the
/// chart always describe the same table.
pub struct Session {
    pub dataset: Dataset,
    pub source_name: String,
    pub chart_spec: ChartSpec,
    pub summary: Summary,
    /// `None` while the current spec cannot be drawn (see `chart_error`).
    pub figure: Option<ChartFigure>,
    pub chart_error: Option<String>,
    pub report: Option<ReportArtifact>,
    scratch: ReportSession,
}

impl Session {
    fn rerender(&mut self) {
        match render_chart(&self.dataset, &self.chart_spec) {
            Ok(figure) => {
                self.figure = Some(figure);
                self.chart_error = None;
            }
            Err(e) => {
                log::warn!("Cannot draw {}: {e}", self.chart_spec.title());
                self.figure = None;
                self.chart_error = Some(e.to_string());
            }
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch.dir()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.scratch.cleanup() {
            log::warn!("Could not remove report scratch directory: {e}");
        }
    }
}

/// Default axes: first column on x, first numeric column on y.
fn default_spec(dataset: &Dataset) -> ChartSpec {
    let names = dataset.column_names();
    let x = names.first().cloned().unwrap_or_default();
    let y = dataset
        .numeric_columns()
        .map(|c| c.name.clone())
        .find(|name| *name != x)
        .or_else(|| names.get(1).cloned())
        .unwrap_or_else(|| x.clone());
    ChartSpec::new(x, y, ChartKind::Line)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// An uploaded logo, kept as raw bytes until a report is generated.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Charts,
    Summary,
    Report,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: ReportSettings,

    /// Loaded dataset and everything derived from it (None until a file is loaded).
    pub session: Option<Session>,

    /// Optional company logo for the report.
    pub logo: Option<LogoUpload>,

    pub tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: ReportSettings) -> Self {
        Self {
            settings,
            session: None,
            logo: None,
            tab: Tab::Charts,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, replacing any previous session.
    pub fn set_dataset(&mut self, dataset: Dataset, source_name: &str) -> Result<()> {
        // drop the old session first so its scratch directory goes away
        self.session = None;

        let scratch = ReportSession::create(&self.settings.temp_root())
            .context("creating report scratch directory")?;
        let mut session = Session {
            chart_spec: default_spec(&dataset),
            summary: summarize(&dataset),
            dataset,
            source_name: source_name.to_string(),
            figure: None,
            chart_error: None,
            report: None,
            scratch,
        };
        session.rerender();

        log::info!(
            "Loaded {source_name}: {} rows, columns {:?}",
            session.dataset.len(),
            session.dataset.column_names()
        );

        self.session = Some(session);
        self.status_message = None;
        Ok(())
    }

    /// Apply a new chart selection and redraw.
    pub fn set_chart_spec(&mut self, spec: ChartSpec) {
        if let Some(session) = &mut self.session {
            if session.chart_spec != spec {
                session.chart_spec = spec;
                session.rerender();
            }
        }
    }

    pub fn set_logo(&mut self, name: &str, bytes: Vec<u8>) {
        log::info!("Logo {name} attached ({} bytes)", bytes.len());
        self.logo = Some(LogoUpload {
            name: name.to_string(),
            bytes,
        });
    }

    pub fn clear_logo(&mut self) {
        self.logo = None;
    }

    /// Assemble the PDF for the current dataset, chart and logo.
    pub fn generate_report(&mut self) -> Result<PathBuf> {
        let session = self.session.as_mut().context("No dataset loaded")?;
        let figure = session.figure.as_ref().with_context(|| {
            format!(
                "The chart cannot be drawn: {}",
                session.chart_error.as_deref().unwrap_or("no chart")
            )
        })?;

        let request = ReportRequest {
            dataset: &session.dataset,
            logo: self.logo.as_ref().map(|l| l.bytes.as_slice()),
            summary: &session.summary,
            chart: figure,
        };
        let artifact = assemble_report(&request, &session.scratch, &self.settings)
            .context("generating report")?;
        let path = artifact.path.clone();
        session.report = Some(artifact);
        Ok(path)
    }

    /// Copy the generated report to a user-chosen location.
    pub fn save_report_to(&self, destination: &Path) -> Result<()> {
        let report = self
            .session
            .as_ref()
            .and_then(|s| s.report.as_ref())
            .context("No report has been generated yet")?;
        std::fs::copy(&report.path, destination)
            .with_context(|| format!("saving report to {}", destination.display()))?;
        log::info!("Report saved to {}", destination.display());
        Ok(())
    }

    /// Record a failure for the status line.
    pub fn report_error(&mut self, e: &anyhow::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }
}
