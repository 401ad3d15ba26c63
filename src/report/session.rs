use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{ReportError, ReportResult};

const LOGO_STEM: &str = "logo";
const CHART_FILE: &str = "chart.png";
const REPORT_FILE: &str = "business_report.pdf";

/// Scratch directory owned by one report-generation session.
///
/// Every session gets `<root>/business-report-<uuid>/`, so two windows on
/// the same host never overwrite each other's artifacts. Regenerating within
/// a session reuses the same file names.
#[derive(Debug, Clone)]
pub struct ReportSession {
    id: Uuid,
    dir: PathBuf,
}

impl ReportSession {
    /// Create a fresh session directory under `root`.
    pub fn create(root: &Path) -> ReportResult<Self> {
        let id = Uuid::new_v4();
        let dir = root.join(format!("business-report-{id}"));
        std::fs::create_dir_all(&dir).map_err(|e| ReportError::io(&dir, e))?;
        log::debug!("created report session directory {}", dir.display());
        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `logo.png` or `logo.jpg`, matching the uploaded bytes.
    pub fn logo_path(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{LOGO_STEM}.{extension}"))
    }

    pub fn chart_path(&self) -> PathBuf {
        self.dir.join(CHART_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }

    /// Remove the directory and everything in it.
    pub fn cleanup(&self) -> ReportResult<()> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReportError::io(&self.dir, e)),
        }
    }
}
