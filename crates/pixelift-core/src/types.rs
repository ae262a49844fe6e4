//! Core data types for the pixelift pipeline.
//!
//! These types record what the pipeline did to each file. They carry nothing
//! forward between files; each file's processing is independent.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The transformation steps a file can go through, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Upscale,
    Downscale,
    Normalize,
}

/// Outcome of a single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step ran and the file was rewritten
    Completed,
    /// The step's condition did not apply; the file was not touched
    Skipped,
    /// The step ran and failed; processing continued
    Failed,
}

/// One step's record within a file report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: StepKind,
    pub status: StepStatus,

    /// Failure detail, present only when `status` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The complete outcome for one processed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path the file was discovered at
    pub file_path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// Width in pixels before any step ran
    pub original_width: u32,

    /// Height in pixels before any step ran
    pub original_height: u32,

    /// Path of the file after processing (changes when normalization
    /// rewrites a `.png` as its `.jpg` sibling)
    pub final_path: PathBuf,

    /// Width after the last successful step, when probeable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_width: Option<u32>,

    /// Height after the last successful step, when probeable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_height: Option<u32>,

    /// Per-step outcomes in pipeline order; skipped steps are recorded,
    /// not omitted
    pub steps: Vec<StepRecord>,
}

impl FileReport {
    /// Create a report for a file with its pre-pipeline dimensions.
    pub fn new(path: &Path, width: u32, height: u32) -> Self {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self {
            file_path: path.to_path_buf(),
            file_name,
            original_width: width,
            original_height: height,
            final_path: path.to_path_buf(),
            final_width: None,
            final_height: None,
            steps: Vec::new(),
        }
    }

    /// Record a step outcome.
    pub fn record(&mut self, step: StepKind, status: StepStatus, message: Option<String>) {
        self.steps.push(StepRecord {
            step,
            status,
            message,
        });
    }

    /// Look up the recorded status for a step, if it was recorded.
    pub fn status(&self, step: StepKind) -> Option<StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| r.status)
    }

    /// Number of steps that ran and failed.
    pub fn failed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|r| r.status == StepStatus::Failed)
            .count()
    }

    /// Whether any step rewrote the file.
    pub fn modified(&self) -> bool {
        self.steps
            .iter()
            .any(|r| r.status == StepStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> FileReport {
        let mut report = FileReport::new(Path::new("/images/shelf.png"), 800, 1600);
        report.record(StepKind::Upscale, StepStatus::Skipped, None);
        report.record(StepKind::Downscale, StepStatus::Completed, None);
        report.record(
            StepKind::Normalize,
            StepStatus::Failed,
            Some("encoder error".to_string()),
        );
        report
    }

    #[test]
    fn test_report_roundtrip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"file_name\":\"shelf.png\""));
        assert!(json.contains("\"status\":\"skipped\""));

        let parsed: FileReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.original_height, 1600);
        assert_eq!(parsed.steps.len(), 3);
    }

    #[test]
    fn test_message_omitted_when_none() {
        let mut report = FileReport::new(Path::new("/images/a.jpg"), 300, 400);
        report.record(StepKind::Upscale, StepStatus::Skipped, None);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("message"));
    }

    #[test]
    fn test_status_lookup_and_counters() {
        let report = sample_report();
        assert_eq!(report.status(StepKind::Upscale), Some(StepStatus::Skipped));
        assert_eq!(
            report.status(StepKind::Downscale),
            Some(StepStatus::Completed)
        );
        assert_eq!(report.failed_steps(), 1);
        assert!(report.modified());
    }

    #[test]
    fn test_untouched_report() {
        let mut report = FileReport::new(Path::new("/images/ok.jpg"), 300, 400);
        report.record(StepKind::Upscale, StepStatus::Skipped, None);
        report.record(StepKind::Downscale, StepStatus::Skipped, None);
        report.record(StepKind::Normalize, StepStatus::Skipped, None);
        assert!(!report.modified());
        assert_eq!(report.failed_steps(), 0);
    }
}
