use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::io::{AnalysisReport, HumanReport};
use crate::models::QuestionsByAnalyst;

/// Counts carried into the machine report
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderStats {
    pub documents_processed: usize,
    pub extraction_failures: usize,
}

/// Result of Stage 3 rendering
#[derive(Debug, Default)]
pub struct Stage3Result {
    /// Path to machine report (if generated)
    pub machine_path: Option<PathBuf>,
    /// Path to human report (if generated)
    pub human_path: Option<PathBuf>,
}

/// Execute Stage 3: Rendering
///
/// Produces up to two views of the aggregated questions:
/// 1. Machine report: JSON with run metadata, summary and every record
/// 2. Human report: analysts with their questions grouped by fiscal period
pub fn execute_stage3(
    questions: &QuestionsByAnalyst,
    stats: RenderStats,
    machine_output: Option<&Path>,
    human_output: Option<&Path>,
) -> Result<Stage3Result> {
    let mut result = Stage3Result::default();

    if let Some(path) = machine_output {
        info!("Writing analysis report to {:?}", path);
        AnalysisReport::new(questions, stats.documents_processed, stats.extraction_failures)
            .write_json(path)?;
        result.machine_path = Some(path.to_path_buf());
    }

    if let Some(path) = human_output {
        info!("Writing human-readable report to {:?}", path);
        HumanReport::new(questions).write_file(path)?;
        result.human_path = Some(path.to_path_buf());
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_requested_writes_nothing() {
        let result = execute_stage3(&QuestionsByAnalyst::new(), RenderStats::default(), None, None).unwrap();
        assert!(result.machine_path.is_none());
        assert!(result.human_path.is_none());
    }

    #[test]
    fn test_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let machine = dir.path().join("report.json");
        let human = dir.path().join("report.txt");

        let result = execute_stage3(
            &QuestionsByAnalyst::new(),
            RenderStats {
                documents_processed: 3,
                extraction_failures: 1,
            },
            Some(&machine),
            Some(&human),
        )
        .unwrap();

        assert_eq!(result.machine_path, Some(machine.clone()));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&machine).unwrap()).unwrap();
        assert_eq!(json["metadata"]["extraction_failures"], 1);
        assert!(std::fs::read_to_string(&human)
            .unwrap()
            .contains("- Total Analysts: 0"));
    }
}
