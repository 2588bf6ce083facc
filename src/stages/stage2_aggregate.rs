use serde::{Deserialize, Serialize};
use tracing::info;

use crate::heuristics::AnalysisConfig;
use crate::models::{DocumentStore, QuestionsByAnalyst};

use super::analyze_document;

/// Headline numbers for an analysis run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_analysts: usize,
    pub total_questions: usize,
    pub avg_questions_per_analyst: f64,
}

impl AnalysisSummary {
    pub fn from_questions(questions: &QuestionsByAnalyst) -> Self {
        let total_analysts = questions.analyst_count();
        let total_questions = questions.question_count();
        let avg_questions_per_analyst = if total_analysts > 0 {
            total_questions as f64 / total_analysts as f64
        } else {
            0.0
        };

        Self {
            total_analysts,
            total_questions,
            avg_questions_per_analyst,
        }
    }
}

/// Extract historical analyst questions from every document in the store.
///
/// Documents are processed independently in store order, so each analyst's
/// list follows document order and then emission order within a document.
/// Nothing carries over between calls.
pub fn aggregate_questions(store: &DocumentStore, config: &AnalysisConfig) -> QuestionsByAnalyst {
    let mut questions = QuestionsByAnalyst::new();

    for document in store.documents() {
        let analysis = analyze_document(document, config);
        questions.extend(analysis.questions);
    }

    info!(
        "Found {} questions from {} analysts across {} documents",
        questions.question_count(),
        questions.analyst_count(),
        store.len()
    );

    questions
}
