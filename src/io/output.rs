use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::QuestionsByAnalyst;
use crate::stages::AnalysisSummary;

/// Machine-readable analysis output
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport<'a> {
    pub metadata: ReportMetadata,
    /// Questions keyed by analyst display name
    pub analysts: &'a QuestionsByAnalyst,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub run_id: String,
    pub documents_processed: usize,
    pub extraction_failures: usize,
    pub summary: AnalysisSummary,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(
        questions: &'a QuestionsByAnalyst,
        documents_processed: usize,
        extraction_failures: usize,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                run_id: uuid::Uuid::new_v4().to_string(),
                documents_processed,
                extraction_failures,
                summary: AnalysisSummary::from_questions(questions),
            },
            analysts: questions,
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable question report
pub struct HumanReport<'a> {
    questions: &'a QuestionsByAnalyst,
}

impl<'a> HumanReport<'a> {
    pub fn new(questions: &'a QuestionsByAnalyst) -> Self {
        Self { questions }
    }

    /// Format as text: analysts alphabetically, periods newest first
    pub fn format(&self) -> String {
        let mut output = String::new();

        for (name, analyst) in self.questions.iter() {
            output.push_str(&format!(
                "{} ({}) - {} questions\n",
                name,
                analyst.firm,
                analyst.questions.len()
            ));

            for (period, records) in analyst.by_period() {
                output.push_str(&format!("\n  {}\n", period));
                for record in records {
                    let wrapped = wrap_text(&record.question, 76);
                    for (i, line) in wrapped.lines().enumerate() {
                        let bullet = if i == 0 { "  - " } else { "    " };
                        output.push_str(bullet);
                        output.push_str(line);
                        output.push('\n');
                    }
                }
            }
            output.push_str("\n---\n\n");
        }

        let summary = AnalysisSummary::from_questions(self.questions);
        output.push_str("Analysis Summary\n");
        output.push_str(&format!("- Total Analysts: {}\n", summary.total_analysts));
        output.push_str(&format!("- Total Questions: {}\n", summary.total_questions));
        output.push_str(&format!(
            "- Avg Questions/Analyst: {:.1}\n",
            summary.avg_questions_per_analyst
        ));

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Write plain text (generated scripts, extracted text) to a file
pub fn write_text_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("Failed to write file: {:?}", path))
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalystIdentity, DocumentKey, FiscalPeriod, QuestionRecord, Quarter};
    use chrono::NaiveDate;

    fn sample() -> QuestionsByAnalyst {
        let call_date = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut questions = QuestionsByAnalyst::new();
        for (text, period) in [
            ("Older question?", FiscalPeriod::new(Quarter::Q4, "2023")),
            ("Newer question?", FiscalPeriod::new(Quarter::Q1, "2024")),
        ] {
            questions.push(QuestionRecord {
                analyst: AnalystIdentity::new("Jane Doe"),
                question: text.to_string(),
                source_document: "call.txt".to_string(),
                document_key: DocumentKey::derive("call.txt", &call_date),
                fiscal_period: period,
                call_date,
            });
        }
        questions
    }

    #[test]
    fn test_human_report_orders_periods_newest_first() {
        let questions = sample();
        let text = HumanReport::new(&questions).format();

        assert!(text.starts_with("Jane Doe () - 2 questions\n"));
        let newer = text.find("Q1 FY2024").unwrap();
        let older = text.find("Q4 FY2023").unwrap();
        assert!(newer < older);
        assert!(text.contains("  - Newer question?\n"));
        assert!(text.contains("- Avg Questions/Analyst: 2.0\n"));
    }

    #[test]
    fn test_machine_report_json_shape() {
        let questions = sample();
        let report = AnalysisReport::new(&questions, 1, 0);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["metadata"]["documents_processed"], 1);
        assert_eq!(value["metadata"]["summary"]["total_questions"], 2);
        let jane = &value["analysts"]["Jane Doe"];
        assert_eq!(jane["firm"], "");
        assert_eq!(jane["questions"][0]["question"], "Older question?");
        assert_eq!(jane["questions"][0]["fiscal_period"], "Q4 FY2023");
    }

    #[test]
    fn test_machine_report_unknown_period_is_labelled() {
        let mut questions = QuestionsByAnalyst::new();
        let mut record = sample().get("Jane Doe").unwrap().questions[0].clone();
        record.fiscal_period = FiscalPeriod::default();
        questions.push(record);

        let value = serde_json::to_value(AnalysisReport::new(&questions, 1, 0)).unwrap();
        let period = &value["analysts"]["Jane Doe"]["questions"][0]["fiscal_period"];
        assert_eq!(period, "Quarter Unknown");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let questions = sample();

        AnalysisReport::new(&questions, 1, 0).write_json(&path).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["analysts"]["Jane Doe"]["questions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a test of the text wrapping function that should wrap at 20 chars";
        let wrapped = wrap_text(text, 20);
        for line in wrapped.lines() {
            assert!(line.len() <= 25);
        }
    }
}
