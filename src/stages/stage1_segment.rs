use tracing::debug;

use crate::heuristics::{detect_roster, extract_fiscal_period, AnalysisConfig};
use crate::models::{AnalystIdentity, Document, FiscalPeriod, QuestionRecord, Roster};

/// Segmenter state while walking transcript lines
#[derive(Debug, Clone, PartialEq)]
enum SegmentState<'r> {
    Scanning,
    Collecting {
        analyst: &'r AnalystIdentity,
        buffer: Vec<String>,
    },
}

/// A question span before it is tagged with its source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSpan {
    pub analyst: AnalystIdentity,
    pub text: String,
}

/// Walk transcript text and slice out analyst question spans.
///
/// A line mentioning a roster name starts a new span for that analyst (this
/// check comes first, so a new name abandons any span in progress). While
/// collecting, a line starting with a closing marker ends the span; any other
/// line is appended. Blank lines are skipped. A span still open at the end of
/// the text is dropped.
pub fn segment_transcript(
    text: &str,
    roster: &Roster,
    closing_markers: &[String],
) -> Vec<QuestionSpan> {
    let mut spans = Vec::new();
    let mut state = SegmentState::Scanning;

    if roster.is_empty() {
        return spans;
    }

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if let Some(analyst) = roster.first_match(&line.to_lowercase()) {
            state = SegmentState::Collecting {
                analyst,
                buffer: Vec::new(),
            };
            continue;
        }

        let SegmentState::Collecting { analyst, buffer } = &mut state else {
            continue;
        };

        if closing_markers.iter().any(|m| line.starts_with(m.as_str())) {
            if !buffer.is_empty() {
                spans.push(QuestionSpan {
                    analyst: (*analyst).clone(),
                    text: buffer.join(" "),
                });
            }
            state = SegmentState::Scanning;
        } else {
            buffer.push(line.trim().to_string());
        }
    }

    if let SegmentState::Collecting { analyst, buffer } = &state {
        debug!(
            "Dropping unterminated question from {} ({} lines)",
            analyst.name,
            buffer.len()
        );
    }

    spans
}

/// Everything extracted from a single document
#[derive(Debug, Clone)]
pub struct DocumentAnalysis {
    pub fiscal_period: FiscalPeriod,
    pub roster: Roster,
    pub questions: Vec<QuestionRecord>,
}

/// Run period extraction, roster detection and segmentation over one document
pub fn analyze_document(document: &Document, config: &AnalysisConfig) -> DocumentAnalysis {
    let header = document.head_lines(config.header_lines);
    let fiscal_period = extract_fiscal_period(&document.name, &header);

    let roster = match &config.fixed_roster {
        Some(names) => Roster::from_names(names),
        None => detect_roster(&header, &config.roster_trigger),
    };

    let key = document.key();
    let questions = segment_transcript(&document.content, &roster, &config.closing_markers)
        .into_iter()
        .map(|span| QuestionRecord {
            analyst: span.analyst,
            question: span.text,
            source_document: document.name.clone(),
            document_key: key.clone(),
            fiscal_period: fiscal_period.clone(),
            call_date: document.upload_time,
        })
        .collect::<Vec<_>>();

    debug!(
        "{}: period {}, {} analysts, {} questions",
        document.name,
        fiscal_period,
        roster.len(),
        questions.len()
    );

    DocumentAnalysis {
        fiscal_period,
        roster,
        questions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn markers() -> Vec<String> {
        vec![
            "Dana Park".to_string(),
            "Lee Chen".to_string(),
            "Operator".to_string(),
        ]
    }

    fn texts(spans: &[QuestionSpan]) -> Vec<&str> {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_basic_question() {
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Jane Doe\nWhat is your revenue guidance?\nOperator\nNext question.";

        let spans = segment_transcript(text, &roster, &markers());

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].analyst.name, "Jane Doe");
        assert_eq!(spans[0].text, "What is your revenue guidance?");
    }

    #[test]
    fn test_multiline_question_joined_and_trimmed() {
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Jane Doe\n  Two parts.  \n\n   \nFirst, margins?\nDana Park: Sure.";

        let spans = segment_transcript(text, &roster, &markers());

        assert_eq!(texts(&spans), vec!["Two parts. First, margins?"]);
    }

    #[test]
    fn test_unterminated_question_is_dropped() {
        // Open span at end of input is discarded, not emitted
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Jane Doe\nWhat about margins?\nAnd capex?";

        let spans = segment_transcript(text, &roster, &markers());

        assert!(spans.is_empty());
    }

    #[test]
    fn test_roster_match_takes_precedence_over_buffer() {
        // The second line mentions the analyst's own name, so it restarts the
        // span and the earlier text is lost
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Jane Doe\nThis is lost.\nAs Jane Doe noted last time, what about churn?\nMore context here.\nOperator";

        let spans = segment_transcript(text, &roster, &markers());

        assert_eq!(texts(&spans), vec!["More context here."]);
    }

    #[test]
    fn test_new_analyst_discards_previous_buffer() {
        let roster = Roster::from_names(["Jane Doe", "John Roe"]);
        let text = "Jane Doe\nHalf a question\nJohn Roe\nA full question?\nLee Chen\nAnswer.";

        let spans = segment_transcript(text, &roster, &markers());

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].analyst.name, "John Roe");
        assert_eq!(spans[0].text, "A full question?");
    }

    #[test]
    fn test_closing_marker_is_case_sensitive_prefix() {
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Jane Doe\nThe operator said hi\nOPERATOR\n  Operator indented\nOperator";

        let spans = segment_transcript(text, &roster, &markers());

        assert_eq!(
            texts(&spans),
            vec!["The operator said hi OPERATOR Operator indented"]
        );
    }

    #[test]
    fn test_marker_with_empty_buffer_emits_nothing() {
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Jane Doe\nOperator\nWhat now?\nOperator";

        let spans = segment_transcript(text, &roster, &markers());

        assert!(spans.is_empty());
    }

    #[test]
    fn test_lines_while_scanning_are_ignored() {
        let roster = Roster::from_names(["Jane Doe"]);
        let text = "Prepared remarks\nOperator\nJane Doe\nQ?\nOperator\nStray line\nOperator";

        let spans = segment_transcript(text, &roster, &markers());

        assert_eq!(texts(&spans), vec!["Q?"]);
    }

    #[test]
    fn test_empty_roster_yields_nothing() {
        let spans = segment_transcript("Jane Doe\nQ?\nOperator", &Roster::new(), &markers());
        assert!(spans.is_empty());
    }

    #[test]
    fn test_analyze_document_tags_records() {
        let upload_time = NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        let document = Document::new(
            "acme_q2_2024.txt",
            "Jane Doe Analyst\n\nJane Doe\nWhat is your revenue guidance?\nOperator\n...",
            upload_time,
        );

        let analysis = analyze_document(&document, &AnalysisConfig::default());

        assert_eq!(analysis.fiscal_period.label(), "Q2 FY2024");
        assert_eq!(analysis.questions.len(), 1);
        let record = &analysis.questions[0];
        assert_eq!(record.analyst.name, "Jane Doe");
        assert_eq!(record.question, "What is your revenue guidance?");
        assert_eq!(record.source_document, "acme_q2_2024.txt");
        assert_eq!(record.document_key, document.key());
        assert_eq!(record.call_date, upload_time);
    }

    #[test]
    fn test_analyze_document_with_fixed_roster() {
        let upload_time = NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let document = Document::new(
            "call.txt",
            "No header here\nAlex Moss\nHow is retention?\nOperator",
            upload_time,
        );
        let config = AnalysisConfig {
            fixed_roster: Some(vec!["Alex Moss".to_string()]),
            ..Default::default()
        };

        let analysis = analyze_document(&document, &config);

        assert_eq!(analysis.roster.len(), 1);
        assert_eq!(analysis.questions[0].question, "How is retention?");
        assert_eq!(analysis.questions[0].period_label(), "Quarter Unknown");
    }
}
