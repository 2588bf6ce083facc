use std::sync::LazyLock;

use regex::Regex;

use crate::models::{FiscalPeriod, Quarter};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("valid year pattern"));

/// Phrases that name a quarter in running text
const QUARTER_PHRASES: [(&str, Quarter); 4] = [
    ("first quarter", Quarter::Q1),
    ("second quarter", Quarter::Q2),
    ("third quarter", Quarter::Q3),
    ("fourth quarter", Quarter::Q4),
];

/// Infer the fiscal period of a document.
///
/// The filename is consulted first. A filename containing several quarter
/// tokens resolves to the lowest quarter (`q1` before `q2`, ...), regardless
/// of where the tokens sit in the name. Header lines only fill in fields the
/// filename left unset, and the first hit per field wins. A period still
/// missing either field is returned as the unknown period.
pub fn extract_fiscal_period(filename: &str, header_lines: &[&str]) -> FiscalPeriod {
    let filename = filename.to_lowercase();

    let mut period = FiscalPeriod {
        year: find_year(&filename),
        quarter: Quarter::ALL
            .into_iter()
            .find(|q| filename.contains(&q.code().to_lowercase())),
    };

    if period.is_known() {
        return period;
    }

    for line in header_lines {
        let lowered = line.to_lowercase();

        if period.year.is_none()
            && (lowered.contains("fiscal year") || lowered.contains("fiscal 20"))
        {
            period.year = find_year(&lowered);
        }

        if period.quarter.is_none() {
            period.quarter = QUARTER_PHRASES
                .iter()
                .find(|(phrase, _)| lowered.contains(phrase))
                .map(|(_, quarter)| *quarter);
        }

        if period.is_known() {
            break;
        }
    }

    period.or_unknown()
}

fn find_year(text: &str) -> Option<String> {
    YEAR_PATTERN.find(text).map(|m| m.as_str().to_string())
}
