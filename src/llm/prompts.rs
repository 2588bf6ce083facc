use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::models::{Document, Quarter};

/// Words that mark a transcript section as worth sending for question generation
pub const QUESTION_KEYWORDS: [&str; 10] = [
    "revenue",
    "margin",
    "guidance",
    "strategic",
    "operational",
    "million",
    "billion",
    "growth",
    "client",
    "customer",
];

/// Sections kept per document
const MAX_SECTIONS_PER_DOCUMENT: usize = 10;
/// Estimated token ceiling for the excerpt bundle
const MAX_EXCERPT_TOKENS: usize = 12_000;
/// Character cut applied once the ceiling is exceeded
const EXCERPT_TRUNCATE_CHARS: usize = 48_000;

const MOST_RECENT_CALL_CHARS: usize = 10_000;
const PRIOR_CALL_CHARS: usize = 5_000;

pub const QUESTIONS_SYSTEM_PROMPT: &str =
    "You are an expert financial analyst who understands earnings calls.";

const QUESTIONS_INSTRUCTIONS: &str = r#"Based on these earnings call excerpts, generate a comprehensive set of questions analysts are likely to ask on the upcoming call.
Format the response as a JSON object with categories as keys and lists of specific questions as values.
Respond with the JSON object only."#;

/// Rough token count: four characters per token
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

/// First `max_chars` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Collect keyword-bearing sections from earnings-call documents.
///
/// Sections are blank-line separated blocks; the first ten matching blocks of
/// each earnings document are kept. An oversized bundle is cut down to a fixed
/// number of characters.
pub fn build_question_excerpts<'a>(documents: impl IntoIterator<Item = &'a Document>) -> String {
    let mut excerpts = String::new();

    for document in documents.into_iter().filter(|d| d.is_earnings_call()) {
        let relevant: Vec<&str> = document
            .content
            .split("\n\n")
            .filter(|section| {
                let lowered = section.to_lowercase();
                QUESTION_KEYWORDS.iter().any(|k| lowered.contains(k))
            })
            .take(MAX_SECTIONS_PER_DOCUMENT)
            .collect();

        excerpts.push_str(&format!("\nFrom {}:\n{}\n", document.name, relevant.join("\n")));
    }

    if estimate_tokens(&excerpts) > MAX_EXCERPT_TOKENS {
        excerpts = truncate_chars(&excerpts, EXCERPT_TRUNCATE_CHARS).to_string();
    }

    excerpts
}

/// Build the user prompt for question generation
pub fn build_questions_prompt(excerpts: &str) -> String {
    format!("{}\n\nReference Content:{}", QUESTIONS_INSTRUCTIONS, excerpts)
}

/// Parse a `{category: [question, ...]}` JSON answer, tolerating markdown fences
pub fn parse_question_categories(response: &str) -> Result<BTreeMap<String, Vec<String>>> {
    let body = strip_code_fences(response);
    serde_json::from_str(body).context("Model response is not a JSON object of question lists")
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Commentary that steers the tone and emphasis of a generated script
#[derive(Debug, Clone, Default)]
pub struct ScriptContext {
    pub tone: String,
    pub initiatives: String,
    pub considerations: String,
}

impl ScriptContext {
    pub fn is_empty(&self) -> bool {
        self.tone.trim().is_empty()
            && self.initiatives.trim().is_empty()
            && self.considerations.trim().is_empty()
    }
}

/// What the earnings script is for
#[derive(Debug, Clone)]
pub struct ScriptRequest {
    pub company_name: String,
    pub quarter: Quarter,
    pub fiscal_year: String,
    pub context: ScriptContext,
}

/// Build the system prompt for script generation, embedding the script context
pub fn build_script_system_prompt(context: &ScriptContext) -> String {
    let mut prompt =
        String::from("You are a financial analyst expert creating a detailed earnings call template.\n");

    if !context.is_empty() {
        prompt.push_str("\nScript Context:\n");
        prompt.push_str(&format!("Tone: {}\n", context.tone.trim()));
        prompt.push_str(&format!("Strategic Initiatives: {}\n", context.initiatives.trim()));
        prompt.push_str(&format!(
            "Additional Considerations: {}\n",
            context.considerations.trim()
        ));
    }

    prompt.push_str(
        "\nPlease incorporate the provided context into the template, particularly:\n\
         - Adjust the overall tone to match the specified tone\n\
         - Emphasize the strategic initiatives in the CEO sections\n\
         - Include the additional considerations throughout the script where relevant\n",
    );

    prompt
}

/// Excerpts of the newest earnings call and the one before it
pub fn build_script_references<'a>(documents: impl IntoIterator<Item = &'a Document>) -> String {
    let mut calls: Vec<&Document> = documents
        .into_iter()
        .filter(|d| d.is_earnings_call())
        .collect();
    // Stable sort keeps store order among equal timestamps
    calls.sort_by(|a, b| b.upload_time.cmp(&a.upload_time));

    let mut references = String::new();
    let mut calls = calls.into_iter();

    if let Some(latest) = calls.next() {
        references.push_str(&format!(
            "\nMost Recent Earnings Call: {}\nContent: {}",
            latest.name,
            truncate_chars(&latest.content, MOST_RECENT_CALL_CHARS)
        ));
    }
    if let Some(prior) = calls.next() {
        references.push_str(&format!(
            "\nPrior Earnings Call: {}\nKey Excerpts: {}",
            prior.name,
            truncate_chars(&prior.content, PRIOR_CALL_CHARS)
        ));
    }

    references
}

/// Build the user prompt: the script outline plus reference excerpts
pub fn build_script_prompt(request: &ScriptRequest, references: &str) -> String {
    let company = &request.company_name;
    let quarter_name = request.quarter.long_name();
    let quarter = request.quarter.code();
    let year = &request.fiscal_year;

    let mut prompt = format!(
        "Create an extremely detailed, production-ready earnings call template for {company}'s \
         {quarter_name} Fiscal Year {year}. The template must follow this structure and level of detail:\n\n"
    );

    prompt.push_str(&format!(
        "OPERATOR INTRODUCTION:\n\
         Good afternoon and thank you for standing by. Welcome to {company}'s {quarter_name} \
         Fiscal Year {year} Earnings Conference Call. Today's conference is being recorded. \
         [Operator Instructions for Q&A format]. I would now like to turn the conference over to \
         [IR Name], Head of Investor Relations. Please go ahead.\n\n"
    ));

    prompt.push_str(&format!(
        "IR INTRODUCTION:\n\
         Thank you, Operator, and good afternoon everyone. Thank you for joining us today for \
         {company}'s {quarter_name} Fiscal Year {year} earnings call. With me today are [CEO Name], \
         Chief Executive Officer, and [CFO Name], Chief Financial Officer.\n\n\
         We have posted complete {quarter} fiscal {year} financial results in our earnings release \
         on the quarterly results section of our website.\n\n\
         Before we begin, I would like to remind you that we will be making forward-looking \
         statements on this call which involve risks and uncertainties. Actual results could differ \
         materially from those contemplated by our forward-looking statements. Please review our \
         filings with the SEC for a discussion of the factors that could cause our results to differ. \
         We disclaim any obligation to update any forward-looking statements except as required by law.\n\n\
         During this call, we will discuss certain non-GAAP financial measures. Reconciliations to \
         the most directly comparable GAAP financial measures are provided in the earnings release.\n\n\
         With that, I'll turn the call over to [CEO Name].\n\n"
    ));

    prompt.push_str(&format!(
        "CEO STRATEGIC OVERVIEW:\n\
         In {quarter} {year}, summarize execution against strategy with headline results:\n\
         - Net revenue of $XXX million\n\
         - Active clients of X.X million\n\
         - Revenue per active client of $XXX\n\
         - Adjusted EBITDA of $XX.X million\n\
         Then highlight three key strategic initiatives with metrics and hand over to [CFO Name].\n\n"
    ));

    prompt.push_str(&format!(
        "CFO FINANCIAL REVIEW:\n\
         Walk through {quarter} results in detail:\n\
         - Revenue: total, year-over-year change, performance against the guidance range, \
         and the main components and drivers\n\
         - Gross margin: level, year-over-year and quarter-over-quarter change in basis points, \
         and the drivers behind it\n\
         - Operating expenses: total and as a percentage of revenue, split into marketing, \
         technology and G&A\n\
         - Balance sheet: cash and investments, free cash flow, inventory, and working capital days\n\n\
         GUIDANCE SECTION:\n\
         - Next quarter: revenue range with year-over-year and sequential change, adjusted EBITDA range\n\
         - Full year FY{year}: revenue and adjusted EBITDA ranges, with any change to prior guidance explained\n\n"
    ));

    prompt.push_str(
        "CEO CLOSING REMARKS:\n\
         Emphasize three key achievements, each with its quantified impact, strategic importance \
         and future opportunity, then open the line for questions.\n\n\
         Q&A TRANSITION:\n\
         We will now begin the question-and-answer session. [Operator instructions for asking questions]. \
         Our first question comes from [Analyst Name] with [Firm Name].\n\n",
    );

    prompt.push_str(&format!(
        "CLOSING:\n\
         Thank you everyone for your questions and ongoing interest in {company}. We look forward \
         to updating you on our continued progress next quarter.\n\n"
    ));

    prompt.push_str("Reference Documents:");
    prompt.push_str(references);

    prompt
}

/// Tidy a generated script: drop stray code fences and surrounding whitespace
pub fn clean_script_response(response: &str) -> String {
    response.replace("```", "").trim().to_string()
}
