use std::collections::BTreeMap;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::llm::{
    build_question_excerpts, build_questions_prompt, build_script_prompt,
    build_script_references, build_script_system_prompt, clean_script_response,
    estimate_tokens, parse_question_categories, CompletionService, ScriptRequest,
    QUESTIONS_SYSTEM_PROMPT,
};
use crate::models::DocumentStore;

/// Generated Q&A prep questions grouped by category
pub type QuestionCategories = BTreeMap<String, Vec<String>>;

/// Generate likely analyst questions from the earnings calls in the store
pub async fn execute_question_generation(
    client: &impl CompletionService,
    store: &DocumentStore,
) -> Result<QuestionCategories> {
    let excerpts = build_question_excerpts(store.documents());
    if excerpts.trim().is_empty() {
        warn!("No earnings-call documents found; generating questions without reference content");
    }

    info!(
        "Generating questions from ~{} tokens of excerpts",
        estimate_tokens(&excerpts)
    );

    let prompt = build_questions_prompt(&excerpts);
    let response = client
        .complete(QUESTIONS_SYSTEM_PROMPT, &prompt)
        .await
        .context("Question generation request failed")?;

    let categories = parse_question_categories(&response)?;
    info!(
        "Generated {} questions in {} categories",
        categories.values().map(Vec::len).sum::<usize>(),
        categories.len()
    );

    Ok(categories)
}

/// Generate an earnings-call script draft for the requested period
pub async fn execute_script_generation(
    client: &impl CompletionService,
    store: &DocumentStore,
    request: &ScriptRequest,
) -> Result<String> {
    let references = build_script_references(store.documents());
    let system_prompt = build_script_system_prompt(&request.context);
    let prompt = build_script_prompt(request, &references);

    info!(
        "Generating {} FY{} script for {}",
        request.quarter, request.fiscal_year, request.company_name
    );

    let response = client
        .complete(&system_prompt, &prompt)
        .await
        .context("Script generation request failed")?;

    Ok(clean_script_response(&response))
}
