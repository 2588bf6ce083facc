pub mod heuristics;
pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use heuristics::{detect_roster, extract_fiscal_period, AnalysisConfig};
pub use io::{
    document_from_bytes, extract_text, extract_text_lossy, load_document_file, AnalysisReport,
    DocumentKind, ExtractionError, ExtractionMode, HumanReport,
};
pub use llm::{AnthropicClient, AnthropicConfig, CompletionService, ScriptContext, ScriptRequest};
pub use models::{
    AnalystIdentity, AnalystQuestions, Document, DocumentKey, DocumentStore, FiscalPeriod,
    QuestionRecord, QuestionsByAnalyst, Quarter, Roster,
};
pub use stages::{
    aggregate_questions, analyze_document, execute_question_generation,
    execute_script_generation, execute_stage3, ingest_files, segment_transcript,
    AnalysisSummary, RenderStats,
};
