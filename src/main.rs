use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use irhub::io::write_text_file;
use irhub::{
    aggregate_questions, execute_question_generation, execute_script_generation, execute_stage3,
    ingest_files, load_document_file, AnalysisConfig, AnalysisSummary, AnthropicClient,
    AnthropicConfig, ExtractionMode, Quarter, RenderStats, ScriptContext, ScriptRequest,
};

#[derive(Parser)]
#[command(name = "irhub")]
#[command(author, version, about = "Investor-relations content hub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract historical analyst questions from earnings-call transcripts
    Analyze {
        /// Transcript files (pdf, docx or txt)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output file for the machine-readable report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the human-readable report (text)
        #[arg(long)]
        human_readable: Option<PathBuf>,

        /// Company spokesperson whose lines end an analyst question (repeatable)
        #[arg(long = "spokesperson")]
        spokespeople: Vec<String>,

        /// Analysis config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Keep files that fail extraction, with the error message as content
        #[arg(long)]
        inline_errors: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the extracted text of a document
    Extract {
        /// Document file (pdf, docx or txt)
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate likely analyst questions from earnings-call documents
    Questions {
        /// Reference documents
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output file for the generated questions (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate an earnings-call script draft
    Script {
        /// Reference documents
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Company name
        #[arg(long)]
        company: String,

        /// Quarter (Q1-Q4)
        #[arg(long, value_parser = parse_quarter)]
        quarter: Quarter,

        /// Fiscal year, e.g. 2025
        #[arg(long)]
        fiscal_year: String,

        /// Tone the script should convey
        #[arg(long, default_value = "")]
        tone: String,

        /// Strategic initiatives to highlight
        #[arg(long, default_value = "")]
        initiatives: String,

        /// Other points, metrics or context to include
        #[arg(long, default_value = "")]
        considerations: String,

        /// Output file for the script (text)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn parse_quarter(value: &str) -> Result<Quarter, String> {
    Quarter::from_code(value).ok_or_else(|| format!("invalid quarter '{}', expected Q1-Q4", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            output,
            human_readable,
            spokespeople,
            config,
            inline_errors,
            verbose,
        } => {
            setup_logging(verbose);
            analyze(input, output, human_readable, spokespeople, config, inline_errors)
        }
        Commands::Extract { input, verbose } => {
            setup_logging(verbose);
            let document = load_document_file(&input, ExtractionMode::Strict)
                .context("Failed to extract document text")?;
            println!("{}", document.content);
            Ok(())
        }
        Commands::Questions {
            input,
            output,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            generate_questions(input, output, model).await
        }
        Commands::Script {
            input,
            company,
            quarter,
            fiscal_year,
            tone,
            initiatives,
            considerations,
            output,
            model,
            verbose,
        } => {
            setup_logging(verbose);
            let request = ScriptRequest {
                company_name: company,
                quarter,
                fiscal_year,
                context: ScriptContext {
                    tone,
                    initiatives,
                    considerations,
                },
            };
            generate_script(input, request, output, model).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn extraction_mode(inline_errors: bool) -> ExtractionMode {
    if inline_errors {
        ExtractionMode::Inline
    } else {
        ExtractionMode::Strict
    }
}

fn build_client(model: Option<String>) -> Result<AnthropicClient> {
    let mut config = AnthropicConfig::from_env()?;
    if let Some(model) = model {
        config = config.with_model(&model);
    }
    Ok(AnthropicClient::new(config))
}

fn analyze(
    input: Vec<PathBuf>,
    output: Option<PathBuf>,
    human_readable: Option<PathBuf>,
    spokespeople: Vec<String>,
    config: Option<PathBuf>,
    inline_errors: bool,
) -> Result<()> {
    let config = match config {
        Some(path) => AnalysisConfig::from_file(&path)?,
        None => AnalysisConfig::default(),
    }
    .with_spokespeople(spokespeople);

    info!("Closing markers: {:?}", config.closing_markers);

    let ingest = ingest_files(&input, extraction_mode(inline_errors));
    let questions = aggregate_questions(&ingest.store, &config);

    execute_stage3(
        &questions,
        RenderStats {
            documents_processed: ingest.store.len(),
            extraction_failures: ingest.failures.len(),
        },
        output.as_deref(),
        human_readable.as_deref(),
    )?;

    let summary = AnalysisSummary::from_questions(&questions);
    if summary.total_questions == 0 {
        println!(
            "No analyst questions found. Make sure the documents are earnings call transcripts with a Q&A section."
        );
        return Ok(());
    }

    println!("Analysis Summary");
    println!("================");
    println!("Total analysts: {}", summary.total_analysts);
    println!("Total questions: {}", summary.total_questions);
    println!(
        "Avg questions/analyst: {:.1}",
        summary.avg_questions_per_analyst
    );
    println!();
    for (name, analyst) in questions.iter() {
        println!("{} ({}): {} questions", name, analyst.firm, analyst.questions.len());
    }

    Ok(())
}

async fn generate_questions(
    input: Vec<PathBuf>,
    output: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    let client = build_client(model)?;
    let ingest = ingest_files(&input, ExtractionMode::Strict);

    let categories = execute_question_generation(&client, &ingest.store).await?;
    let json = serde_json::to_string_pretty(&categories).context("Failed to serialize questions")?;

    match output {
        Some(path) => {
            write_text_file(&path, &json)?;
            info!("Questions written to {:?}", path);
        }
        None => {
            for (category, questions) in &categories {
                println!("{}", category);
                for question in questions {
                    println!("- {}", question);
                }
                println!();
            }
        }
    }

    Ok(())
}

async fn generate_script(
    input: Vec<PathBuf>,
    request: ScriptRequest,
    output: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    let client = build_client(model)?;
    let ingest = ingest_files(&input, ExtractionMode::Strict);

    let script = execute_script_generation(&client, &ingest.store, &request).await?;

    match output {
        Some(path) => {
            write_text_file(&path, &script)?;
            info!("Script written to {:?}", path);
        }
        None => println!("{}", script),
    }

    Ok(())
}
