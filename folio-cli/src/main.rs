use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_cli::{AppConfig, assistant, report};
use folio_pdf::{
    PageText, PdfTextExtractor, default_strategies, export_markdown, export_text, extract_tables,
    join_pages, render_markdown,
};
use folio_telemetry::{StageTimings, TelemetryConfig, init_telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "folio", about = "Ask questions about and summarize PDF documents", version)]
struct Cli {
    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print how long each pipeline stage took
    #[arg(long, global = true)]
    timings: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print or export the selectable text of a PDF
    Extract {
        pdf: PathBuf,
        /// Render with a heading per page
        #[arg(long)]
        markdown: bool,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Detect tables and print them as CSV
    Tables {
        pdf: PathBuf,
        /// Print the extraction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a PDF as 6-10 bullet points
    Summarize { pdf: PathBuf },

    /// Answer a question from a PDF's content
    Ask {
        pdf: PathBuf,
        question: String,
        /// Number of chunks to retrieve
        #[arg(long)]
        top_k: Option<usize>,
        /// Print the answer and sources as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let timings = cli.timings.then(StageTimings::new);
    let telemetry =
        TelemetryConfig { json: cli.json_logs, timings: timings.clone(), ..Default::default() };
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("warning: logging not initialised: {e}");
    }

    let result = run(cli.command).await;

    if let Some(timings) = timings {
        eprint!("{}", timings.render());
    }
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Extract { pdf, markdown, output } => {
            let pages = read_pages(&pdf)?;
            match (output, markdown) {
                (Some(path), true) => export_markdown(&pages, &path)?,
                (Some(path), false) => export_text(&join_pages(&pages), &path)?,
                (None, true) => print!("{}", render_markdown(&pages)),
                (None, false) => print!("{}", join_pages(&pages)),
            }
        }

        Command::Tables { pdf, json } => {
            let pages = read_pages(&pdf)?;
            let extraction = extract_tables(&default_strategies(), &pages);
            if json {
                println!("{}", serde_json::to_string_pretty(&extraction)?);
            } else if extraction.tables.is_empty() {
                println!("No tables found.");
            } else {
                for (i, table) in extraction.tables.iter().enumerate() {
                    println!("Table {} (page {})", i + 1, table.page);
                    print!("{}", table.to_csv());
                    println!();
                }
            }
        }

        Command::Summarize { pdf } => {
            let config = AppConfig::from_env()?;
            let text = join_pages(&read_pages(&pdf)?);
            let summary = assistant(&config, config.rag.clone())?.summarize(&text).await?;
            println!("{summary}");
        }

        Command::Ask { pdf, question, top_k, json } => {
            let config = AppConfig::from_env()?;
            let mut rag = config.rag.clone();
            if let Some(k) = top_k {
                rag.top_k = k;
            }
            let text = join_pages(&read_pages(&pdf)?);
            let answer = assistant(&config, rag)?.answer_question(&text, &question).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&answer)?);
            } else {
                println!("{}", answer.answer);
                println!();
                println!("Sources:");
                for source in &answer.sources {
                    println!("  [{}] {}", source.rank, source.text.trim());
                }
            }
        }
    }
    Ok(())
}

fn read_pages(pdf: &Path) -> Result<Vec<PageText>> {
    let pages = PdfTextExtractor::new().extract_file(pdf)?;
    info!(path = %pdf.display(), page_count = pages.len(), "read document");
    Ok(pages)
}
