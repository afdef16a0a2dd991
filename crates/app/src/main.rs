use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Router};
use chrono::Utc;
use clap::Parser;
use pdf_qa_core::{
    Indexer, OllamaChat, OllamaEmbedder, PdfLoader, QaEngine, QaError, QdrantStore,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-qa", version)]
struct Cli {
    /// Folder containing the PDF documents to answer questions about.
    #[arg(long)]
    folder: PathBuf,

    /// Metadata snapshot file; defaults to `.pdf-qa-metadata.json` inside
    /// the document folder.
    #[arg(long)]
    metadata_path: Option<PathBuf>,

    /// Qdrant base URL
    #[arg(long, default_value = "http://localhost:6333")]
    qdrant_url: String,

    /// Qdrant collection holding this corpus.
    #[arg(long, default_value = "pdf_qa_chunks")]
    collection: String,

    /// Ollama base URL
    #[arg(long, default_value = "http://localhost:11434")]
    ollama_url: String,

    /// Model used for both embeddings and chat.
    #[arg(long, env = "MODEL")]
    model: String,

    /// Number of chunks retrieved per question.
    #[arg(long, default_value = "4")]
    top_k: usize,

    /// Address the web form listens on.
    #[arg(long, default_value = "127.0.0.1:7860")]
    bind: String,
}

type Engine = QaEngine<QdrantStore, OllamaEmbedder, OllamaChat>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let metadata_path = cli
        .metadata_path
        .clone()
        .unwrap_or_else(|| cli.folder.join(".pdf-qa-metadata.json"));

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        folder = %cli.folder.display(),
        model = %cli.model,
        "pdf-qa boot"
    );

    let indexer = Indexer::new(
        PdfLoader::default(),
        OllamaEmbedder::new(&cli.ollama_url, &cli.model),
        QdrantStore::new(&cli.qdrant_url, &cli.collection),
    );

    let report = indexer
        .synchronize(&cli.folder, &metadata_path)
        .await
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    info!(
        indexed = report.indexed,
        deleted = report.deleted,
        unchanged = report.unchanged,
        "synchronization finished"
    );
    for failed in &report.failed {
        warn!(path = %failed.path, reason = %failed.reason, "file not indexed");
    }

    let mut engine = QaEngine::new(
        QdrantStore::new(&cli.qdrant_url, &cli.collection),
        OllamaEmbedder::new(&cli.ollama_url, &cli.model),
        OllamaChat::new(&cli.ollama_url, &cli.model),
        cli.top_k,
    )
    .map_err(|error| anyhow::anyhow!(error.to_string()))?;
    engine.mark_ready();

    let app = Router::new()
        .route("/", get(ask_form))
        .route("/ask", post(ask))
        .with_state(Arc::new(engine));

    info!(bind = %cli.bind, "serving question form");
    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Deserialize)]
struct AskRequest {
    question: String,
}

async fn ask_form() -> Html<String> {
    Html(render_page(None, None))
}

async fn ask(
    State(engine): State<Arc<Engine>>,
    Form(request): Form<AskRequest>,
) -> Result<Html<String>, (StatusCode, String)> {
    let answer = engine.answer(&request.question).await.map_err(|error| {
        warn!(reason = %error, "question failed");
        match error {
            QaError::NotReady(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "documents are not indexed yet".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to answer the question".to_string(),
            ),
        }
    })?;

    Ok(Html(render_page(Some(&request.question), Some(&answer))))
}

fn render_page(question: Option<&str>, answer: Option<&str>) -> String {
    let mut body = String::from(
        "<!doctype html>\n<html>\n<head><title>Ask questions about your PDFs</title></head>\n<body>\n\
         <h1>Ask questions about your PDFs</h1>\n\
         <form action=\"/ask\" method=\"post\">\n\
         <input type=\"text\" name=\"question\" size=\"80\" placeholder=\"Ask a question\">\n\
         <button type=\"submit\">Ask</button>\n\
         </form>\n",
    );

    if let (Some(question), Some(answer)) = (question, answer) {
        body.push_str(&format!(
            "<h2>Q: {}</h2>\n<p>{}</p>\n",
            escape_html(question),
            escape_html(answer)
        ));
    }

    body.push_str("</body>\n</html>\n");
    body
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
