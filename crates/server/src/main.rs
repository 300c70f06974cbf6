use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use precis_summarizer::{backend_from_env, SummaryPipeline};
use std::env;
use std::sync::Arc;

mod http_api;

#[derive(Parser)]
#[command(name = "precis-server")]
#[command(about = "Chunked document summarization service", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Model asset directory (sets PRECIS_MODEL_DIR)
    #[arg(long)]
    model_dir: Option<String>,

    /// Model id (sets PRECIS_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Backend mode: onnx or stub (sets PRECIS_SUMMARIZER_MODE)
    #[arg(long)]
    mode: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.model_dir {
        env::set_var("PRECIS_MODEL_DIR", dir);
    }
    if let Some(model) = &cli.model {
        env::set_var("PRECIS_MODEL", model);
    }
    if let Some(mode) = &cli.mode {
        env::set_var("PRECIS_SUMMARIZER_MODE", mode);
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // Always silence ort unless verbose mode (ORT is extremely noisy)
    if !cli.verbose {
        builder.filter_module("ort", log::LevelFilter::Off);
    }
    builder.target(env_logger::Target::Stderr).init();

    // The model loads once, up front. A broken model setup fails the
    // process here, not the first request.
    let backend = backend_from_env().context("Failed to initialize summarization backend")?;
    let pipeline = Arc::new(SummaryPipeline::new(backend));

    let app = Router::new()
        .route("/", get(http_api::root_handler))
        .route(
            "/summarize/",
            post({
                let pipeline = pipeline.clone();
                move |body| http_api::summarize_handler(body, pipeline.clone())
            }),
        );

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    println!("Serving summarizer API on http://{}/summarize/", cli.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
