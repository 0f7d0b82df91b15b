mod routes;

use std::{env, sync::Arc};

use anyhow::Context;
use inference::InferenceEngine;
use log::info;
use tokio::net::TcpListener;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let model_path = env::var("MODEL_PATH").context("MODEL_PATH is not set")?;
    let model = inference::load_model(&model_path)
        .with_context(|| format!("loading model from {model_path}"))?;
    let engine = InferenceEngine::new(Arc::new(model));

    let addr = format!(
        "{}:{}",
        env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
        env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string()),
    );

    let listener = TcpListener::bind(&addr).await?;
    info!("listening at {addr}");

    axum::serve(listener, routes::router(engine)).await?;
    Ok(())
}
