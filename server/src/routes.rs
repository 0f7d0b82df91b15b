use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use inference::{InferenceEngine, InferenceError, preprocess::IMAGE_PIXELS};
use log::warn;
use serde::{Deserialize, Serialize};

/// Request body of `POST /predict`: one flat row-major 28x28 image.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    input: Vec<f64>,
}

/// Success body: one `[1, out_features]` matrix per captured dense layer,
/// in network order.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    dense_layer_outputs: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    error: String,
}

type Failure = (StatusCode, Json<ErrorBody>);

pub fn router(engine: InferenceEngine) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .with_state(engine)
}

async fn predict(
    State(engine): State<InferenceEngine>,
    Json(body): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, Failure> {
    if body.input.len() != IMAGE_PIXELS {
        return Err(bad_request(format!(
            "input must be a list of {IMAGE_PIXELS} numbers, got {}",
            body.input.len()
        )));
    }

    let result = engine.run(&body.input).map_err(failure)?;

    let dense_layer_outputs = result
        .dense_outputs
        .iter()
        .map(|tensor| tensor.outer_iter().map(|row| row.to_vec()).collect())
        .collect();

    Ok(Json(PredictResponse { dense_layer_outputs }))
}

fn bad_request(error: String) -> Failure {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error }))
}

/// Maps engine errors onto transport failures: shape problems are the
/// caller's fault, everything else is a server-side defect.
fn failure(e: InferenceError) -> Failure {
    warn!("inference failed: {e}");

    let status = match e {
        InferenceError::Shape { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(ErrorBody { error: e.to_string() }))
}
