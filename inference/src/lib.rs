pub mod activations;
pub mod engine;
pub mod error;
pub mod layers;
pub mod model;
pub mod preprocess;
pub mod tensor;


pub use engine::{InferenceEngine, InferenceResult};
pub use error::{InferenceError, Result};
pub use model::{Model, load_model};
pub use tensor::Tensor;
