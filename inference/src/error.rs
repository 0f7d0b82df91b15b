use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used in the entire inference crate.
pub type Result<T> = std::result::Result<T, InferenceError>;

/// All errors that can occur while loading a model or running a forward pass.
#[derive(Debug)]
pub enum InferenceError {
    /// A tensor's shape is incompatible with the operation that received it.
    Shape {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// The loaded model does not have the layer composition the two-phase
    /// evaluator requires.
    Architecture(String),
    /// An artifact layer kind that is not one of conv/max_pool/dense.
    UnsupportedLayer(String),
    /// The artifact file exists but its contents are malformed.
    Artifact(String),
    /// An underlying io error while reading the artifact.
    Io(io::Error),
}

impl Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape {
                what,
                got,
                expected,
            } => write!(f, "shape mismatch in {what}: got {got}, expected {expected}"),
            Self::Architecture(msg) => write!(f, "unsupported architecture: {msg}"),
            Self::UnsupportedLayer(kind) => write!(f, "unsupported layer kind `{kind}`"),
            Self::Artifact(msg) => write!(f, "invalid model artifact: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for InferenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for InferenceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
