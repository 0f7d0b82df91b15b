use std::{fs, path::Path};

use ndarray::{Array1, Array2, Array4};
use safetensors::{Dtype, SafeTensors, tensor::TensorView};
use serde::Deserialize;

use crate::{
    InferenceError, Result,
    activations::ActFn,
    layers::Layer,
};

/// Key of the metadata entry holding the JSON layer headers.
const ARCHITECTURE_KEY: &str = "architecture";

/// The loaded network: an ordered layer sequence evaluated front to back.
/// Built once at process start and shared read-only across requests; no
/// layer holds mutable state.
#[derive(Clone, Debug)]
pub struct Model {
    layers: Vec<Layer>,
}

impl Model {
    pub fn new<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

/// One entry of the `architecture` header stored in the artifact metadata.
/// The kind stays an open string here so an unfamiliar layer can be reported
/// as such instead of failing as a generic parse error.
#[derive(Debug, Deserialize)]
struct LayerHeader {
    kind: String,
    #[serde(default)]
    kernel: Option<[usize; 2]>,
    #[serde(default)]
    filters: Option<usize>,
    #[serde(default)]
    window: Option<[usize; 2]>,
    #[serde(default)]
    units: Option<usize>,
    #[serde(default)]
    activation: Option<String>,
    #[serde(default)]
    weights: Option<String>,
    #[serde(default)]
    bias: Option<String>,
}

/// Deserializes a model artifact: a safetensors file whose metadata carries
/// the JSON architecture header and whose named tensors hold the trained
/// parameters as little-endian `f64`. Loading is idempotent; the result is
/// never mutated afterwards.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    let bytes = fs::read(path.as_ref())?;
    let model = parse_model(&bytes)?;

    log::info!(
        "loaded {} layer(s) from {}",
        model.layers().len(),
        path.as_ref().display()
    );
    Ok(model)
}

/// Builds a model from raw artifact bytes.
pub fn parse_model(bytes: &[u8]) -> Result<Model> {
    let tensors = SafeTensors::deserialize(bytes)
        .map_err(|e| InferenceError::Artifact(format!("unreadable artifact: {e}")))?;
    let (_, header) = SafeTensors::read_metadata(bytes)
        .map_err(|e| InferenceError::Artifact(format!("unreadable artifact header: {e}")))?;

    let arch_json = header
        .metadata()
        .as_ref()
        .and_then(|meta| meta.get(ARCHITECTURE_KEY))
        .ok_or_else(|| {
            InferenceError::Artifact(format!("missing `{ARCHITECTURE_KEY}` metadata entry"))
        })?;
    let headers: Vec<LayerHeader> = serde_json::from_str(arch_json)
        .map_err(|e| InferenceError::Artifact(format!("malformed architecture header: {e}")))?;

    let mut layers = Vec::with_capacity(headers.len());
    for (index, layer_header) in headers.iter().enumerate() {
        layers.push(build_layer(index, layer_header, &tensors)?);
    }

    Ok(Model::new(layers))
}

fn build_layer(index: usize, header: &LayerHeader, tensors: &SafeTensors) -> Result<Layer> {
    match header.kind.as_str() {
        "conv" => {
            let kernel = field(index, "kernel", header.kernel)?;
            let filters = field(index, "filters", header.filters)?;
            let kernels = tensor4(index, tensors, field(index, "weights", header.weights.as_deref())?)?;
            let bias = tensor1(index, tensors, field(index, "bias", header.bias.as_deref())?)?;

            let (kh, kw, _, out_ch) = kernels.dim();
            if [kh, kw] != kernel || out_ch != filters {
                return Err(InferenceError::Artifact(format!(
                    "layer {index}: kernel tensor is {kh}x{kw}x{out_ch}, header declares \
                     {}x{}x{filters}",
                    kernel[0], kernel[1]
                )));
            }

            Layer::conv(kernels, bias)
        }
        "max_pool" => {
            let window = field(index, "window", header.window)?;
            Ok(Layer::pool((window[0], window[1])))
        }
        "dense" => {
            let units = field(index, "units", header.units)?;
            let act_fn = match field(index, "activation", header.activation.as_deref())? {
                "sigmoid" => ActFn::sigmoid(),
                "softmax" => ActFn::softmax(),
                other => {
                    return Err(InferenceError::Artifact(format!(
                        "layer {index}: unknown activation `{other}`"
                    )));
                }
            };
            let weights = tensor2(index, tensors, field(index, "weights", header.weights.as_deref())?)?;
            let bias = tensor1(index, tensors, field(index, "bias", header.bias.as_deref())?)?;

            if weights.ncols() != units {
                return Err(InferenceError::Artifact(format!(
                    "layer {index}: weight tensor has {} output features, header declares {units}",
                    weights.ncols()
                )));
            }

            Layer::dense(weights, bias, act_fn)
        }
        other => Err(InferenceError::UnsupportedLayer(other.to_string())),
    }
}

fn field<T>(index: usize, name: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| InferenceError::Artifact(format!("layer {index}: missing `{name}` field")))
}

fn tensor1(index: usize, tensors: &SafeTensors, name: &str) -> Result<Array1<f64>> {
    let (shape, data) = raw_tensor(index, tensors, name, 1)?;
    Array1::from_shape_vec(shape[0], data)
        .map_err(|e| InferenceError::Artifact(format!("tensor `{name}`: {e}")))
}

fn tensor2(index: usize, tensors: &SafeTensors, name: &str) -> Result<Array2<f64>> {
    let (shape, data) = raw_tensor(index, tensors, name, 2)?;
    Array2::from_shape_vec((shape[0], shape[1]), data)
        .map_err(|e| InferenceError::Artifact(format!("tensor `{name}`: {e}")))
}

fn tensor4(index: usize, tensors: &SafeTensors, name: &str) -> Result<Array4<f64>> {
    let (shape, data) = raw_tensor(index, tensors, name, 4)?;
    Array4::from_shape_vec((shape[0], shape[1], shape[2], shape[3]), data)
        .map_err(|e| InferenceError::Artifact(format!("tensor `{name}`: {e}")))
}

/// Resolves a named tensor of the given rank into its shape and a decoded
/// `f64` buffer.
fn raw_tensor(
    index: usize,
    tensors: &SafeTensors,
    name: &str,
    rank: usize,
) -> Result<(Vec<usize>, Vec<f64>)> {
    let view: TensorView = tensors
        .tensor(name)
        .map_err(|e| InferenceError::Artifact(format!("layer {index}: tensor `{name}`: {e}")))?;

    if view.dtype() != Dtype::F64 {
        return Err(InferenceError::Artifact(format!(
            "tensor `{name}` has dtype {:?}, expected F64",
            view.dtype()
        )));
    }
    if view.shape().len() != rank {
        return Err(InferenceError::Shape {
            what: "artifact tensor rank",
            got: view.shape().len(),
            expected: rank,
        });
    }

    let data = view
        .data()
        .chunks_exact(8)
        .map(|chunk| f64::from_le_bytes(chunk.try_into().unwrap()))
        .collect();

    Ok((view.shape().to_vec(), data))
}
