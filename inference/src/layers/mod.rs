mod conv;
mod dense;
mod layer;
mod pool;
mod test;

pub use conv::Conv2d;
pub use dense::Dense;
pub use layer::Layer;
pub use pool::MaxPool2d;
