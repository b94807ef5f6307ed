/*
 * @Date         : 2026-10-16
 * @Description  : 负责神经网络（neural network）层的构建与组合
 */

mod error;
mod module;

mod descriptor;
pub mod layer;
mod model_io;
mod sequential;

pub use descriptor::{DESCRIPTOR_VERSION, LayerDescriptor, ModelDescriptor};
pub use error::NnError;
pub use layer::{AvgPool2d, Conv2d, Conv2dTranspose, Layer, MaxPool2d};
pub use model_io::{load_variables, save_variables};
pub use module::Module;
pub use sequential::Sequential;

pub use crate::tensor::Padding;

#[cfg(test)]
mod tests;
