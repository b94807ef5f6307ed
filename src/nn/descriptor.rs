/*
 * @Date         : 2026-10-16
 * @Description  : 模型描述符（Model Descriptor）
 *                 以 JSON 声明式地配置层序列，用于构建、保存和加载模型
 */

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AvgPool2d, Conv2d, Conv2dTranspose, Layer, MaxPool2d, NnError, Sequential};
use crate::tensor::Padding;

/// 当前描述符格式版本
pub const DESCRIPTOR_VERSION: &str = "1.0";

/// 模型的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// 格式版本（用于向后兼容）
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// 按前向顺序排列的各层
    pub layers: Vec<LayerDescriptor>,
    /// 参数文件路径（相对于 JSON 文件），仅在保存完整模型时使用
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params_file: Option<String>,
}

/// 层描述（包含类型特定的超参数），缺省字段取各层的默认值。
/// 同时接受原 Python 工具包的类名（`Conv2D`、`Conv2D_Transpose`）与字段名（`poolsize`、`border_mode`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerDescriptor {
    MaxPooling {
        #[serde(default = "default_pool_size", alias = "poolsize")]
        pool_size: (usize, usize),
        #[serde(default = "default_stride")]
        stride: (usize, usize),
        #[serde(default, alias = "border_mode")]
        padding: Padding,
    },
    AvgPooling {
        #[serde(default = "default_pool_size", alias = "poolsize")]
        pool_size: (usize, usize),
        #[serde(default = "default_stride")]
        stride: (usize, usize),
        #[serde(default, alias = "border_mode")]
        padding: Padding,
    },
    #[serde(alias = "Conv2D")]
    Conv2d {
        input_channels: usize,
        num_filters: usize,
        #[serde(default = "default_kernel_size")]
        kernel_size: (usize, usize),
        #[serde(default = "default_stride")]
        stride: (usize, usize),
        #[serde(default, alias = "border_mode")]
        padding: Padding,
    },
    #[serde(alias = "Conv2D_Transpose")]
    Conv2dTranspose {
        input_channels: usize,
        num_filters: usize,
        output_shape: (usize, usize),
        /// 缺省时卷积核与输出同尺寸
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kernel_size: Option<(usize, usize)>,
        #[serde(default = "default_stride")]
        stride: (usize, usize),
        #[serde(default, alias = "border_mode")]
        padding: Padding,
    },
}

fn default_version() -> String {
    DESCRIPTOR_VERSION.to_string()
}

const fn default_pool_size() -> (usize, usize) {
    (2, 2)
}

const fn default_kernel_size() -> (usize, usize) {
    (3, 3)
}

const fn default_stride() -> (usize, usize) {
    (1, 1)
}

impl LayerDescriptor {
    /// 按描述构建层；卷积层的权重由`rng`随机初始化
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Layer, NnError> {
        let layer = match *self {
            LayerDescriptor::MaxPooling {
                pool_size,
                stride,
                padding,
            } => MaxPool2d::new(pool_size, stride, padding)?.into(),
            LayerDescriptor::AvgPooling {
                pool_size,
                stride,
                padding,
            } => AvgPool2d::new(pool_size, stride, padding)?.into(),
            LayerDescriptor::Conv2d {
                input_channels,
                num_filters,
                kernel_size,
                stride,
                padding,
            } => Conv2d::new_with_rng(
                input_channels,
                num_filters,
                kernel_size,
                stride,
                padding,
                rng,
            )?
            .into(),
            LayerDescriptor::Conv2dTranspose {
                input_channels,
                num_filters,
                output_shape,
                kernel_size,
                stride,
                padding,
            } => Conv2dTranspose::new_with_rng(
                input_channels,
                num_filters,
                output_shape,
                kernel_size.unwrap_or(output_shape),
                stride,
                padding,
                rng,
            )?
            .into(),
        };
        Ok(layer)
    }
}

impl From<&Layer> for LayerDescriptor {
    fn from(layer: &Layer) -> Self {
        match layer {
            Layer::MaxPool2d(pool) => LayerDescriptor::MaxPooling {
                pool_size: pool.pool_size(),
                stride: pool.stride(),
                padding: pool.padding(),
            },
            Layer::AvgPool2d(pool) => LayerDescriptor::AvgPooling {
                pool_size: pool.pool_size(),
                stride: pool.stride(),
                padding: pool.padding(),
            },
            Layer::Conv2d(conv) => LayerDescriptor::Conv2d {
                input_channels: conv.input_channels(),
                num_filters: conv.num_filters(),
                kernel_size: conv.kernel_size(),
                stride: conv.stride(),
                padding: conv.padding(),
            },
            Layer::Conv2dTranspose(deconv) => LayerDescriptor::Conv2dTranspose {
                input_channels: deconv.input_channels(),
                num_filters: deconv.num_filters(),
                output_shape: deconv.output_shape(),
                kernel_size: Some(deconv.kernel_size())
                    .filter(|&kernel| kernel != deconv.output_shape()),
                stride: deconv.stride(),
                padding: deconv.padding(),
            },
        }
    }
}

impl ModelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, NnError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, NnError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 文件读取
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NnError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// 写入 JSON 文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), NnError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl Sequential {
    /// 按描述符构建模型，所有卷积层共用一个以`seed`初始化的RNG
    pub fn from_descriptor(descriptor: &ModelDescriptor, seed: u64) -> Result<Self, NnError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut model = Sequential::new();
        for layer in &descriptor.layers {
            model.push(layer.build(&mut rng)?);
        }
        debug!(
            name = %descriptor.name,
            layers = model.len(),
            "由描述符构建 Sequential 模型"
        );
        Ok(model)
    }

    /// 生成当前模型的描述符（不含参数）
    pub fn describe(&self, name: &str) -> ModelDescriptor {
        ModelDescriptor {
            version: default_version(),
            name: name.to_string(),
            layers: self.layers().iter().map(LayerDescriptor::from).collect(),
            params_file: None,
        }
    }
}
