/*
 * @Date         : 2026-10-16
 * @Description  : Layer 模块 - 卷积/池化层
 *
 * 每个层只保存超参数（及卷积层的权重），前向计算是对张量算子的一次委托调用。
 */

mod avg_pool2d;
mod conv2d;
mod conv2d_transpose;
mod max_pool2d;

pub use avg_pool2d::AvgPool2d;
pub use conv2d::Conv2d;
pub use conv2d_transpose::Conv2dTranspose;
pub use max_pool2d::MaxPool2d;

use enum_dispatch::enum_dispatch;

use super::{Module, NnError};
use crate::tensor::Tensor;

/// 卷积层权重初始化所用正态分布的标准差
pub(crate) const INIT_STD: f32 = 0.1;

/// 本库所有层的闭合集合（静态分发`Module`）
#[enum_dispatch(Module)]
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    MaxPool2d,
    AvgPool2d,
    Conv2d,
    Conv2dTranspose,
}

impl Layer {
    /// 层类型名（用于日志）
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::MaxPool2d(_) => "MaxPool2d",
            Layer::AvgPool2d(_) => "AvgPool2d",
            Layer::Conv2d(_) => "Conv2d",
            Layer::Conv2dTranspose(_) => "Conv2dTranspose",
        }
    }
}

/// 校验 (h, w) 形式的几何参数均大于0
pub(crate) fn check_geometry(name: &str, pair: (usize, usize)) -> Result<(), NnError> {
    if pair.0 == 0 || pair.1 == 0 {
        return Err(NnError::InvalidConfig(format!(
            "{name} 的各分量须大于0，得到 {pair:?}"
        )));
    }
    Ok(())
}

/// 用外部给定的张量替换某个已初始化的参数，形状须与原参数一致
pub(crate) fn replace_param(
    layer: &str,
    name: &str,
    slot: &mut Tensor,
    value: Tensor,
) -> Result<(), NnError> {
    if !slot.is_same_shape(&value) {
        return Err(NnError::InvalidConfig(format!(
            "{layer} 的 {name} 形状须为 {:?}，得到 {:?}",
            slot.shape(),
            value.shape()
        )));
    }
    *slot = value;
    Ok(())
}
