/*
 * @Date         : 2026-10-16
 * @Description  : 张量（Tensor）及其卷积/池化算子。
 *                 层（nn::layer）只保存超参数与权重，数值计算全部委托给这里的算子。
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{ComparisonOperator, TensorError};

pub mod ops;

mod index;
mod property;
mod save_load;

pub use ops::Padding;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。卷积/池化相关算子统一使用`NHWC`布局：`[batch, height, width, channels]`。
/// 注：只要通过Tensor初始化的都是张量（即使标量也是张量）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    /// 需要处理错误时请使用`try_new`。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{}", e),
        }
    }

    /// `new`的可失败版本
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Tensor, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::InvalidDataLength {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Tensor { data })
    }

    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个服从正态分布N(mean, std_dev²)的随机张量（使用线程本地RNG）
    pub fn normal(mean: f32, std_dev: f32, shape: &[usize]) -> Tensor {
        Self::normal_with_rng(mean, std_dev, shape, &mut rand::thread_rng())
    }

    /// 同`normal`，但使用调用方给定的RNG（如带种子的`StdRng`），以便结果可复现。
    /// 采样方式为Box-Muller变换。
    pub fn normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        assert!(
            std_dev >= 0.0,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "std_dev".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 0,
            }
        );
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            // 下界取EPSILON，避免ln(0)
            let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            data.push(mean + std_dev * r * theta.cos());
            if data.len() < data_len {
                data.push(mean + std_dev * r * theta.sin());
            }
        }

        Tensor::new(&data, shape)
    }
}
