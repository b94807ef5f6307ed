/*
 * @Date         : 2026-10-16
 * @Description  : MaxPool2d (2D 最大池化) 层
 *
 * - 输入格式：[batch_size, H, W, channels]（NHWC）
 * - 输出格式：[batch_size, H', W', channels]
 * - 无可学习参数
 *
 * 等价于 TensorFlow 的 tf.nn.max_pool
 */

use tracing::debug;

use super::check_geometry;
use crate::nn::{Module, NnError};
use crate::tensor::{Padding, Tensor};

/// MaxPool2d (2D 最大池化) 层
///
/// # 输出尺寸计算
/// ```text
/// SAME:  H' = ceil(H / stride_h)
/// VALID: H' = (H - pool_h) / stride_h + 1
/// ```
///
/// # 使用示例
/// ```ignore
/// let pool = MaxPool2d::new((2, 2), (2, 2), Padding::Valid)?;
/// let y = pool.forward(&x)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool2d {
    /// 池化窗口大小 (pool_h, pool_w)
    pool_size: (usize, usize),
    /// 步长 (stride_h, stride_w)
    stride: (usize, usize),
    padding: Padding,
}

impl MaxPool2d {
    /// 创建 MaxPool2d 层；窗口或步长含0时报错
    pub fn new(
        pool_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        check_geometry("pool_size", pool_size)?;
        check_geometry("stride", stride)?;
        debug!(?pool_size, ?stride, %padding, "创建 MaxPool2d 层");
        Ok(Self {
            pool_size,
            stride,
            padding,
        })
    }

    /// 前向传播
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        Ok(x.max_pool2d(self.pool_size, self.stride, self.padding)?)
    }

    pub fn pool_size(&self) -> (usize, usize) {
        self.pool_size
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }
}

/// 默认：2x2窗口，步长1，SAME填充
impl Default for MaxPool2d {
    fn default() -> Self {
        Self {
            pool_size: (2, 2),
            stride: (1, 1),
            padding: Padding::Same,
        }
    }
}

impl Module for MaxPool2d {
    fn train_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError> {
        self.forward(state_below)
    }
}
