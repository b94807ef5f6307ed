/*
 * @Date         : 2026-10-16
 * @Description  : AvgPool2d (2D 平均池化) 层
 *
 * - 输入格式：[batch_size, H, W, channels]（NHWC）
 * - 输出格式：[batch_size, H', W', channels]
 * - 无可学习参数
 * - SAME 填充时，越界部分不计入均值的分母
 *
 * 等价于 TensorFlow 的 tf.nn.avg_pool
 */

use tracing::debug;

use super::check_geometry;
use crate::nn::{Module, NnError};
use crate::tensor::{Padding, Tensor};

/// AvgPool2d (2D 平均池化) 层，输出尺寸的计算同`MaxPool2d`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvgPool2d {
    /// 池化窗口大小 (pool_h, pool_w)
    pool_size: (usize, usize),
    /// 步长 (stride_h, stride_w)
    stride: (usize, usize),
    padding: Padding,
}

impl AvgPool2d {
    /// 创建 AvgPool2d 层；窗口或步长含0时报错
    pub fn new(
        pool_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        check_geometry("pool_size", pool_size)?;
        check_geometry("stride", stride)?;
        debug!(?pool_size, ?stride, %padding, "创建 AvgPool2d 层");
        Ok(Self {
            pool_size,
            stride,
            padding,
        })
    }

    /// 前向传播
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        Ok(x.avg_pool2d(self.pool_size, self.stride, self.padding)?)
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
impl Default for AvgPool2d {
    fn default() -> Self {
        Self {
            pool_size: (2, 2),
            stride: (1, 1),
            padding: Padding::Same,
        }
    }
}

impl Module for AvgPool2d {
    fn train_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError> {
        self.forward(state_below)
    }
}
