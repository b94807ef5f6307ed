/*
 * @Date         : 2026-10-16
 * @Description  : Conv2d (2D 卷积) 层 - TensorFlow 风格 API
 *
 * 输入/输出形状（NHWC）：
 * - 输入：[batch_size, H, W, in_channels]
 * - 输出：[batch_size, H', W', num_filters]
 *
 * 计算：output = bias_add(conv2d(x, filter), b)
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{INIT_STD, check_geometry, replace_param};
use crate::nn::{Module, NnError};
use crate::tensor::{Padding, Tensor};

/// Conv2d (2D 卷积) 层
///
/// # 参数布局
/// - 卷积核：[kernel_h, kernel_w, in_channels, num_filters]
/// - 偏置：[num_filters]
///
/// 未给定权重时，两者均按 N(0, 0.1²) 随机初始化一次，此后只由外部训练循环修改。
///
/// # 使用示例
/// ```ignore
/// let conv = Conv2d::new(3, 32, (3, 3), (1, 1), Padding::Same)?;
/// let h = conv.forward(&x)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2d {
    filter: Tensor,
    bias: Tensor,
    input_channels: usize,
    num_filters: usize,
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
}

impl Conv2d {
    /// 创建新的 Conv2d 层（权重随机初始化）
    ///
    /// # 参数
    /// - `input_channels`: 输入通道数
    /// - `num_filters`: 卷积核个数，即输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)
    /// - `padding`: SAME 或 VALID
    pub fn new(
        input_channels: usize,
        num_filters: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        Self::new_with_rng(
            input_channels,
            num_filters,
            kernel_size,
            stride,
            padding,
            &mut rand::thread_rng(),
        )
    }

    /// 创建新的 Conv2d 层（带种子，确保可重复性）
    pub fn new_seeded(
        input_channels: usize,
        num_filters: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        seed: u64,
    ) -> Result<Self, NnError> {
        Self::new_with_rng(
            input_channels,
            num_filters,
            kernel_size,
            stride,
            padding,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    /// 创建新的 Conv2d 层，权重由给定的RNG生成
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_channels: usize,
        num_filters: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        rng: &mut R,
    ) -> Result<Self, NnError> {
        check_geometry("channels", (input_channels, num_filters))?;
        check_geometry("kernel_size", kernel_size)?;
        check_geometry("stride", stride)?;

        let (k_h, k_w) = kernel_size;
        let filter =
            Tensor::normal_with_rng(0.0, INIT_STD, &[k_h, k_w, input_channels, num_filters], rng);
        let bias = Tensor::normal_with_rng(0.0, INIT_STD, &[num_filters], rng);
        debug!(
            input_channels,
            num_filters,
            ?kernel_size,
            ?stride,
            %padding,
            "创建 Conv2d 层"
        );

        Ok(Self {
            filter,
            bias,
            input_channels,
            num_filters,
            kernel_size,
            stride,
            padding,
        })
    }

    /// 用外部给定的权重创建 Conv2d 层；通道数与卷积核大小由`filter`的形状推出
    pub fn from_params(
        filter: Tensor,
        bias: Tensor,
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        let &[k_h, k_w, input_channels, num_filters] = filter.shape() else {
            return Err(NnError::InvalidConfig(format!(
                "Conv2d 卷积核须为 4D [kH, kW, C_in, C_out]，得到 {:?}",
                filter.shape()
            )));
        };
        if bias.shape() != [num_filters] {
            return Err(NnError::InvalidConfig(format!(
                "Conv2d 偏置形状须为 [{num_filters}]，得到 {:?}",
                bias.shape()
            )));
        }
        check_geometry("channels", (input_channels, num_filters))?;
        check_geometry("kernel_size", (k_h, k_w))?;
        check_geometry("stride", stride)?;
        debug!(filter = ?filter.shape(), ?stride, %padding, "以给定权重创建 Conv2d 层");

        Ok(Self {
            filter,
            bias,
            input_channels,
            num_filters,
            kernel_size: (k_h, k_w),
            stride,
            padding,
        })
    }

    /// 用给定的卷积核替换随机初始化的卷积核（偏置保持不变），形状须为 [kH, kW, C_in, C_out]
    ///
    /// ```ignore
    /// let layer = Conv2d::new(...)?.with_filter(filter)?;
    /// ```
    pub fn with_filter(mut self, filter: Tensor) -> Result<Self, NnError> {
        replace_param("Conv2d", "filter", &mut self.filter, filter)?;
        Ok(self)
    }

    /// 用给定的偏置替换随机初始化的偏置（卷积核保持不变）
    pub fn with_bias(mut self, bias: Tensor) -> Result<Self, NnError> {
        replace_param("Conv2d", "bias", &mut self.bias, bias)?;
        Ok(self)
    }

    /// 前向传播
    ///
    /// # 参数
    /// - `x`: 输入，形状 [batch_size, H, W, in_channels]
    ///
    /// # 返回
    /// 输出，形状 [batch_size, H', W', num_filters]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        let conv_out = x.conv2d(&self.filter, self.stride, self.padding)?;
        Ok(conv_out.bias_add(&self.bias)?)
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn num_filters(&self) -> usize {
        self.num_filters
    }

    pub fn kernel_size(&self) -> (usize, usize) {
        self.kernel_size
    }

    pub fn stride(&self) -> (usize, usize) {
        self.stride
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// 卷积核 [kH, kW, C_in, C_out]
    pub fn filter(&self) -> &Tensor {
        &self.filter
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }
}

impl Module for Conv2d {
    fn train_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError> {
        self.forward(state_below)
    }

    fn variables(&self) -> Vec<&Tensor> {
        vec![&self.filter, &self.bias]
    }

    fn variables_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.filter, &mut self.bias]
    }
}
