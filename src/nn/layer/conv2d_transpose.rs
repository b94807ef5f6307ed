/*
 * @Date         : 2026-10-16
 * @Description  : Conv2dTranspose (2D 转置卷积) 层 - TensorFlow 风格 API
 *
 * 输入/输出形状（NHWC）：
 * - 输入：[batch_size, H, W, in_channels]
 * - 输出：[batch_size, output_h, output_w, num_filters]，batch_size 在前向时从输入读取
 *
 * 计算：output = bias_add(conv2d_transpose(x, filter, output_shape), b)
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{INIT_STD, check_geometry, replace_param};
use crate::nn::{Module, NnError};
use crate::tensor::{Padding, Tensor};

/// Conv2dTranspose (2D 转置卷积) 层
///
/// # 参数布局
/// - 卷积核：[kernel_h, kernel_w, num_filters, in_channels]（注意输入/输出通道的顺序与 Conv2d 相反）
/// - 偏置：[num_filters]
///
/// 卷积核空间尺寸缺省取`output_shape`（见`new_output_sized`），也可显式指定。
///
/// `output_shape` 须与输入尺寸对应：以同样的核/步长/填充对输出做正向卷积应得到输入的 H×W，
/// 否则前向传播时报错。
#[derive(Debug, Clone, PartialEq)]
pub struct Conv2dTranspose {
    filter: Tensor,
    bias: Tensor,
    input_channels: usize,
    num_filters: usize,
    /// 输出空间尺寸 (H, W)
    output_shape: (usize, usize),
    kernel_size: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
}

impl Conv2dTranspose {
    /// 创建新的 Conv2dTranspose 层（权重随机初始化）
    pub fn new(
        input_channels: usize,
        num_filters: usize,
        output_shape: (usize, usize),
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        Self::new_with_rng(
            input_channels,
            num_filters,
            output_shape,
            kernel_size,
            stride,
            padding,
            &mut rand::thread_rng(),
        )
    }

    /// 创建卷积核空间尺寸等于`output_shape`的 Conv2dTranspose 层（权重随机初始化），
    /// 即卷积核形状为 [output_h, output_w, num_filters, in_channels]
    pub fn new_output_sized(
        input_channels: usize,
        num_filters: usize,
        output_shape: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        Self::new(
            input_channels,
            num_filters,
            output_shape,
            output_shape,
            stride,
            padding,
        )
    }

    /// 创建新的 Conv2dTranspose 层（带种子，确保可重复性）
    pub fn new_seeded(
        input_channels: usize,
        num_filters: usize,
        output_shape: (usize, usize),
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        seed: u64,
    ) -> Result<Self, NnError> {
        Self::new_with_rng(
            input_channels,
            num_filters,
            output_shape,
            kernel_size,
            stride,
            padding,
            &mut StdRng::seed_from_u64(seed),
        )
    }

    /// 创建新的 Conv2dTranspose 层，权重由给定的RNG生成
    pub fn new_with_rng<R: Rng + ?Sized>(
        input_channels: usize,
        num_filters: usize,
        output_shape: (usize, usize),
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
        rng: &mut R,
    ) -> Result<Self, NnError> {
        check_geometry("channels", (input_channels, num_filters))?;
        check_geometry("output_shape", output_shape)?;
        check_geometry("kernel_size", kernel_size)?;
        check_geometry("stride", stride)?;

        let (k_h, k_w) = kernel_size;
        let filter =
            Tensor::normal_with_rng(0.0, INIT_STD, &[k_h, k_w, num_filters, input_channels], rng);
        let bias = Tensor::normal_with_rng(0.0, INIT_STD, &[num_filters], rng);
        debug!(
            input_channels,
            num_filters,
            ?output_shape,
            ?kernel_size,
            ?stride,
            %padding,
            "创建 Conv2dTranspose 层"
        );

        Ok(Self {
            filter,
            bias,
            input_channels,
            num_filters,
            output_shape,
            kernel_size,
            stride,
            padding,
        })
    }

    /// 用外部给定的权重创建 Conv2dTranspose 层
    pub fn from_params(
        filter: Tensor,
        bias: Tensor,
        output_shape: (usize, usize),
        stride: (usize, usize),
        padding: Padding,
    ) -> Result<Self, NnError> {
        let &[k_h, k_w, num_filters, input_channels] = filter.shape() else {
            return Err(NnError::InvalidConfig(format!(
                "Conv2dTranspose 卷积核须为 4D [kH, kW, C_out, C_in]，得到 {:?}",
                filter.shape()
            )));
        };
        if bias.shape() != [num_filters] {
            return Err(NnError::InvalidConfig(format!(
                "Conv2dTranspose 偏置形状须为 [{num_filters}]，得到 {:?}",
                bias.shape()
            )));
        }
        check_geometry("channels", (input_channels, num_filters))?;
        check_geometry("output_shape", output_shape)?;
        check_geometry("kernel_size", (k_h, k_w))?;
        check_geometry("stride", stride)?;
        debug!(
            filter = ?filter.shape(),
            ?output_shape,
            ?stride,
            %padding,
            "以给定权重创建 Conv2dTranspose 层"
        );

        Ok(Self {
            filter,
            bias,
            input_channels,
            num_filters,
            output_shape,
            kernel_size: (k_h, k_w),
            stride,
            padding,
        })
    }

    /// 用给定的卷积核替换随机初始化的卷积核（偏置保持不变），形状须为 [kH, kW, C_out, C_in]
    ///
    /// ```ignore
    /// let layer = Conv2dTranspose::new(...)?.with_filter(filter)?;
    /// ```
    pub fn with_filter(mut self, filter: Tensor) -> Result<Self, NnError> {
        replace_param("Conv2dTranspose", "filter", &mut self.filter, filter)?;
        Ok(self)
    }

    /// 用给定的偏置替换随机初始化的偏置（卷积核保持不变）
    pub fn with_bias(mut self, bias: Tensor) -> Result<Self, NnError> {
        replace_param("Conv2dTranspose", "bias", &mut self.bias, bias)?;
        Ok(self)
    }

    /// 前向传播，输出形状 [batch_size, output_h, output_w, num_filters]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
        // 输入维度不对时交给算子报错
        let batch_size = x.shape().first().copied().unwrap_or(0);
        let (out_h, out_w) = self.output_shape;
        let deconv_shape = [batch_size, out_h, out_w, self.num_filters];
        let conv_out =
            x.conv2d_transpose(&self.filter, deconv_shape, self.stride, self.padding)?;
        Ok(conv_out.bias_add(&self.bias)?)
    }

    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    pub fn num_filters(&self) -> usize {
        self.num_filters
    }

    pub fn output_shape(&self) -> (usize, usize) {
        self.output_shape
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

    /// 卷积核 [kH, kW, C_out, C_in]
    pub fn filter(&self) -> &Tensor {
        &self.filter
    }

    pub fn bias(&self) -> &Tensor {
        &self.bias
    }
}

impl Module for Conv2dTranspose {
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
