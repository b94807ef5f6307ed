/*
 * @Date         : 2026-10-16
 * @Description  : 卷积/池化相关的融合算子（仅前向）。
 *                 所有算子均采用NHWC布局，并在batch维度上用Rayon并行计算。
 *                 形状/参数不合法时返回`TensorError`，不会panic。
 */

mod bias_add;
mod conv2d;
mod conv2d_transpose;
mod padding;
mod pool;

pub use padding::Padding;

use std::ops::Range;

use ndarray::{ArrayView4, Ix4};

use crate::errors::{ComparisonOperator, Operator, TensorError};
use crate::tensor::Tensor;

/// 单个空间维度上的窗口几何信息
#[derive(Debug, Clone, Copy)]
struct Window {
    size: usize,
    stride: usize,
    pad_before: usize,
    output: usize,
}

impl Window {
    fn new(input: usize, size: usize, stride: usize, padding: Padding) -> Self {
        let (output, pad_before) = padding.output_and_pad(input, size, stride);
        Self {
            size,
            stride,
            pad_before,
            output,
        }
    }

    /// 输出位置`out`对应窗口内第`k`个元素在输入中的坐标（落在填充区时返回None）
    #[inline]
    fn input_index(&self, out: usize, k: usize, input: usize) -> Option<usize> {
        out.checked_mul(self.stride)?
            .checked_add(k)?
            .checked_sub(self.pad_before)
            .filter(|&i| i < input)
    }

    /// 输出位置`out`的窗口覆盖的输入坐标区间（已去掉填充区）
    fn input_range(&self, out: usize, input: usize) -> Range<usize> {
        let start = out.saturating_mul(self.stride);
        let end = start
            .saturating_add(self.size)
            .saturating_sub(self.pad_before)
            .min(input);
        start.saturating_sub(self.pad_before).min(end)..end
    }
}

impl Tensor {
    /// 以4D（NHWC）视图访问张量
    fn nhwc_view(
        &self,
        operator: Operator,
        operand: &'static str,
    ) -> Result<ArrayView4<'_, f32>, TensorError> {
        let dimension_mismatch = || TensorError::DimensionMismatch {
            operator,
            operand,
            expected: 4,
            got: self.dimension(),
            shape: self.shape().to_vec(),
        };
        if self.dimension() != 4 {
            return Err(dimension_mismatch());
        }
        self.data
            .view()
            .into_dimensionality::<Ix4>()
            .map_err(|_| dimension_mismatch())
    }
}

fn check_positive(value_name: &str, pair: (usize, usize)) -> Result<(), TensorError> {
    if pair.0 == 0 || pair.1 == 0 {
        return Err(TensorError::ValueMustSatisfyComparison {
            value_name: value_name.to_string(),
            operator: ComparisonOperator::GreaterThan,
            threshold: 0,
        });
    }
    Ok(())
}

/// 计算两个方向上的窗口；任一方向输出尺寸为0时报错
fn spatial_windows(
    operator: Operator,
    input_hw: (usize, usize),
    window: (usize, usize),
    stride: (usize, usize),
    padding: Padding,
) -> Result<(Window, Window), TensorError> {
    check_positive("stride", stride)?;
    check_positive("window", window)?;
    let win_h = Window::new(input_hw.0, window.0, stride.0, padding);
    let win_w = Window::new(input_hw.1, window.1, stride.1, padding);
    if win_h.output == 0 || win_w.output == 0 {
        return Err(TensorError::InvalidOutputSize {
            operator,
            input_hw,
            window,
            stride,
        });
    }
    Ok((win_h, win_w))
}
