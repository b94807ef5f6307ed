/*
 * @Date         : 2026-10-16
 * @Description  : 2D 最大/平均池化（TensorFlow 风格）
 *
 * - 输入：[batch, H, W, C]，输出：[batch, H', W', C]
 * - 各通道独立池化
 * - SAME 填充时，填充区不参与计算：最大池化忽略之，平均池化只按有效元素个数求均值
 */

use ndarray::ArrayView4;
use rayon::prelude::*;
use tracing::trace;

use super::{Padding, Window, spatial_windows};
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

#[derive(Debug, Clone, Copy)]
enum PoolKind {
    Max,
    Avg,
}

impl PoolKind {
    const fn operator(self) -> Operator {
        match self {
            PoolKind::Max => Operator::MaxPool2d,
            PoolKind::Avg => Operator::AvgPool2d,
        }
    }
}

impl Tensor {
    /// 最大池化
    pub fn max_pool2d(
        &self,
        pool_size: (usize, usize),
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        self.pool2d(PoolKind::Max, pool_size, strides, padding)
    }

    /// 平均池化
    pub fn avg_pool2d(
        &self,
        pool_size: (usize, usize),
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        self.pool2d(PoolKind::Avg, pool_size, strides, padding)
    }

    fn pool2d(
        &self,
        kind: PoolKind,
        pool_size: (usize, usize),
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        let input = self.nhwc_view(kind.operator(), "输入")?;
        let (batch_size, in_h, in_w, channels) = input.dim();
        let (win_h, win_w) =
            spatial_windows(kind.operator(), (in_h, in_w), pool_size, strides, padding)?;
        let (out_h, out_w) = (win_h.output, win_w.output);
        trace!(input = ?self.shape(), ?pool_size, ?strides, %padding, ?kind, "pool2d");

        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = Vec::with_capacity(out_h * out_w * channels);
                for oh in 0..out_h {
                    for ow in 0..out_w {
                        for c in 0..channels {
                            sample_data.push(pool_window(
                                &input, kind, b, c, (oh, ow), (&win_h, &win_w), (in_h, in_w),
                            ));
                        }
                    }
                }
                sample_data
            })
            .collect();

        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Tensor::try_new(&all_data, &[batch_size, out_h, out_w, channels])
    }
}

/// 对单个输出位置的窗口求值。SAME/VALID 下每个窗口至少覆盖一个有效元素。
fn pool_window(
    input: &ArrayView4<'_, f32>,
    kind: PoolKind,
    b: usize,
    c: usize,
    (oh, ow): (usize, usize),
    (win_h, win_w): (&Window, &Window),
    (in_h, in_w): (usize, usize),
) -> f32 {
    let cols = win_w.input_range(ow, in_w);
    let valid = win_h
        .input_range(oh, in_h)
        .flat_map(|ih| cols.clone().map(move |iw| input[[b, ih, iw, c]]));

    match kind {
        PoolKind::Max => valid.fold(f32::NEG_INFINITY, f32::max),
        PoolKind::Avg => {
            let (sum, count) = valid.fold((0.0f32, 0usize), |(s, n), v| (s + v, n + 1));
            sum / count as f32
        }
    }
}
