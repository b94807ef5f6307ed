/*
 * @Date         : 2026-10-16
 * @Description  : 2D 卷积（TensorFlow 风格）
 *
 * - 输入：[batch, H, W, C_in]
 * - 卷积核：[kH, kW, C_in, C_out]
 * - 输出：[batch, H', W', C_out]，H'/W' 由填充方式决定（见`Padding::output_and_pad`）
 */

use rayon::prelude::*;
use tracing::trace;

use super::{Padding, spatial_windows};
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Tensor {
    /// 对NHWC输入做2D卷积（实为互相关，与主流框架一致），填充区视为0
    pub fn conv2d(
        &self,
        filter: &Tensor,
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        let input = self.nhwc_view(Operator::Conv2d, "输入")?;
        let kernel = filter.nhwc_view(Operator::Conv2d, "卷积核")?;

        let (batch_size, in_h, in_w, in_c) = input.dim();
        let (k_h, k_w, k_in_c, out_c) = kernel.dim();
        if in_c != k_in_c {
            return Err(TensorError::ChannelMismatch {
                operator: Operator::Conv2d,
                expected: k_in_c,
                got: in_c,
            });
        }

        let (win_h, win_w) =
            spatial_windows(Operator::Conv2d, (in_h, in_w), (k_h, k_w), strides, padding)?;
        let (out_h, out_w) = (win_h.output, win_w.output);
        trace!(
            input = ?self.shape(),
            filter = ?filter.shape(),
            ?strides,
            %padding,
            "conv2d"
        );

        let single_sample_size = out_h * out_w * out_c;
        // Rayon 并行计算每个 batch 样本
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; single_sample_size];
                for oh in 0..out_h {
                    for ow in 0..out_w {
                        let base = (oh * out_w + ow) * out_c;
                        for kh in 0..k_h {
                            let Some(ih) = win_h.input_index(oh, kh, in_h) else {
                                continue;
                            };
                            for kw in 0..k_w {
                                let Some(iw) = win_w.input_index(ow, kw, in_w) else {
                                    continue;
                                };
                                for ic in 0..in_c {
                                    let x = input[[b, ih, iw, ic]];
                                    for oc in 0..out_c {
                                        sample_data[base + oc] += x * kernel[[kh, kw, ic, oc]];
                                    }
                                }
                            }
                        }
                    }
                }
                sample_data
            })
            .collect();

        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Tensor::try_new(&all_data, &[batch_size, out_h, out_w, out_c])
    }
}
