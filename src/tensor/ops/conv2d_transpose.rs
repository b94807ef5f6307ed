/*
 * @Date         : 2026-10-16
 * @Description  : 2D 转置卷积（TensorFlow 风格，即 conv2d 对输入的梯度）
 *
 * - 输入：[batch, H, W, C_in]
 * - 卷积核：[kH, kW, C_out, C_in]
 * - 输出：由调用方给定 [batch, OH, OW, C_out]
 *
 * 约束：以相同卷积核几何/步长/填充对 [batch, OH, OW, C_out] 做正向卷积，须恰好得到 H×W。
 */

use rayon::prelude::*;
use tracing::trace;

use super::{Padding, spatial_windows};
use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Tensor {
    /// 转置卷积：每个输入元素按卷积核“散射”到输出，重叠部分累加
    pub fn conv2d_transpose(
        &self,
        filter: &Tensor,
        output_shape: [usize; 4],
        strides: (usize, usize),
        padding: Padding,
    ) -> Result<Tensor, TensorError> {
        let op = Operator::Conv2dTranspose;
        let input = self.nhwc_view(op, "输入")?;
        let kernel = filter.nhwc_view(op, "卷积核")?;

        let (batch_size, in_h, in_w, in_c) = input.dim();
        let (k_h, k_w, k_out_c, k_in_c) = kernel.dim();
        let [out_batch, out_h, out_w, out_c] = output_shape;

        if in_c != k_in_c {
            return Err(TensorError::ChannelMismatch {
                operator: op,
                expected: k_in_c,
                got: in_c,
            });
        }
        if out_c != k_out_c {
            return Err(TensorError::ChannelMismatch {
                operator: op,
                expected: k_out_c,
                got: out_c,
            });
        }

        // 输出几何以“正向卷积”的视角计算：其输出须与本算子的输入一致
        let (win_h, win_w) = spatial_windows(op, (out_h, out_w), (k_h, k_w), strides, padding)?;
        if out_batch != batch_size || win_h.output != in_h || win_w.output != in_w {
            return Err(TensorError::OutputShapeMismatch {
                operator: op,
                input_shape: self.shape().to_vec(),
                output_shape: output_shape.to_vec(),
                expected: vec![out_batch, win_h.output, win_w.output, in_c],
            });
        }
        trace!(
            input = ?self.shape(),
            filter = ?filter.shape(),
            ?output_shape,
            ?strides,
            %padding,
            "conv2d_transpose"
        );

        let single_sample_size = out_h * out_w * out_c;
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; single_sample_size];
                for ih in 0..in_h {
                    for iw in 0..in_w {
                        for kh in 0..k_h {
                            let Some(oh) = win_h.input_index(ih, kh, out_h) else {
                                continue;
                            };
                            for kw in 0..k_w {
                                let Some(ow) = win_w.input_index(iw, kw, out_w) else {
                                    continue;
                                };
                                let base = (oh * out_w + ow) * out_c;
                                for ic in 0..in_c {
                                    let x = input[[b, ih, iw, ic]];
                                    for oc in 0..out_c {
                                        sample_data[base + oc] += x * kernel[[kh, kw, oc, ic]];
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
        Tensor::try_new(&all_data, &output_shape)
    }
}
