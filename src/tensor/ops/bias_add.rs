use tracing::trace;

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;

impl Tensor {
    /// 沿最后一维（通道维）加上偏置：`bias`须为1D，且长度等于`self`最后一维的大小
    pub fn bias_add(&self, bias: &Tensor) -> Result<Tensor, TensorError> {
        let channels = self.shape().last().copied();
        if bias.dimension() != 1 || channels != Some(bias.size()) {
            return Err(TensorError::ShapeMismatch {
                operator: Operator::BiasAdd,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: bias.shape().to_vec(),
            });
        }
        trace!(value = ?self.shape(), bias = ?bias.shape(), "bias_add");

        let mut data = self.data.clone();
        data += &bias.data;
        Ok(Tensor { data })
    }
}
