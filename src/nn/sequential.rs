/*
 * @Date         : 2026-10-16
 * @Description  : Sequential 容器 - 按顺序串联多个层
 */

use tracing::trace;

use super::{Layer, Module, NnError};
use crate::tensor::Tensor;

/// 顺序容器：前一层的输出即后一层的输入
///
/// # 使用示例
/// ```ignore
/// let model = Sequential::new()
///     .with(Conv2d::new(1, 8, (3, 3), (1, 1), Padding::Same)?)
///     .with(MaxPool2d::new((2, 2), (2, 2), Padding::Valid)?);
/// let y = model.test_fprop(&x)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequential {
    layers: Vec<Layer>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一层（builder 风格）
    pub fn with(mut self, layer: impl Into<Layer>) -> Self {
        self.push(layer);
        self
    }

    /// 追加一层
    pub fn push(&mut self, layer: impl Into<Layer>) {
        self.layers.push(layer.into());
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn fprop(
        &self,
        state_below: &Tensor,
        step: impl Fn(&Layer, &Tensor) -> Result<Tensor, NnError>,
    ) -> Result<Tensor, NnError> {
        let mut state = state_below.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            state = step(layer, &state)?;
            trace!(index = i, layer = layer.kind(), output = ?state.shape(), "Sequential 前向");
        }
        Ok(state)
    }
}

impl Module for Sequential {
    fn train_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError> {
        self.fprop(state_below, |layer, x| layer.train_fprop(x))
    }

    fn test_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError> {
        self.fprop(state_below, |layer, x| layer.test_fprop(x))
    }

    fn variables(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|layer| layer.variables()).collect()
    }

    fn variables_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.variables_mut())
            .collect()
    }
}
