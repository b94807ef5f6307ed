/*
 * @Date         : 2026-10-16
 * @Description  : Module trait 定义（所有层的模板）
 */

use enum_dispatch::enum_dispatch;

use super::NnError;
use crate::tensor::Tensor;

/// 模块 trait
///
/// # 设计原则
/// - `new()` **不是** trait 方法（参数各异）
/// - 前向计算分训练/推理两条路径；本库的层两者一致，故`test_fprop`默认转发给`train_fprop`
/// - 可训练张量由层自己持有，外部训练循环通过`variables_mut()`更新
///
/// # 使用示例
///
/// ```ignore
/// use tensorgraph::nn::{Conv2d, MaxPool2d, Module, Padding, Sequential};
///
/// let model = Sequential::new()
///     .with(Conv2d::new(3, 16, (3, 3), (1, 1), Padding::Same)?)
///     .with(MaxPool2d::new((2, 2), (2, 2), Padding::Valid)?);
/// let y = model.train_fprop(&x)?;
/// ```
#[enum_dispatch]
pub trait Module {
    /// 训练时的前向计算，`state_below`为下层输出（NHWC）
    fn train_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError>;

    /// 推理时的前向计算
    fn test_fprop(&self, state_below: &Tensor) -> Result<Tensor, NnError> {
        self.train_fprop(state_below)
    }

    /// 所有可训练参数（顺序固定，如卷积层为`[filter, bias]`）
    fn variables(&self) -> Vec<&Tensor> {
        Vec::new()
    }

    /// 所有可训练参数的可变引用，顺序与`variables()`一致
    fn variables_mut(&mut self) -> Vec<&mut Tensor> {
        Vec::new()
    }

    /// 参数（标量）总数
    fn num_params(&self) -> usize {
        self.variables().iter().map(|t| t.size()).sum()
    }
}
