use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error("数据长度{data_len}与形状{shape:?}不匹配")]
    InvalidDataLength { data_len: usize, shape: Vec<usize> },

    // 算子输入校验
    #[error("{operator}的{operand}须为{expected}维，实际为{got}维（形状{shape:?}）")]
    DimensionMismatch {
        operator: Operator,
        operand: &'static str,
        expected: usize,
        got: usize,
        shape: Vec<usize>,
    },
    #[error("{operator}的通道数不匹配：期望{expected}，实际为{got}")]
    ChannelMismatch {
        operator: Operator,
        expected: usize,
        got: usize,
    },
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    ShapeMismatch {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("{operator}的输出形状{output_shape:?}与输入形状{input_shape:?}不对应（正向卷积应得到{expected:?}）")]
    OutputShapeMismatch {
        operator: Operator,
        input_shape: Vec<usize>,
        output_shape: Vec<usize>,
        expected: Vec<usize>,
    },
    #[error("{operator}输出尺寸无效：输入{input_hw:?}，窗口{window:?}，步长{stride:?}")]
    InvalidOutputSize {
        operator: Operator,
        input_hw: (usize, usize),
        window: (usize, usize),
        stride: (usize, usize),
    },

    #[error("未知的填充方式`{0}`，仅支持SAME或VALID")]
    UnknownPadding(String),
    #[error("张量（反）序列化失败：{0}")]
    Serialization(String),
}
