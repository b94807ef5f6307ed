use std::fmt::{self, Display};

/// 张量算子，用于错误信息中标明出错的运算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Conv2d,
    Conv2dTranspose,
    MaxPool2d,
    AvgPool2d,
    BiasAdd,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Operator::Conv2d => "卷积",
            Operator::Conv2dTranspose => "转置卷积",
            Operator::MaxPool2d => "最大池化",
            Operator::AvgPool2d => "平均池化",
            Operator::BiasAdd => "偏置相加",
        };
        write!(f, "{}", operation_name)
    }
}

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    GreaterThan,
}
impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator_name = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::GreaterThan => ">",
        };
        write!(f, "{}", operator_name)
    }
}
