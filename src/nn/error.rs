/*
 * @Date         : 2026-10-16
 * @Description  : nn 模块的错误类型
 */

use thiserror::Error;

use crate::errors::TensorError;

/// 层的构建、前向计算及参数读写时的错误
#[derive(Error, Debug)]
pub enum NnError {
    /// 底层张量算子报错（形状/通道/步长等不合法）
    #[error(transparent)]
    Tensor(#[from] TensorError),
    #[error("层配置无效：{0}")]
    InvalidConfig(String),
    #[error("参数个数不匹配：模型有{expected}个，读入{got}个")]
    ParamCountMismatch { expected: usize, got: usize },
    #[error("第{index}个参数形状不匹配：模型为{expected:?}，读入{got:?}")]
    ParamShapeMismatch {
        index: usize,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}
