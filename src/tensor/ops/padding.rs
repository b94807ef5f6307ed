use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

/// 卷积/池化的边界填充方式（与TensorFlow的`padding`参数语义一致）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Padding {
    /// 输出尺寸为`ceil(输入 / 步长)`，不足部分在两侧补齐（多出的一格补在后侧）
    #[default]
    #[serde(rename = "SAME", alias = "same")]
    Same,
    /// 不填充，窗口必须完全落在输入内
    #[serde(rename = "VALID", alias = "valid")]
    Valid,
}

impl Padding {
    /// 计算单个空间维度的输出尺寸与前侧（上/左）填充量。
    ///
    /// 返回`(output, pad_before)`；`Valid`下窗口大于输入时输出为0。
    /// `stride`为0或窗口几何溢出`usize`时输出恒为0，由调用方据此报错。
    pub fn output_and_pad(&self, input: usize, window: usize, stride: usize) -> (usize, usize) {
        if stride == 0 {
            return (0, 0);
        }
        match self {
            Padding::Valid => {
                if input < window {
                    (0, 0)
                } else {
                    ((input - window) / stride + 1, 0)
                }
            }
            Padding::Same => {
                let output = input.div_ceil(stride);
                if output == 0 {
                    return (0, 0);
                }
                let Some(span) = (output - 1)
                    .checked_mul(stride)
                    .and_then(|v| v.checked_add(window))
                else {
                    return (0, 0);
                };
                (output, span.saturating_sub(input) / 2)
            }
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Padding::Same => write!(f, "SAME"),
            Padding::Valid => write!(f, "VALID"),
        }
    }
}

impl FromStr for Padding {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SAME" => Ok(Padding::Same),
            "VALID" => Ok(Padding::Valid),
            _ => Err(TensorError::UnknownPadding(s.to_string())),
        }
    }
}
