//! # tensorgraph
//!
//! 基于[ndarray](https://docs.rs/ndarray)的卷积/池化层：最大池化、平均池化、2D卷积与2D转置卷积。
//! 各层只保存超参数（窗口大小、步长、填充方式）与卷积权重，
//! 前向计算一律委托给`tensor`模块中的融合算子（卷积、转置卷积、池化、偏置相加）。
//!
//! 数据布局为`NHWC`：`[batch, height, width, channels]`。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
