/*
 * @Date         : 2026-10-16
 * @Description  : Conv2d layer 单元测试（TensorFlow 风格 API，NHWC）
 */

use super::{assert_tensor_close, one_to_sixteen};
use crate::assert_err;
use crate::errors::TensorError;
use crate::nn::{Conv2d, Module, NnError};
use crate::tensor::{Padding, Tensor};

// 输入 [1, 3, 3, 2]，卷积核 [2, 2, 2, 3]
#[rustfmt::skip]
const TEST_X: &[f32] = &[
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8,
    0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7,
];
#[rustfmt::skip]
const TEST_FILTER: &[f32] = &[
    -0.3, -0.25, -0.2, -0.15, -0.1, -0.05, 0.0, 0.05, 0.1, 0.15, 0.2, 0.25,
    0.3, 0.35, 0.4, 0.45, 0.5, 0.55, 0.6, 0.65, 0.7, 0.75, 0.8, 0.85,
];
const TEST_BIAS: &[f32] = &[0.1, -0.2, 0.3];
// VALID 卷积结果 + 偏置
#[rustfmt::skip]
const TEST_OUTPUT: &[f32] = &[
    1.78, 1.66, 2.34, 2.14, 2.1, 2.86,
    2.86, 2.98, 3.9, 3.22, 3.42, 4.42,
];

#[test]
fn test_conv2d_new_shapes() -> Result<(), NnError> {
    let conv = Conv2d::new(3, 8, (5, 3), (2, 2), Padding::Same)?;
    assert_eq!(conv.filter().shape(), &[5, 3, 3, 8]);
    assert_eq!(conv.bias().shape(), &[8]);
    assert_eq!(conv.input_channels(), 3);
    assert_eq!(conv.num_filters(), 8);
    assert_eq!(conv.kernel_size(), (5, 3));
    assert_eq!(conv.stride(), (2, 2));
    assert_eq!(conv.padding(), Padding::Same);
    assert_eq!(conv.num_params(), 5 * 3 * 3 * 8 + 8);

    // SAME + 步长2：5x5 -> 3x3
    let output = conv.forward(&Tensor::ones(&[2, 5, 5, 3]))?;
    assert_eq!(output.shape(), &[2, 3, 3, 8]);
    Ok(())
}

#[test]
fn test_conv2d_seeded_init() -> Result<(), NnError> {
    let a = Conv2d::new_seeded(16, 32, (3, 3), (1, 1), Padding::Same, 42)?;
    let b = Conv2d::new_seeded(16, 32, (3, 3), (1, 1), Padding::Same, 42)?;
    let c = Conv2d::new_seeded(16, 32, (3, 3), (1, 1), Padding::Same, 43)?;
    assert_eq!(a, b);
    assert_ne!(a.filter(), c.filter());

    // 权重服从 N(0, 0.1²)
    let data = a.filter().data_as_slice();
    let n = data.len() as f32;
    let mean = data.iter().sum::<f32>() / n;
    let std = (data.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n).sqrt();
    assert!(mean.abs() < 0.01, "均值偏差过大：{mean}");
    assert!((std - 0.1).abs() < 0.01, "标准差偏差过大：{std}");
    Ok(())
}

#[test]
fn test_conv2d_from_params_forward() -> Result<(), NnError> {
    let conv = Conv2d::from_params(
        Tensor::new(TEST_FILTER, &[2, 2, 2, 3]),
        Tensor::new(TEST_BIAS, &[3]),
        (1, 1),
        Padding::Valid,
    )?;
    assert_eq!(conv.input_channels(), 2);
    assert_eq!(conv.num_filters(), 3);
    assert_eq!(conv.kernel_size(), (2, 2));

    let output = conv.forward(&Tensor::new(TEST_X, &[1, 3, 3, 2]))?;
    assert_tensor_close(&output, &[1, 2, 2, 3], TEST_OUTPUT);
    Ok(())
}

#[test]
fn test_conv2d_same_with_ones() -> Result<(), NnError> {
    let conv = Conv2d::from_params(
        Tensor::ones(&[3, 3, 1, 1]),
        Tensor::new(&[-1.], &[1]),
        (1, 1),
        Padding::Same,
    )?;
    let output = conv.train_fprop(&one_to_sixteen())?;
    #[rustfmt::skip]
    let expected = [
        13., 23., 29., 21.,
        32., 53., 62., 44.,
        56., 89., 98., 68.,
        45., 71., 77., 53.,
    ];
    assert_tensor_close(&output, &[1, 4, 4, 1], &expected);
    Ok(())
}

#[test]
fn test_conv2d_variables_mut() -> Result<(), NnError> {
    let mut conv = Conv2d::new_seeded(1, 1, (3, 3), (1, 1), Padding::Same, 7)?;
    assert_eq!(conv.variables().len(), 2);
    assert_eq!(conv.variables()[0].shape(), &[3, 3, 1, 1]);
    assert_eq!(conv.variables()[1].shape(), &[1]);

    // 模拟外部训练循环更新权重
    {
        let mut vars = conv.variables_mut();
        *vars[0] = Tensor::zeros(&[3, 3, 1, 1]);
        *vars[1] = Tensor::new(&[2.5], &[1]);
    }
    let output = conv.forward(&one_to_sixteen())?;
    assert!(output.data_as_slice().iter().all(|&v| v == 2.5));
    Ok(())
}

#[test]
fn test_conv2d_invalid_params() {
    // 卷积核不是4D
    assert_err!(
        Conv2d::from_params(Tensor::ones(&[3, 3, 1]), Tensor::ones(&[1]), (1, 1), Padding::Same),
        NnError::InvalidConfig(_)
    );
    // 偏置长度与卷积核个数不符
    assert_err!(
        Conv2d::from_params(Tensor::ones(&[3, 3, 1, 4]), Tensor::ones(&[3]), (1, 1), Padding::Same),
        NnError::InvalidConfig(msg) if msg.contains("[4]")
    );
    assert_err!(
        Conv2d::new(1, 4, (3, 3), (1, 0), Padding::Same),
        NnError::InvalidConfig(_)
    );
    assert_err!(
        Conv2d::new(0, 4, (3, 3), (1, 1), Padding::Same),
        NnError::InvalidConfig(_)
    );
}

#[test]
fn test_conv2d_channel_mismatch() -> Result<(), NnError> {
    let conv = Conv2d::new(3, 4, (3, 3), (1, 1), Padding::Same)?;
    assert_err!(
        conv.forward(&Tensor::ones(&[1, 5, 5, 2])),
        NnError::Tensor(TensorError::ChannelMismatch { expected: 3, got: 2, .. })
    );
    Ok(())
}

#[test]
fn test_conv2d_supplied_filter_with_random_bias() -> Result<(), NnError> {
    let random = Conv2d::new_seeded(2, 3, (2, 2), (1, 1), Padding::Valid, 11)?;
    let bias = random.bias().clone();
    let conv = random.with_filter(Tensor::new(TEST_FILTER, &[2, 2, 2, 3]))?;
    assert_eq!(conv.bias(), &bias);

    // 卷积部分与给定权重一致，偏置保留随机初始值
    let expected: Vec<f32> = TEST_OUTPUT
        .iter()
        .enumerate()
        .map(|(i, v)| v - TEST_BIAS[i % 3] + bias.data_as_slice()[i % 3])
        .collect();
    let output = conv.forward(&Tensor::new(TEST_X, &[1, 3, 3, 2]))?;
    assert_tensor_close(&output, &[1, 2, 2, 3], &expected);

    // 反过来：随机卷积核 + 给定偏置
    let conv = Conv2d::new_seeded(2, 3, (2, 2), (1, 1), Padding::Valid, 11)?
        .with_bias(Tensor::new(TEST_BIAS, &[3]))?;
    assert_eq!(conv.filter(), &seeded_filter(11)?);
    assert_eq!(conv.bias().data_as_slice(), TEST_BIAS);
    Ok(())
}

fn seeded_filter(seed: u64) -> Result<Tensor, NnError> {
    Ok(Conv2d::new_seeded(2, 3, (2, 2), (1, 1), Padding::Valid, seed)?
        .filter()
        .clone())
}

#[test]
fn test_conv2d_supplied_param_shape_mismatch() -> Result<(), NnError> {
    let conv = Conv2d::new(2, 3, (2, 2), (1, 1), Padding::Valid)?;
    assert_err!(
        conv.clone().with_filter(Tensor::ones(&[3, 3, 2, 3])),
        NnError::InvalidConfig(msg) if msg.contains("filter") && msg.contains("[2, 2, 2, 3]")
    );
    assert_err!(
        conv.with_bias(Tensor::ones(&[2])),
        NnError::InvalidConfig(msg) if msg.contains("bias")
    );
    Ok(())
}
