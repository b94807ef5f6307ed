
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

/// 1..=16，形状 [1, 4, 4, 1]
pub(crate) fn one_to_sixteen() -> Tensor {
    let data = (1..=16).map(|i| i as f32).collect::<Vec<_>>();
    Tensor::new(&data, &[1, 4, 4, 1])
}

/// 逐元素比较张量与期望值（先比较形状）
pub(crate) fn assert_tensor_close(actual: &Tensor, expected_shape: &[usize], expected: &[f32]) {
    assert_eq!(actual.shape(), expected_shape);
    for (&a, &e) in actual.data_as_slice().iter().zip(expected.iter()) {
        assert_abs_diff_eq!(a, e, epsilon = 1e-5);
    }
}
