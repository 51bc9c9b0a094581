use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_new_with_valid_shape() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.shape(), &[2, 3]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.size(), 6);
    assert_eq!(tensor.as_slice(), &[1., 2., 3., 4., 5., 6.]);
}

#[test]
fn test_new_with_mismatched_len_panics() {
    assert_panic!(Tensor::new(&[1., 2., 3.], &[2, 2]));
}

#[test]
fn test_zeros_and_filled() {
    let zeros = Tensor::zeros(&[2, 2, 2]);
    assert!(zeros.as_slice().iter().all(|&x| x == 0.));

    let filled = Tensor::filled(2.5, &[3]);
    assert_eq!(filled.as_slice(), &[2.5, 2.5, 2.5]);
}

#[test]
fn test_new_random_within_bounds() {
    let tensor = Tensor::new_random(-1., 1., &[4, 4]);
    assert_eq!(tensor.shape(), &[4, 4]);
    assert!(tensor.as_slice().iter().all(|&x| (-1. ..=1.).contains(&x)));
}

#[test]
fn test_new_normal_statistics() {
    // 样本足够多时，均值和标准差应接近给定参数
    let tensor = Tensor::new_normal(0., 1., &[100, 100]);
    let n = tensor.size() as f32;
    let mean = tensor.as_slice().iter().sum::<f32>() / n;
    let var = tensor.as_slice().iter().map(|x| (x - mean).powi(2)).sum::<f32>() / n;
    assert!(mean.abs() < 0.05, "均值偏离过大: {mean}");
    assert!((var - 1.).abs() < 0.1, "方差偏离过大: {var}");
}

#[test]
fn test_map() {
    let tensor = Tensor::new(&[-1., 0., 2.], &[3]);
    let mapped = tensor.map(|x| x.max(0.));
    assert_eq!(mapped.as_slice(), &[0., 0., 2.]);
}
