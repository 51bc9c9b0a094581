/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 激活层单元测试：ReLU / LeakyReLU / Tanh / Sigmoid / ActivKind 解析
 */

use crate::assert_err;
use crate::nn::layer::{ActivKind, ActivOptions, LeakyReLU, ReLU, Sigmoid, Tanh};
use crate::nn::{Layer, LayerError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_relu() {
    let input = Tensor::new(&[-2.0, -0.5, 0.0, 0.5, 2.0], &[1, 1, 1, 5]);
    let output = ReLU.forward(&input).unwrap();
    assert_eq!(output.as_slice(), [0.0, 0.0, 0.0, 0.5, 2.0]);
}

#[test]
fn test_leaky_relu() {
    let input = Tensor::new(&[-2.0, -0.5, 0.0, 0.5, 2.0], &[1, 1, 1, 5]);
    let output = LeakyReLU::new(0.1).forward(&input).unwrap();

    let expected = [-0.2, -0.05, 0.0, 0.5, 2.0];
    for (actual, expected) in output.as_slice().iter().zip(&expected) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-6);
    }
}

#[test]
fn test_tanh() {
    let input = Tensor::new(&[-1.0, 0.0, 1.0], &[1, 1, 1, 3]);
    let output = Tanh.forward(&input).unwrap();

    assert_abs_diff_eq!(output.as_slice()[0], -0.761_594, epsilon = 1e-5);
    assert_abs_diff_eq!(output.as_slice()[1], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(output.as_slice()[2], 0.761_594, epsilon = 1e-5);
}

#[test]
fn test_sigmoid() {
    let input = Tensor::new(&[-1.0, 0.0, 1.0], &[1, 1, 1, 3]);
    let output = Sigmoid.forward(&input).unwrap();

    assert_abs_diff_eq!(output.as_slice()[0], 0.268_941, epsilon = 1e-5);
    assert_abs_diff_eq!(output.as_slice()[1], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(output.as_slice()[2], 0.731_059, epsilon = 1e-5);
}

#[test]
fn test_activ_shape_preserved() {
    // 激活是逐元素运算，不要求4D输入，形状原样保留
    let input = Tensor::new_random(-1.0, 1.0, &[2, 3, 4]);
    let output = ReLU.forward(&input).unwrap();
    assert_eq!(output.shape(), input.shape());
}

#[test]
fn test_activ_options_default() {
    assert_eq!(ActivOptions::default().negative_slope, 0.01);
}

#[test]
fn test_activ_kind_resolve() {
    assert_eq!(ActivKind::resolve(None).unwrap(), None);
    assert_eq!(ActivKind::resolve(Some("")).unwrap(), None);
    assert_eq!(
        ActivKind::resolve(Some("ReLU")).unwrap(),
        Some(ActivKind::ReLU)
    );
    assert_eq!(
        ActivKind::resolve(Some("LeakyReLU")).unwrap(),
        Some(ActivKind::LeakyReLU)
    );
    assert_eq!(
        ActivKind::resolve(Some("Tanh")).unwrap(),
        Some(ActivKind::Tanh)
    );
    assert_eq!(
        ActivKind::resolve(Some("Sigmoid")).unwrap(),
        Some(ActivKind::Sigmoid)
    );
    assert_err!(
        ActivKind::resolve(Some("GELU")),
        LayerError::UnknownLayerKind { name, .. } if name == "GELU"
    );
}
