/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 归一化层单元测试：BatchNorm2d / InstanceNorm2d / NormKind 解析
 *
 * 参考值来源: tests/python/layer_reference/norm_reference.py
 */

use crate::assert_err;
use crate::nn::layer::{BatchNorm2d, InstanceNorm2d, NormKind, NormOptions};
use crate::nn::{Layer, LayerError};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

// PyTorch: nn.BatchNorm2d(1) 首次前向，输入 [1,2,3,4]
const PYTORCH_BN_OUTPUT: &[f32] = &[-1.341_64, -0.447_213, 0.447_213, 1.341_64];
const PYTORCH_BN_RUNNING_MEAN: f32 = 0.25; // 0.9*0 + 0.1*2.5
const PYTORCH_BN_RUNNING_VAR: f32 = 1.066_666_7; // 0.9*1 + 0.1*(5/3)

#[test]
fn test_batch_norm_matches_pytorch() {
    let mut norm = BatchNorm2d::new(1, NormOptions::default());
    let input = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[1, 1, 2, 2]);
    let output = norm.forward(&input).unwrap();

    assert_eq!(output.shape(), input.shape());
    for (actual, expected) in output.as_slice().iter().zip(PYTORCH_BN_OUTPUT) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-4);
    }

    // 滑动统计量：均值用批均值、方差用无偏方差更新
    assert_abs_diff_eq!(
        norm.running_mean()[[0]],
        PYTORCH_BN_RUNNING_MEAN,
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        norm.running_var()[[0]],
        PYTORCH_BN_RUNNING_VAR,
        epsilon = 1e-5
    );
}

#[test]
fn test_batch_norm_output_statistics() {
    // 训练态输出在(batch, H, W)上按通道应近似零均值、单位方差
    let mut norm = BatchNorm2d::new(3, NormOptions::default());
    let input = Tensor::new_random(0.0, 10.0, &[4, 3, 8, 8]);
    let output = norm.forward(&input).unwrap();

    let n = (4 * 8 * 8) as f32;
    for ci in 0..3 {
        let mut sum = 0.0f32;
        let mut sq_sum = 0.0f32;
        for bi in 0..4 {
            for hi in 0..8 {
                for wi in 0..8 {
                    let v = output[[bi, ci, hi, wi]];
                    sum += v;
                    sq_sum += v * v;
                }
            }
        }
        let mean = sum / n;
        let var = sq_sum / n - mean * mean;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-2);
    }
}

#[test]
fn test_batch_norm_eval_mode_uses_running_stats() {
    // 推理态下使用滑动统计量；新建层的滑动统计量为 mean=0、var=1，
    // 归一化近似恒等变换
    let mut norm = BatchNorm2d::new(2, NormOptions::default());
    norm.set_training(false);

    let input = Tensor::new_random(-5.0, 5.0, &[2, 2, 4, 4]);
    let output = norm.forward(&input).unwrap();
    for (actual, expected) in output.as_slice().iter().zip(input.as_slice()) {
        assert_abs_diff_eq!(*actual, *expected, epsilon = 1e-4);
    }

    // 推理态不更新滑动统计量
    assert_eq!(norm.running_mean()[[0]], 0.0);
    assert_eq!(norm.running_var()[[0]], 1.0);
}

#[test]
fn test_batch_norm_affine_off() {
    // affine=false 时无 gamma/beta，输出与默认(gamma=1, beta=0)一致
    let options = NormOptions {
        affine: Some(false),
        ..NormOptions::default()
    };
    let input = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[1, 1, 2, 2]);

    let with_affine = BatchNorm2d::new(1, NormOptions::default())
        .forward(&input)
        .unwrap();
    let without_affine = BatchNorm2d::new(1, options).forward(&input).unwrap();
    assert_eq!(with_affine.as_slice(), without_affine.as_slice());
}

#[test]
fn test_instance_norm_per_sample() {
    // 两个样本数值范围相差一个数量级，但各自归一化后z-score相同
    let input = Tensor::new(
        &[1.0, 2.0, 3.0, 4.0, 10.0, 20.0, 30.0, 40.0],
        &[2, 1, 2, 2],
    );
    let mut norm = InstanceNorm2d::new(1, NormOptions::default());
    let output = norm.forward(&input).unwrap();

    let expected = [-1.341_64, -0.447_213, 0.447_213, 1.341_64];
    for (i, e) in expected.iter().enumerate() {
        assert_abs_diff_eq!(output.as_slice()[i], *e, epsilon = 1e-4);
        assert_abs_diff_eq!(output.as_slice()[4 + i], *e, epsilon = 1e-4);
    }
}

#[test]
fn test_norm_channel_mismatch() {
    let input = Tensor::zeros(&[1, 4, 2, 2]);
    assert_err!(
        BatchNorm2d::new(3, NormOptions::default()).forward(&input),
        LayerError::ShapeMismatch { .. }
    );
    assert_err!(
        InstanceNorm2d::new(3, NormOptions::default()).forward(&input),
        LayerError::ShapeMismatch { .. }
    );
}

#[test]
fn test_norm_requires_4d_input() {
    let input = Tensor::zeros(&[3, 2, 2]);
    assert_err!(
        BatchNorm2d::new(3, NormOptions::default()).forward(&input),
        LayerError::ShapeMismatch { .. }
    );
}

#[test]
fn test_norm_options_default() {
    let options = NormOptions::default();
    assert_eq!(options.eps, 1e-5);
    assert_eq!(options.momentum, 0.1);
    assert_eq!(options.affine, None);
}

#[test]
fn test_norm_kind_resolve() {
    assert_eq!(NormKind::resolve(None).unwrap(), None);
    assert_eq!(NormKind::resolve(Some("")).unwrap(), None);
    assert_eq!(
        NormKind::resolve(Some("BatchNorm2d")).unwrap(),
        Some(NormKind::BatchNorm2d)
    );
    assert_eq!(
        NormKind::resolve(Some("InstanceNorm2d")).unwrap(),
        Some(NormKind::InstanceNorm2d)
    );
    assert_err!(
        NormKind::resolve(Some("GroupNorm")),
        LayerError::UnknownLayerKind { name, .. } if name == "GroupNorm"
    );
}
