/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 对比学习数据通路端到端测试
 *                 流程：原始图像 -> 双视图增强 -> 卷积编码器（两层Conv2dBlock）
 */
use contrast_torch::data::ImageTransforms;
use contrast_torch::nn::{Conv2dBlock, Layer, LayerError};
use contrast_torch::tensor::Tensor;

/// 构造带空间结构的测试图像（[H, W, 3]，渐变图案）
fn gradient_image(height: usize, width: usize) -> Tensor {
    let mut image = Tensor::zeros(&[height, width, 3]);
    for y in 0..height {
        for x in 0..width {
            image[[y, x, 0]] = (x % 256) as f32;
            image[[y, x, 1]] = (y % 256) as f32;
            image[[y, x, 2]] = ((x + y) % 256) as f32;
        }
    }
    image
}

/// 给[C, H, W]视图补上batch维
fn with_batch_dim(view: &Tensor) -> Tensor {
    let shape = view.shape();
    let mut batched = vec![1];
    batched.extend_from_slice(shape);
    Tensor::new(view.as_slice(), &batched)
}

#[test]
fn test_dual_view_encoding() -> Result<(), LayerError> {
    // 增强管线：256x256原图 -> 两个64x64视图
    let mut transforms = ImageTransforms::with_seed((64, 64), 42).unwrap();
    let image = gradient_image(256, 256);
    let (view1, view2) = transforms.apply(&image).unwrap();
    assert_eq!(view1.shape(), &[3, 64, 64]);
    assert_eq!(view2.shape(), &[3, 64, 64]);

    // 编码器：两个带批归一化的下采样卷积块
    let mut block1 = Conv2dBlock::new(3, 16, 3)
        .norm_type(Some("BatchNorm2d"))
        .stride(2)
        .build()?;
    let mut block2 = Conv2dBlock::new(16, 32, 3)
        .norm_type(Some("BatchNorm2d"))
        .stride(2)
        .build()?;

    let mut encode = |view: &Tensor| -> Result<Tensor, LayerError> {
        let hidden = block1.forward(&with_batch_dim(view))?;
        block2.forward(&hidden)
    };

    let embedding1 = encode(&view1)?;
    let embedding2 = encode(&view2)?;

    // 64 -> 32 -> 16 两次下采样
    assert_eq!(embedding1.shape(), &[1, 32, 16, 16]);
    assert_eq!(embedding2.shape(), &[1, 32, 16, 16]);

    // ReLU之后无负值
    assert!(embedding1.as_slice().iter().all(|x| *x >= 0.0));
    assert!(embedding2.as_slice().iter().all(|x| *x >= 0.0));

    // 两个视图增强参数独立，嵌入应不同
    assert_ne!(embedding1.as_slice(), embedding2.as_slice());
    Ok(())
}

#[test]
fn test_seeded_pipeline_end_to_end_reproducible() {
    let image = gradient_image(128, 128);

    let run = || {
        let mut transforms = ImageTransforms::with_seed((32, 32), 7).unwrap();
        transforms.apply(&image).unwrap()
    };
    let (a1, a2) = run();
    let (b1, b2) = run();
    assert_eq!(a1.as_slice(), b1.as_slice());
    assert_eq!(a2.as_slice(), b2.as_slice());
}

#[test]
fn test_spectral_encoder_forward() {
    // 谱归一化卷积块也能走完整数据通路
    let mut transforms = ImageTransforms::with_seed((32, 32), 1).unwrap();
    let (view1, _) = transforms.apply(&gradient_image(128, 128)).unwrap();

    let mut block = Conv2dBlock::new(3, 8, 3)
        .spectral(true)
        .norm_type(Some("InstanceNorm2d"))
        .activ_type(Some("LeakyReLU"))
        .build()
        .unwrap();
    let output = block.forward(&with_batch_dim(&view1)).unwrap();
    assert_eq!(output.shape(), &[1, 8, 32, 32]);
}
