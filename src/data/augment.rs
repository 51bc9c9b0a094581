/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 双视图随机图像增强（对比式自监督学习用）
 *
 * 变换语义对齐 torchvision：
 * - RandomResizedCrop：10次尝试采样（面积比0.08~1.0、对数均匀的宽高比3/4~4/3），
 *   失败则回退到中心裁剪，最后缩放到目标尺寸；
 * - ColorJitter：亮度/对比度/饱和度/色相按随机顺序施加，各自独立采样强度；
 * - 最终ToTensor + ImageNet常数归一化，输出[3, H, W]布局。
 */

use image::RgbImage;
use image::imageops::{self, FilterType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::data::DataError;
use crate::tensor::Tensor;
use crate::vision::Vision;

/// ImageNet训练集的逐通道均值（RGB）
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet训练集的逐通道标准差（RGB）
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

// RandomResizedCrop的默认采样范围（与torchvision一致）
const CROP_SCALE: (f32, f32) = (0.08, 1.0);
const CROP_RATIO: (f32, f32) = (3.0 / 4.0, 4.0 / 3.0);
const CROP_ATTEMPTS: usize = 10;

/*↓↓↓↓↓↓↓↓↓↓ 单步变换 ↓↓↓↓↓↓↓↓↓↓*/

/// 一步随机图像变换。每次施加时从rng独立采样自己的随机参数。
#[derive(Debug)]
pub enum TransformOp {
    /// 随机裁剪一块区域并缩放到目标尺寸
    RandomResizedCrop { width: u32, height: u32 },
    /// 以概率p水平翻转
    RandomHorizontalFlip { p: f64 },
    /// 以概率p施加一组子变换（全有或全无）
    RandomApply { transforms: Vec<TransformOp>, p: f64 },
    /// 颜色抖动：亮度/对比度/饱和度强度为s时因子取[max(0,1-s), 1+s]，
    /// 色相强度为h时偏移量取[-h, h]（占色环的比例）
    ColorJitter {
        brightness: f32,
        contrast: f32,
        saturation: f32,
        hue: f32,
    },
    /// 以概率p转为灰度（输出仍为3通道）
    RandomGrayscale { p: f64 },
}

impl TransformOp {
    /// 施加本步变换，随机参数从rng独立采样
    pub fn apply(&self, image: RgbImage, rng: &mut StdRng) -> RgbImage {
        match self {
            Self::RandomResizedCrop { width, height } => {
                random_resized_crop(&image, *width, *height, rng)
            }
            Self::RandomHorizontalFlip { p } => {
                if rng.gen_bool(*p) {
                    imageops::flip_horizontal(&image)
                } else {
                    image
                }
            }
            Self::RandomApply { transforms, p } => {
                if rng.gen_bool(*p) {
                    transforms
                        .iter()
                        .fold(image, |img, op| op.apply(img, rng))
                } else {
                    image
                }
            }
            Self::ColorJitter {
                brightness,
                contrast,
                saturation,
                hue,
            } => color_jitter(image, *brightness, *contrast, *saturation, *hue, rng),
            Self::RandomGrayscale { p } => {
                if rng.gen_bool(*p) {
                    to_grayscale(&image)
                } else {
                    image
                }
            }
        }
    }
}

/// 按序施加的变换链
#[derive(Debug)]
pub struct TransformChain {
    ops: Vec<TransformOp>,
}

impl TransformChain {
    pub fn new(ops: Vec<TransformOp>) -> Self {
        Self { ops }
    }

    /// 依次施加全部变换，每步独立消耗rng
    pub fn apply(&self, image: &RgbImage, rng: &mut StdRng) -> RgbImage {
        self.ops
            .iter()
            .fold(image.clone(), |img, op| op.apply(img, rng))
    }
}

/*↓↓↓↓↓↓↓↓↓↓ 双视图管线 ↓↓↓↓↓↓↓↓↓↓*/

/// 对同一张图像产生两个独立随机增强的视图。
///
/// - 第一链（较强增强）：随机裁剪缩放 -> 随机水平翻转(0.5) ->
///   随机颜色抖动(0.8, 0.8, 0.8, 0.3; 施加概率0.8) -> 随机灰度(0.3) -> 归一化张量；
/// - 第二链（较弱增强）：随机裁剪缩放 -> 随机水平翻转(0.5) -> 归一化张量。
///
/// 两条链共用同一个rng但各自独立采样，两视图间不保证任何相关性。
#[derive(Debug)]
pub struct ImageTransforms {
    first: TransformChain,
    second: TransformChain,
    rng: StdRng,
}

impl ImageTransforms {
    /// 以系统熵源初始化rng创建管线。
    ///
    /// # 参数
    /// - `img_size`: 目标尺寸(宽, 高)，输出张量形状为[3, 高, 宽]
    pub fn new(img_size: (u32, u32)) -> Result<Self, DataError> {
        Self::build(img_size, StdRng::from_entropy())
    }

    /// 以固定种子创建管线，同种子同输入产生完全一致的两个视图序列
    pub fn with_seed(img_size: (u32, u32), seed: u64) -> Result<Self, DataError> {
        Self::build(img_size, StdRng::seed_from_u64(seed))
    }

    fn build(img_size: (u32, u32), rng: StdRng) -> Result<Self, DataError> {
        let (width, height) = img_size;
        if width == 0 || height == 0 {
            return Err(DataError::InvalidConfig(format!(
                "目标尺寸必须为正，实际为({width}, {height})"
            )));
        }

        let color_jitter = TransformOp::ColorJitter {
            brightness: 0.8,
            contrast: 0.8,
            saturation: 0.8,
            hue: 0.3,
        };
        let first = TransformChain::new(vec![
            TransformOp::RandomResizedCrop { width, height },
            TransformOp::RandomHorizontalFlip { p: 0.5 },
            TransformOp::RandomApply {
                transforms: vec![color_jitter],
                p: 0.8,
            },
            TransformOp::RandomGrayscale { p: 0.3 },
        ]);
        let second = TransformChain::new(vec![
            TransformOp::RandomResizedCrop { width, height },
            TransformOp::RandomHorizontalFlip { p: 0.5 },
        ]);

        Ok(Self { first, second, rng })
    }

    /// 对输入图像分别跑两条增强链，返回两个归一化视图。
    ///
    /// # 参数
    /// - `image`: [H, W, 3]布局的图像张量，像素值0~255
    ///
    /// # 返回
    /// 两个[3, 目标高, 目标宽]的归一化张量
    pub fn apply(&mut self, image: &Tensor) -> Result<(Tensor, Tensor), DataError> {
        let rgb = Vision::tensor_to_image(image).map_err(|message| DataError::InvalidImage {
            message,
            got: image.shape().to_vec(),
        })?;

        let view1 = self.first.apply(&rgb, &mut self.rng);
        let view2 = self.second.apply(&rgb, &mut self.rng);
        Ok((to_normalized_chw(&view1), to_normalized_chw(&view2)))
    }
}

/// ToTensor + Normalize：u8像素转[0,1]再按ImageNet常数逐通道归一化，
/// 输出[3, H, W]布局
fn to_normalized_chw(image: &RgbImage) -> Tensor {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut data = vec![0.0f32; 3 * height * width];
    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            let value = pixel.0[c] as f32 / 255.0;
            data[c * height * width + y as usize * width + x as usize] =
                (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }
    Tensor::new(&data, &[3, height, width])
}

/*↓↓↓↓↓↓↓↓↓↓ 变换实现 ↓↓↓↓↓↓↓↓↓↓*/

fn random_resized_crop(image: &RgbImage, width: u32, height: u32, rng: &mut StdRng) -> RgbImage {
    let (w, h) = (image.width(), image.height());
    let area = (w * h) as f32;

    for _ in 0..CROP_ATTEMPTS {
        let target_area = area * rng.gen_range(CROP_SCALE.0..=CROP_SCALE.1);
        let aspect = rng
            .gen_range(CROP_RATIO.0.ln()..=CROP_RATIO.1.ln())
            .exp();
        let crop_w = (target_area * aspect).sqrt().round() as u32;
        let crop_h = (target_area / aspect).sqrt().round() as u32;
        if crop_w >= 1 && crop_w <= w && crop_h >= 1 && crop_h <= h {
            let left = rng.gen_range(0..=w - crop_w);
            let top = rng.gen_range(0..=h - crop_h);
            let cropped = imageops::crop_imm(image, left, top, crop_w, crop_h).to_image();
            return imageops::resize(&cropped, width, height, FilterType::Triangle);
        }
    }

    // 回退：按宽高比截断的中心裁剪
    let in_ratio = w as f32 / h as f32;
    let (crop_w, crop_h) = if in_ratio < CROP_RATIO.0 {
        (w, (w as f32 / CROP_RATIO.0).round() as u32)
    } else if in_ratio > CROP_RATIO.1 {
        ((h as f32 * CROP_RATIO.1).round() as u32, h)
    } else {
        (w, h)
    };
    let left = (w - crop_w) / 2;
    let top = (h - crop_h) / 2;
    let cropped = imageops::crop_imm(image, left, top, crop_w, crop_h).to_image();
    imageops::resize(&cropped, width, height, FilterType::Triangle)
}

fn color_jitter(
    mut image: RgbImage,
    brightness: f32,
    contrast: f32,
    saturation: f32,
    hue: f32,
    rng: &mut StdRng,
) -> RgbImage {
    // 四种调整按随机顺序施加（与torchvision一致）
    let mut order = [0usize, 1, 2, 3];
    order.shuffle(rng);

    for idx in order {
        match idx {
            0 if brightness > 0.0 => {
                let factor = rng.gen_range((1.0 - brightness).max(0.0)..=1.0 + brightness);
                adjust_pixels(&mut image, |v| v * factor);
            }
            1 if contrast > 0.0 => {
                let factor = rng.gen_range((1.0 - contrast).max(0.0)..=1.0 + contrast);
                let mean = gray_mean(&image);
                adjust_pixels(&mut image, |v| mean + factor * (v - mean));
            }
            2 if saturation > 0.0 => {
                let factor = rng.gen_range((1.0 - saturation).max(0.0)..=1.0 + saturation);
                for pixel in image.pixels_mut() {
                    let l = luma(pixel.0);
                    for v in &mut pixel.0 {
                        *v = clamp_to_u8(l + factor * (*v as f32 - l));
                    }
                }
            }
            3 if hue > 0.0 => {
                let shift = rng.gen_range(-hue..=hue);
                for pixel in image.pixels_mut() {
                    pixel.0 = shift_hue(pixel.0, shift);
                }
            }
            _ => {}
        }
    }
    image
}

/// 对每个子像素施加同一映射
fn adjust_pixels(image: &mut RgbImage, f: impl Fn(f32) -> f32) {
    for pixel in image.pixels_mut() {
        for v in &mut pixel.0 {
            *v = clamp_to_u8(f(*v as f32));
        }
    }
}

fn to_grayscale(image: &RgbImage) -> RgbImage {
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let l = clamp_to_u8(luma(pixel.0));
        pixel.0 = [l, l, l];
    }
    output
}

/// ITU-R 601亮度系数（与PIL的L模式一致）
fn luma([r, g, b]: [u8; 3]) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

fn gray_mean(image: &RgbImage) -> f32 {
    let sum: f32 = image.pixels().map(|p| luma(p.0)).sum();
    sum / (image.width() * image.height()) as f32
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// 色相偏移：RGB -> HSV，H加上shift（单位为整个色环）后转回RGB
fn shift_hue([r, g, b]: [u8; 3], shift: f32) -> [u8; 3] {
    let (r, g, b) = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let mut h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    let v = max;

    h = (h + shift).rem_euclid(1.0);

    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r1, g1, b1) = match (h * 6.0) as usize {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [
        clamp_to_u8((r1 + m) * 255.0),
        clamp_to_u8((g1 + m) * 255.0),
        clamp_to_u8((b1 + m) * 255.0),
    ]
}
