/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 本模块提供计算机视觉相关的功能。
 *                 在本模块中，不严谨地说：
 *                 1. 所谓的image/图像是指RGB(A)格式的图像；
 *                 2. 图像张量统一采用[H, W, C]布局，像素值0~255。
 */

use crate::tensor::Tensor;
use crate::utils::traits::image::{TraitForDynamicImage, TraitForImageBuffer};
use image::{Rgb, RgbImage};


#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ImageType {
    SingleOrNoneChannel, // 单通道或者只有高（行）、宽（列）2个维度的图像张量
    RGB,                 // 3通道的图像张量
    RGBA,                // 4通道的图像张量
}

pub struct Vision {
    // ...
}

impl Vision {
    /// 将本地的图像加载为[H, W, C]布局的张量
    pub fn load_image(path: &str) -> Result<Tensor, Box<dyn std::error::Error>> {
        let image = image::open(path)?;
        Ok(image.to_tensor()?)
    }

    /// 保存[H, W, C]布局的张量为图像到本地（仅支持RGB）
    pub fn save_image(tensor: &Tensor, file_path: &str) -> Result<(), String> {
        let image = Self::tensor_to_image(tensor)?;
        image.save(file_path).map_err(|e| e.to_string())
    }

    /// 判断张量的图像类型（按最后一维的通道数）
    pub fn image_type(tensor: &Tensor) -> Result<ImageType, String> {
        let shape = tensor.shape();
        match shape.len() {
            2 => Ok(ImageType::SingleOrNoneChannel),
            3 => match shape[2] {
                1 => Ok(ImageType::SingleOrNoneChannel),
                3 => Ok(ImageType::RGB),
                4 => Ok(ImageType::RGBA),
                c => Err(format!("通道数{c}不是合法的图像通道数")),
            },
            _ => Err(format!("形状{shape:?}不是合法的图像张量")),
        }
    }

    /// 将图像张量转为RGB图像：[H, W, 3]原样转换，[H, W]或[H, W, 1]的灰度
    /// 张量按3通道复制。像素值就近取整并截断到0~255。
    pub fn tensor_to_image(tensor: &Tensor) -> Result<RgbImage, String> {
        let image_type = Self::image_type(tensor)?;
        if image_type == ImageType::RGBA {
            return Err(format!(
                "不支持RGBA图像张量，实际形状为{:?}",
                tensor.shape()
            ));
        }
        let shape = tensor.shape();
        let (height, width) = (shape[0], shape[1]);

        let mut image = RgbImage::new(width as u32, height as u32);
        for y in 0..height {
            for x in 0..width {
                let pixel = match image_type {
                    ImageType::RGB => Rgb([
                        clamp_to_u8(tensor[[y, x, 0]]),
                        clamp_to_u8(tensor[[y, x, 1]]),
                        clamp_to_u8(tensor[[y, x, 2]]),
                    ]),
                    _ => {
                        let l = if shape.len() == 2 {
                            clamp_to_u8(tensor[[y, x]])
                        } else {
                            clamp_to_u8(tensor[[y, x, 0]])
                        };
                        Rgb([l, l, l])
                    }
                };
                image.put_pixel(x as u32, y as u32, pixel);
            }
        }
        Ok(image)
    }

    /// 将RGB图像转为[H, W, 3]张量（像素值0~255）
    pub fn image_to_tensor(image: &RgbImage) -> Result<Tensor, String> {
        image.to_tensor()
    }
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
