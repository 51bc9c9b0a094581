/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 2D 填充层：ReflectionPad2d（镜像填充）与 ZeroPad2d（零填充）
 *
 * 输入/输出形状：
 * - 输入：[batch, C, H, W]
 * - 输出：[batch, C, H + 2p, W + 2p]
 */

use std::str::FromStr;

use crate::nn::module::Layer;
use crate::nn::{LayerError, layer::Stage, layer::check_4d};
use crate::tensor::Tensor;

/// 填充层类型的封闭枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    ReflectionPad2d,
    ZeroPad2d,
}

impl FromStr for PadKind {
    type Err = LayerError;

    fn from_str(name: &str) -> Result<Self, LayerError> {
        // 精确匹配PyTorch类名，不做模糊查找
        match name {
            "ReflectionPad2d" => Ok(Self::ReflectionPad2d),
            "ZeroPad2d" => Ok(Self::ZeroPad2d),
            _ => Err(LayerError::UnknownLayerKind {
                stage: "填充",
                name: name.to_string(),
            }),
        }
    }
}

impl PadKind {
    /// 按名称解析填充层类型。`None`或空字符串表示“不要该子层”，返回Ok(None)。
    pub fn resolve(spec: Option<&str>) -> Result<Option<Self>, LayerError> {
        match spec {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    /// 按给定填充量实例化子层
    pub fn build(self, padding: usize) -> Stage {
        match self {
            Self::ReflectionPad2d => ReflectionPad2d::new(padding).into(),
            Self::ZeroPad2d => ZeroPad2d::new(padding).into(),
        }
    }
}

/// 镜像填充层。与PyTorch语义一致：以边缘像素为轴做反射，边缘像素本身不重复。
/// 因此要求 p < H 且 p < W。
#[derive(Debug)]
pub struct ReflectionPad2d {
    padding: usize,
}

impl ReflectionPad2d {
    pub const fn new(padding: usize) -> Self {
        Self { padding }
    }

    /// 反射索引映射：输出坐标j对应的输入坐标
    const fn reflect(j: isize, len: usize) -> usize {
        let len = len as isize;
        let mut i = j;
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * len - 2 - i;
        }
        i as usize
    }
}

impl Layer for ReflectionPad2d {
    fn name(&self) -> &'static str {
        "ReflectionPad2d"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let (batch_size, c, h, w) = check_4d(input, "ReflectionPad2d")?;
        let p = self.padding;
        if p == 0 {
            return Ok(input.clone());
        }
        if p >= h || p >= w {
            return Err(LayerError::ShapeMismatch {
                expected: vec![batch_size, c, p + 1, p + 1],
                got: input.shape().to_vec(),
                message: format!("镜像填充量{p}必须小于输入的高和宽"),
            });
        }

        let (new_h, new_w) = (h + 2 * p, w + 2 * p);
        let mut data = vec![0.0f32; batch_size * c * new_h * new_w];
        let mut idx = 0;
        for bi in 0..batch_size {
            for ci in 0..c {
                for hi in 0..new_h {
                    let src_h = Self::reflect(hi as isize - p as isize, h);
                    for wi in 0..new_w {
                        let src_w = Self::reflect(wi as isize - p as isize, w);
                        data[idx] = input[[bi, ci, src_h, src_w]];
                        idx += 1;
                    }
                }
            }
        }
        Ok(Tensor::new(&data, &[batch_size, c, new_h, new_w]))
    }
}

/// 零填充层：四周补p圈0
#[derive(Debug)]
pub struct ZeroPad2d {
    padding: usize,
}

impl ZeroPad2d {
    pub const fn new(padding: usize) -> Self {
        Self { padding }
    }
}

impl Layer for ZeroPad2d {
    fn name(&self) -> &'static str {
        "ZeroPad2d"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let (batch_size, c, h, w) = check_4d(input, "ZeroPad2d")?;
        let p = self.padding;
        if p == 0 {
            return Ok(input.clone());
        }

        let (new_h, new_w) = (h + 2 * p, w + 2 * p);
        let mut output = Tensor::zeros(&[batch_size, c, new_h, new_w]);
        for bi in 0..batch_size {
            for ci in 0..c {
                for hi in 0..h {
                    for wi in 0..w {
                        output[[bi, ci, hi + p, wi + p]] = input[[bi, ci, hi, wi]];
                    }
                }
            }
        }
        Ok(output)
    }
}
