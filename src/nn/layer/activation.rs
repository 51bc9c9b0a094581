/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 逐元素激活层：ReLU / LeakyReLU / Tanh / Sigmoid
 */

use std::str::FromStr;

use crate::nn::module::Layer;
use crate::nn::{LayerError, layer::Stage};
use crate::tensor::Tensor;

/// 激活层的显式配置（目前只有LeakyReLU用到negative_slope）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivOptions {
    pub negative_slope: f32,
}

impl Default for ActivOptions {
    fn default() -> Self {
        Self {
            negative_slope: 0.01,
        }
    }
}

/// 激活层类型的封闭枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivKind {
    ReLU,
    LeakyReLU,
    Tanh,
    Sigmoid,
}

impl FromStr for ActivKind {
    type Err = LayerError;

    fn from_str(name: &str) -> Result<Self, LayerError> {
        match name {
            "ReLU" => Ok(Self::ReLU),
            "LeakyReLU" => Ok(Self::LeakyReLU),
            "Tanh" => Ok(Self::Tanh),
            "Sigmoid" => Ok(Self::Sigmoid),
            _ => Err(LayerError::UnknownLayerKind {
                stage: "激活",
                name: name.to_string(),
            }),
        }
    }
}

impl ActivKind {
    /// 按名称解析激活层类型。`None`或空字符串表示“不要该子层”。
    pub fn resolve(spec: Option<&str>) -> Result<Option<Self>, LayerError> {
        match spec {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    pub fn build(self, options: ActivOptions) -> Stage {
        match self {
            Self::ReLU => ReLU.into(),
            Self::LeakyReLU => LeakyReLU::new(options.negative_slope).into(),
            Self::Tanh => Tanh.into(),
            Self::Sigmoid => Sigmoid.into(),
        }
    }
}

#[derive(Debug)]
pub struct ReLU;

impl Layer for ReLU {
    fn name(&self) -> &'static str {
        "ReLU"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| x.max(0.0)))
    }
}

#[derive(Debug)]
pub struct LeakyReLU {
    negative_slope: f32,
}

impl LeakyReLU {
    pub const fn new(negative_slope: f32) -> Self {
        Self { negative_slope }
    }
}

impl Layer for LeakyReLU {
    fn name(&self) -> &'static str {
        "LeakyReLU"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let slope = self.negative_slope;
        Ok(input.map(|x| if x >= 0.0 { x } else { slope * x }))
    }
}

#[derive(Debug)]
pub struct Tanh;

impl Layer for Tanh {
    fn name(&self) -> &'static str {
        "Tanh"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(f32::tanh))
    }
}

#[derive(Debug)]
pub struct Sigmoid;

impl Layer for Sigmoid {
    fn name(&self) -> &'static str {
        "Sigmoid"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| 1.0 / (1.0 + (-x).exp())))
    }
}
