use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::errors::TensorError;

mod index;
mod ops;
mod property;

#[cfg(test)]
pub mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 本crate中图像张量约定两种布局：
/// 1. 解码后的原始图像为[H, W, C]（行、列、通道）；
/// 2. 进入网络的张量为[batch, C, H, W]（批、通道、行、列）。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub(crate) data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        assert!(
            data.len() == shape.iter().product::<usize>(),
            "{}",
            TensorError::DataLenMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).unwrap();
        Self { data }
    }

    /// 创建一个全零张量。
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个各元素均为`value`的张量。
    pub fn filled(value: f32, shape: &[usize]) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间内均匀分布。
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Self {
        let mut rng = rand::thread_rng();
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(&mut rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 创建一个服从正态分布N(mean, std_dev²)的随机张量。
    /// 注：这里使用Box-Muller变换，避免额外引入rand_distr。
    pub fn new_normal(mean: f32, std_dev: f32, shape: &[usize]) -> Self {
        let mut rng = rand::thread_rng();
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);
        while data.len() < data_len {
            let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let radius = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            data.push(mean + std_dev * radius * theta.cos());
            if data.len() < data_len {
                data.push(mean + std_dev * radius * theta.sin());
            }
        }
        Self::new(&data, shape)
    }

    /// 返回按行主序（row-major）排布的底层数据切片。
    pub fn as_slice(&self) -> &[f32] {
        self.data.as_slice().unwrap()
    }

    /// 对每个元素应用函数`f`，返回新张量。
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f32) -> f32,
    {
        Self {
            data: self.data.map(|x| f(*x)),
        }
    }
}
