/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 谱归一化（spectral normalization）卷积层
 *
 * 把卷积核展平成 [C_out, C_in/groups * k * k] 的矩阵W，用幂迭代估计其最大
 * 奇异值sigma，每次前向都以 W/sigma 参与卷积，从而约束算子范数约等于1。
 * 幂迭代的左奇异向量u在两次前向之间保留，迭代次数与PyTorch默认一致（1次）。
 */

use crate::nn::LayerError;
use crate::nn::layer::Conv2d;
use crate::nn::module::Layer;
use crate::tensor::Tensor;

const N_POWER_ITERATIONS: usize = 1;
const EPS: f32 = 1e-12;

/// 谱归一化包装的卷积层
#[derive(Debug)]
pub struct SpectralConv2d {
    conv: Conv2d,
    /// 幂迭代的左奇异向量估计，长度为C_out
    u: Vec<f32>,
}

impl SpectralConv2d {
    pub fn new(conv: Conv2d) -> Self {
        let rows = conv.weight().shape()[0];
        let u = normalize(&Tensor::new_normal(0.0, 1.0, &[rows]).as_slice().to_vec());
        Self { conv, u }
    }

    pub const fn inner(&self) -> &Conv2d {
        &self.conv
    }

    /// 执行一轮幂迭代并返回当前的sigma估计。
    /// W按行主序展平为 rows x cols 矩阵。
    fn power_iteration(&mut self) -> f32 {
        let weight = self.conv.weight().as_slice();
        let rows = self.conv.weight().shape()[0];
        let cols = weight.len() / rows;

        let mut v = vec![0.0f32; cols];
        for _ in 0..N_POWER_ITERATIONS {
            // v = normalize(W^T u)
            for (j, value) in v.iter_mut().enumerate() {
                *value = (0..rows).map(|i| weight[i * cols + j] * self.u[i]).sum();
            }
            v = normalize(&v);
            // u = normalize(W v)
            for i in 0..rows {
                self.u[i] = (0..cols).map(|j| weight[i * cols + j] * v[j]).sum();
            }
            self.u = normalize(&self.u);
        }

        // sigma = u^T W v
        (0..rows)
            .map(|i| {
                let row_dot: f32 = (0..cols).map(|j| weight[i * cols + j] * v[j]).sum();
                self.u[i] * row_dot
            })
            .sum()
    }

    /// 当前重参数化后卷积核的谱范数估计（供测试观察收敛用）
    pub fn sigma_estimate(&mut self) -> f32 {
        self.power_iteration()
    }
}

fn normalize(vec: &[f32]) -> Vec<f32> {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt().max(EPS);
    vec.iter().map(|x| x / norm).collect()
}

impl Layer for SpectralConv2d {
    fn name(&self) -> &'static str {
        "SpectralConv2d"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let sigma = self.power_iteration().max(EPS);
        let weight = self.conv.weight() / sigma;
        self.conv.forward_with_weight(&weight, input)
    }
}
