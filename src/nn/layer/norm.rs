/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : 2D 归一化层：BatchNorm2d 与 InstanceNorm2d
 *
 * 输入/输出形状均为 [batch, C, H, W]。
 * - BatchNorm2d：对每个通道在(batch, H, W)上统计，训练态维护滑动统计量；
 * - InstanceNorm2d：对每个(样本, 通道)在(H, W)上统计，无滑动统计量。
 * 滑动统计量归归一化层自身所有，`forward`因此要求`&mut self`。
 */

use std::str::FromStr;

use crate::nn::module::Layer;
use crate::nn::{LayerError, layer::Stage, layer::check_4d};
use crate::tensor::Tensor;

/// 归一化层的显式配置。
/// `affine`为三态：None表示沿用该层类型的PyTorch默认值
/// （BatchNorm2d默认true，InstanceNorm2d默认false）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormOptions {
    pub eps: f32,
    pub momentum: f32,
    pub affine: Option<bool>,
}

impl Default for NormOptions {
    fn default() -> Self {
        Self {
            eps: 1e-5,
            momentum: 0.1,
            affine: None,
        }
    }
}

/// 归一化层类型的封闭枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormKind {
    BatchNorm2d,
    InstanceNorm2d,
}

impl FromStr for NormKind {
    type Err = LayerError;

    fn from_str(name: &str) -> Result<Self, LayerError> {
        match name {
            "BatchNorm2d" => Ok(Self::BatchNorm2d),
            "InstanceNorm2d" => Ok(Self::InstanceNorm2d),
            _ => Err(LayerError::UnknownLayerKind {
                stage: "归一化",
                name: name.to_string(),
            }),
        }
    }
}

impl NormKind {
    /// 按名称解析归一化层类型。`None`或空字符串表示“不要该子层”。
    pub fn resolve(spec: Option<&str>) -> Result<Option<Self>, LayerError> {
        match spec {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }

    /// 以给定通道数与配置实例化子层
    pub fn build(self, num_features: usize, options: NormOptions) -> Stage {
        match self {
            Self::BatchNorm2d => BatchNorm2d::new(num_features, options).into(),
            Self::InstanceNorm2d => InstanceNorm2d::new(num_features, options).into(),
        }
    }
}

/// 逐元素归一化并施加可选的仿射变换，mean/var按`per_sample`选定的粒度给出
fn normalize_4d(
    input: &Tensor,
    mean: &[f32],
    var: &[f32],
    gamma: Option<&Tensor>,
    beta: Option<&Tensor>,
    eps: f32,
    per_sample: bool,
) -> Tensor {
    let shape = input.shape().to_vec();
    let (batch_size, c, h, w) = (shape[0], shape[1], shape[2], shape[3]);
    let mut output = Tensor::zeros(&shape);
    for bi in 0..batch_size {
        for ci in 0..c {
            let stat_idx = if per_sample { bi * c + ci } else { ci };
            let inv_std = 1.0 / (var[stat_idx] + eps).sqrt();
            let scale = gamma.map_or(1.0, |g| g[[ci]]);
            let shift = beta.map_or(0.0, |b| b[[ci]]);
            for hi in 0..h {
                for wi in 0..w {
                    let normed = (input[[bi, ci, hi, wi]] - mean[stat_idx]) * inv_std;
                    output[[bi, ci, hi, wi]] = normed * scale + shift;
                }
            }
        }
    }
    output
}

/// 批归一化层
#[derive(Debug)]
pub struct BatchNorm2d {
    num_features: usize,
    gamma: Option<Tensor>,
    beta: Option<Tensor>,
    running_mean: Tensor,
    running_var: Tensor,
    eps: f32,
    momentum: f32,
    training: bool,
}

impl BatchNorm2d {
    pub fn new(num_features: usize, options: NormOptions) -> Self {
        let affine = options.affine.unwrap_or(true);
        Self {
            num_features,
            gamma: affine.then(|| Tensor::filled(1.0, &[num_features])),
            beta: affine.then(|| Tensor::zeros(&[num_features])),
            running_mean: Tensor::zeros(&[num_features]),
            running_var: Tensor::filled(1.0, &[num_features]),
            eps: options.eps,
            momentum: options.momentum,
            training: true,
        }
    }

    /// 切换训练/推理态：训练态用批统计量归一化并更新滑动统计量，
    /// 推理态改用滑动统计量。
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    pub const fn running_mean(&self) -> &Tensor {
        &self.running_mean
    }

    pub const fn running_var(&self) -> &Tensor {
        &self.running_var
    }

    fn check_channels(&self, c: usize, got: &[usize]) -> Result<(), LayerError> {
        if c != self.num_features {
            return Err(LayerError::ShapeMismatch {
                expected: vec![self.num_features],
                got: got.to_vec(),
                message: format!("输入通道数{}与归一化层的通道数{}不匹配", c, self.num_features),
            });
        }
        Ok(())
    }
}

impl Layer for BatchNorm2d {
    fn name(&self) -> &'static str {
        "BatchNorm2d"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let (batch_size, c, h, w) = check_4d(input, "BatchNorm2d")?;
        self.check_channels(c, input.shape())?;

        if !self.training {
            let mean = self.running_mean.as_slice().to_vec();
            let var = self.running_var.as_slice().to_vec();
            return Ok(normalize_4d(
                input,
                &mean,
                &var,
                self.gamma.as_ref(),
                self.beta.as_ref(),
                self.eps,
                false,
            ));
        }

        let n = (batch_size * h * w) as f32;
        let mut mean = vec![0.0f32; c];
        let mut var = vec![0.0f32; c];
        for ci in 0..c {
            let mut sum = 0.0f32;
            for bi in 0..batch_size {
                for hi in 0..h {
                    for wi in 0..w {
                        sum += input[[bi, ci, hi, wi]];
                    }
                }
            }
            mean[ci] = sum / n;
            let mut sq_sum = 0.0f32;
            for bi in 0..batch_size {
                for hi in 0..h {
                    for wi in 0..w {
                        sq_sum += (input[[bi, ci, hi, wi]] - mean[ci]).powi(2);
                    }
                }
            }
            var[ci] = sq_sum / n; // 有偏方差，用于归一化

            // 滑动统计量用无偏方差更新（与PyTorch一致）
            let unbiased_var = if n > 1.0 { sq_sum / (n - 1.0) } else { var[ci] };
            self.running_mean[[ci]] =
                (1.0 - self.momentum) * self.running_mean[[ci]] + self.momentum * mean[ci];
            self.running_var[[ci]] =
                (1.0 - self.momentum) * self.running_var[[ci]] + self.momentum * unbiased_var;
        }

        Ok(normalize_4d(
            input,
            &mean,
            &var,
            self.gamma.as_ref(),
            self.beta.as_ref(),
            self.eps,
            false,
        ))
    }
}

/// 实例归一化层
#[derive(Debug)]
pub struct InstanceNorm2d {
    num_features: usize,
    gamma: Option<Tensor>,
    beta: Option<Tensor>,
    eps: f32,
}

impl InstanceNorm2d {
    pub fn new(num_features: usize, options: NormOptions) -> Self {
        let affine = options.affine.unwrap_or(false);
        Self {
            num_features,
            gamma: affine.then(|| Tensor::filled(1.0, &[num_features])),
            beta: affine.then(|| Tensor::zeros(&[num_features])),
            eps: options.eps,
        }
    }
}

impl Layer for InstanceNorm2d {
    fn name(&self) -> &'static str {
        "InstanceNorm2d"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let (batch_size, c, h, w) = check_4d(input, "InstanceNorm2d")?;
        if c != self.num_features {
            return Err(LayerError::ShapeMismatch {
                expected: vec![self.num_features],
                got: input.shape().to_vec(),
                message: format!("输入通道数{}与归一化层的通道数{}不匹配", c, self.num_features),
            });
        }

        let n = (h * w) as f32;
        let mut mean = vec![0.0f32; batch_size * c];
        let mut var = vec![0.0f32; batch_size * c];
        for bi in 0..batch_size {
            for ci in 0..c {
                let mut sum = 0.0f32;
                for hi in 0..h {
                    for wi in 0..w {
                        sum += input[[bi, ci, hi, wi]];
                    }
                }
                let m = sum / n;
                let mut sq_sum = 0.0f32;
                for hi in 0..h {
                    for wi in 0..w {
                        sq_sum += (input[[bi, ci, hi, wi]] - m).powi(2);
                    }
                }
                mean[bi * c + ci] = m;
                var[bi * c + ci] = sq_sum / n;
            }
        }

        Ok(normalize_4d(
            input,
            &mean,
            &var,
            self.gamma.as_ref(),
            self.beta.as_ref(),
            self.eps,
            true,
        ))
    }
}
