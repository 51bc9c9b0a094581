/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Conv2d (2D 卷积) 层 - 前向专用，PyTorch 风格
 *
 * 输入/输出形状：
 * - 输入：[batch, C_in, H, W]
 * - 输出：[batch, C_out, H', W']
 *
 * 输出尺寸计算（卷积层自身不做填充，填充由块中的pad子层负责）：
 * H' = (H - dilation*(kernel-1) - 1) / stride + 1
 * W' = (W - dilation*(kernel-1) - 1) / stride + 1
 *
 * 使用 Rayon 在 batch 维度并行加速。
 */

use crate::nn::LayerError;
use crate::nn::layer::check_4d;
use crate::nn::module::Layer;
use crate::tensor::Tensor;
use rayon::prelude::*;

/// 2D 卷积层。
/// 卷积核形状为 [C_out, C_in/groups, k, k]，偏置形状为 [C_out]（可选）。
#[derive(Debug)]
pub struct Conv2d {
    weight: Tensor,
    bias: Option<Tensor>,
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    stride: usize,
    dilation: usize,
    groups: usize,
}

impl Conv2d {
    /// 创建 Conv2d 层。
    ///
    /// 卷积核按 Kaiming 均匀分布初始化（bound = 1/sqrt(fan_in)，与PyTorch默认一致），
    /// 偏置零初始化。
    ///
    /// # 错误
    /// 通道数/卷积核/步长/空洞为0，或 groups 不能整除通道数时返回
    /// `LayerError::InvalidConfig`。
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
        dilation: usize,
        groups: usize,
        use_bias: bool,
    ) -> Result<Self, LayerError> {
        if in_channels == 0 || out_channels == 0 {
            return Err(LayerError::InvalidConfig(format!(
                "通道数必须大于0：in_channels={in_channels}, out_channels={out_channels}"
            )));
        }
        if kernel_size == 0 || stride == 0 || dilation == 0 || groups == 0 {
            return Err(LayerError::InvalidConfig(format!(
                "卷积参数必须大于0：kernel={kernel_size}, stride={stride}, dilation={dilation}, groups={groups}"
            )));
        }
        if in_channels % groups != 0 || out_channels % groups != 0 {
            return Err(LayerError::InvalidConfig(format!(
                "groups={groups} 必须能整除 in_channels={in_channels} 与 out_channels={out_channels}"
            )));
        }

        let fan_in = (in_channels / groups) * kernel_size * kernel_size;
        let bound = 1.0 / (fan_in as f32).sqrt();
        let weight = Tensor::new_random(
            -bound,
            bound,
            &[out_channels, in_channels / groups, kernel_size, kernel_size],
        );
        let bias = use_bias.then(|| Tensor::zeros(&[out_channels]));

        Ok(Self {
            weight,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            stride,
            dilation,
            groups,
        })
    }

    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// 测试/加载时直接替换卷积核（形状必须一致）
    pub fn set_weight(&mut self, weight: Tensor) {
        assert!(
            weight.is_same_shape(&self.weight),
            "卷积核形状必须为 {:?}",
            self.weight.shape()
        );
        self.weight = weight;
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }

    pub fn set_bias(&mut self, bias: Tensor) {
        assert!(self.bias.is_some(), "该卷积层未启用偏置");
        assert!(bias.shape() == [self.out_channels], "偏置形状必须为 [C_out]");
        self.bias = Some(bias);
    }

    pub const fn has_bias(&self) -> bool {
        self.bias.is_some()
    }

    pub const fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    pub const fn dilation(&self) -> usize {
        self.dilation
    }

    /// 给定输入空间尺寸，计算输出空间尺寸
    fn output_spatial(&self, h: usize, w: usize) -> Result<(usize, usize), LayerError> {
        let span = self.dilation * (self.kernel_size - 1) + 1;
        if h < span || w < span {
            return Err(LayerError::ShapeMismatch {
                expected: vec![span, span],
                got: vec![h, w],
                message: format!(
                    "输入空间尺寸过小：卷积核有效覆盖{span}x{span}，输入仅{h}x{w}"
                ),
            });
        }
        Ok(((h - span) / self.stride + 1, (w - span) / self.stride + 1))
    }

    /// 用给定卷积核执行前向计算（谱归一化会传入重参数化后的核）
    pub(in crate::nn) fn forward_with_weight(
        &self,
        weight: &Tensor,
        input: &Tensor,
    ) -> Result<Tensor, LayerError> {
        let (batch_size, in_c, in_h, in_w) = check_4d(input, "Conv2d")?;
        if in_c != self.in_channels {
            return Err(LayerError::ShapeMismatch {
                expected: vec![self.in_channels],
                got: vec![in_c],
                message: format!(
                    "输入通道数{}与卷积层的输入通道数{}不匹配",
                    in_c, self.in_channels
                ),
            });
        }
        let (out_h, out_w) = self.output_spatial(in_h, in_w)?;

        let out_c = self.out_channels;
        let k = self.kernel_size;
        let (stride, dilation) = (self.stride, self.dilation);
        let in_per_group = self.in_channels / self.groups;
        let out_per_group = out_c / self.groups;
        let single_sample_size = out_c * out_h * out_w;

        // Rayon 并行计算每个 batch 样本
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; single_sample_size];
                for oc in 0..out_c {
                    let group = oc / out_per_group;
                    let ic_base = group * in_per_group;
                    let bias_value = self.bias.as_ref().map_or(0.0, |bias| bias[[oc]]);
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let h_start = oh * stride;
                            let w_start = ow * stride;
                            let mut sum = bias_value;
                            for ic in 0..in_per_group {
                                for kh in 0..k {
                                    for kw in 0..k {
                                        let input_val = input[[
                                            b,
                                            ic_base + ic,
                                            h_start + kh * dilation,
                                            w_start + kw * dilation,
                                        ]];
                                        sum += input_val * weight[[oc, ic, kh, kw]];
                                    }
                                }
                            }
                            sample_data[oc * out_h * out_w + oh * out_w + ow] = sum;
                        }
                    }
                }
                sample_data
            })
            .collect();

        // 合并结果
        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Ok(Tensor::new(&all_data, &[batch_size, out_c, out_h, out_w]))
    }
}

impl Layer for Conv2d {
    fn name(&self) -> &'static str {
        "Conv2d"
    }

    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.forward_with_weight(&self.weight, input)
    }
}
