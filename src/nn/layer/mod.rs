/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Layer 模块 - 卷积块及其可插拔子层
 *
 * 子层分四类：填充（pad）、卷积（conv）、归一化（norm）、激活（activ）。
 * 每类对应一个封闭的Kind枚举，按PyTorch类名解析；Conv2dBlock按固定顺序
 * pad -> conv -> norm -> activ 组装启用的子层。
 */

mod activation;
mod conv2d;
mod conv_block;
mod norm;
mod pad;
mod spectral;

pub use activation::{ActivKind, ActivOptions, LeakyReLU, ReLU, Sigmoid, Tanh};
pub use conv2d::Conv2d;
pub use conv_block::{BiasMode, Conv2dBlock, Conv2dBlockConfig};
pub use norm::{BatchNorm2d, InstanceNorm2d, NormKind, NormOptions};
pub use pad::{PadKind, ReflectionPad2d, ZeroPad2d};
pub use spectral::SpectralConv2d;

use crate::nn::module::Layer;
use crate::nn::LayerError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 卷积块中一个已实例化的子层。
/// 封闭枚举 + enum_dispatch静态分发，避免运行期的开放式名称查找。
#[enum_dispatch(Layer)]
#[derive(Debug)]
pub enum Stage {
    ReflectionPad2d,
    ZeroPad2d,
    Conv2d,
    SpectralConv2d,
    BatchNorm2d,
    InstanceNorm2d,
    ReLU,
    LeakyReLU,
    Tanh,
    Sigmoid,
}

/// 校验4D输入并拆出(batch, c, h, w)。各子层前向计算的公共入口检查。
pub(in crate::nn) fn check_4d(
    input: &Tensor,
    layer: &'static str,
) -> Result<(usize, usize, usize, usize), LayerError> {
    let shape = input.shape();
    if shape.len() != 4 {
        return Err(LayerError::ShapeMismatch {
            expected: vec![0, 0, 0, 0],
            got: shape.to_vec(),
            message: format!("{layer}输入必须是4D [batch, C, H, W]，单样本请使用 [1, C, H, W]"),
        });
    }
    Ok((shape[0], shape[1], shape[2], shape[3]))
}

/// 计算“same”填充量：p = dilation * (kernel - 1) / 2（整数截断）。
///
/// 对奇数卷积核，在stride=1下先填充p再卷积可保持空间尺寸不变；
/// 对偶数卷积核该值不精确（单侧会差一个像素），这是沿用的已知近似，
/// 不在此处修正。
pub const fn same_padding(kernel: usize, dilation: usize) -> usize {
    dilation * kernel.saturating_sub(1) / 2
}
