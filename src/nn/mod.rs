/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 负责神经网络层（layer）的构建。
 *                 本模块只做前向（forward）变换，不涉及梯度与反向传播。
 */

mod error;
mod module;

pub mod layer;

pub use error::LayerError;
pub use layer::{
    ActivKind, ActivOptions, BiasMode, Conv2d, Conv2dBlock, Conv2dBlockConfig, NormKind,
    NormOptions, PadKind, Stage, same_padding,
};
pub use module::Layer;

#[cfg(test)]
mod tests;
