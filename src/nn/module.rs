/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : Layer trait 定义
 *
 * 设计原则：
 * - 所有子层统一`forward(&mut self, &Tensor) -> Result<Tensor, LayerError>`签名，
 *   这样卷积块才能把它们放进同一个有序列表按序执行；
 * - `forward`需要`&mut self`，因为归一化层会更新自己的滑动统计量、
 *   谱归一化会更新幂迭代向量——这些状态归子层所有，调用者无需关心；
 * - 构造函数不进trait（各层参数各异）。
 */

use crate::nn::LayerError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

/// 可组合的前向变换层
#[enum_dispatch]
pub trait Layer {
    /// 层的类型名（与PyTorch同名，如"ReflectionPad2d"）
    fn name(&self) -> &'static str;

    /// 前向计算。除子层内部状态（滑动统计量、幂迭代向量）外无副作用。
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError>;
}
