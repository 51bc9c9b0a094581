use thiserror::Error;

/// 层构建与前向计算的错误类型
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayerError {
    /// 配置错误：按名称解析子层时遇到未知的层类型。
    /// 该错误在构建期立即抛出，不会触碰任何张量运算。
    #[error("未知的{stage}层类型: `{name}`")]
    UnknownLayerKind { stage: &'static str, name: String },

    /// 配置错误：通道数、卷积核或分组等参数本身非法
    #[error("无效的层配置: {0}")]
    InvalidConfig(String),

    /// 形状不匹配：在第一个不兼容的子层处于前向计算时抛出
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
}
