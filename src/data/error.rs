//! 数据增强错误类型定义

use thiserror::Error;

/// 数据增强相关错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    /// 输入不是合法的图像张量（要求[H, W, 3]布局）
    #[error("无效的图像张量: {message}，实际形状 {got:?}")]
    InvalidImage { message: String, got: Vec<usize> },

    /// 变换配置非法
    #[error("无效的变换配置: {0}")]
    InvalidConfig(String),
}
