//! 数据增强模块
//!
//! 为对比式自监督学习提供双视图（dual-view）随机增强管线。
//!
//! # 主要组件
//!
//! - [`ImageTransforms`]: 对同一张图像产生两个独立随机增强视图
//! - [`TransformOp`] / [`TransformChain`]: 可组合的单步图像变换
//! - [`DataError`]: 数据增强错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use contrast_torch::data::ImageTransforms;
//! use contrast_torch::vision::Vision;
//!
//! let mut transforms = ImageTransforms::new((128, 128))?;
//! let image = Vision::load_image("cat.png")?;
//! // 两个视图各自独立采样随机参数，互不相同
//! let (view1, view2) = transforms.apply(&image)?;
//! ```

pub mod augment;
pub mod error;


// Re-exports
pub use augment::{IMAGENET_MEAN, IMAGENET_STD, ImageTransforms, TransformChain, TransformOp};
pub use error::DataError;
