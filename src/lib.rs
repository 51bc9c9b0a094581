//! # Contrast Torch
//!
//! `contrast_torch`项目旨在用纯rust为对比自监督（contrastive self-supervised）
//! 视觉模型提供两块可复用的积木：
//!
//! 1. `nn::layer::Conv2dBlock`：声明式配置的卷积块，按固定顺序组合
//!    Pad + Conv + Norm + 非线性四个子层，各子层可按名称启用/禁用；
//! 2. `data::ImageTransforms`：双视图随机图像增强管线，对同一张输入图像
//!    独立施加两条增强链，产出对比损失所需的两个视图。
//!
//! 梯度计算、损失函数、优化器、数据集加载与分布式训练均不在本crate范围内，
//! 它们作为外部协作者消费本crate的前向变换契约与双视图输出。

pub mod data;
pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
pub mod vision;
