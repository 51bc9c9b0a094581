/*
 * @Author       : 老董
 * @Date         : 2026-02-13
 * @Description  : Conv2dBlock - 声明式配置的卷积块
 *
 * 按固定顺序组合常见结构：ConvBlock = Pad + Conv + Norm + 非线性。
 * 各子层按PyTorch类名字符串声明，构建期解析成封闭的Stage枚举；
 * 传None/空串则整个子层缺席，块最少可退化为只剩卷积。
 *
 * 偏置的默认策略：若启用了归一化层且调用者未显式指定偏置，则卷积偏置
 * 默认关闭（可被显式指定覆盖）。
 */

use crate::nn::LayerError;
use crate::nn::layer::{
    ActivKind, ActivOptions, Conv2d, NormKind, NormOptions, PadKind, SpectralConv2d, Stage,
    same_padding,
};
use crate::nn::module::Layer;
use crate::tensor::Tensor;

/// 卷积偏置的三态开关：显式指定总是生效；`Default`表示按
/// “有归一化则关、无归一化则开”的默认策略在构建期决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BiasMode {
    #[default]
    Default,
    Enabled,
    Disabled,
}

/// Conv2dBlock 的构建配置。
///
/// # 使用示例
/// ```ignore
/// // 默认：ReflectionPad2d + Conv2d(带偏置) + ReLU
/// let block = Conv2dBlock::new(3, 64, 3).build()?;
///
/// // 带批归一化（偏置随默认策略自动关闭）与谱归一化
/// let block = Conv2dBlock::new(64, 128, 3)
///     .norm_type(Some("BatchNorm2d"))
///     .spectral(true)
///     .stride(2)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct Conv2dBlockConfig {
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    pad_type: Option<String>,
    spectral: bool,
    activ_type: Option<String>,
    activ_options: ActivOptions,
    norm_type: Option<String>,
    norm_options: NormOptions,
    stride: usize,
    dilation: usize,
    groups: usize,
    bias: BiasMode,
}

impl Conv2dBlockConfig {
    fn new(in_channels: usize, out_channels: usize, kernel_size: usize) -> Self {
        Self {
            in_channels,
            out_channels,
            kernel_size,
            pad_type: Some("ReflectionPad2d".to_string()),
            spectral: false,
            activ_type: Some("ReLU".to_string()),
            activ_options: ActivOptions::default(),
            norm_type: None,
            norm_options: NormOptions::default(),
            stride: 1,
            dilation: 1,
            groups: 1,
            bias: BiasMode::Default,
        }
    }

    /// 填充层类型（默认"ReflectionPad2d"，None/空串禁用）
    pub fn pad_type(mut self, pad_type: Option<&str>) -> Self {
        self.pad_type = pad_type.map(str::to_string);
        self
    }

    /// 是否对卷积核施加谱归一化（默认false）
    pub const fn spectral(mut self, spectral: bool) -> Self {
        self.spectral = spectral;
        self
    }

    /// 激活层类型（默认"ReLU"，None/空串禁用）
    pub fn activ_type(mut self, activ_type: Option<&str>) -> Self {
        self.activ_type = activ_type.map(str::to_string);
        self
    }

    pub const fn activ_options(mut self, options: ActivOptions) -> Self {
        self.activ_options = options;
        self
    }

    /// 归一化层类型（默认None即禁用）
    pub fn norm_type(mut self, norm_type: Option<&str>) -> Self {
        self.norm_type = norm_type.map(str::to_string);
        self
    }

    pub const fn norm_options(mut self, options: NormOptions) -> Self {
        self.norm_options = options;
        self
    }

    pub const fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub const fn dilation(mut self, dilation: usize) -> Self {
        self.dilation = dilation;
        self
    }

    pub const fn groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self
    }

    /// 显式指定卷积偏置开关，覆盖默认策略
    pub const fn bias(mut self, bias: BiasMode) -> Self {
        self.bias = bias;
        self
    }

    /// 解析各子层名称并组装卷积块。
    ///
    /// 所有名称解析错误（`LayerError::UnknownLayerKind`）都在这里抛出，
    /// 早于任何张量运算。
    pub fn build(self) -> Result<Conv2dBlock, LayerError> {
        if self.kernel_size == 0 {
            return Err(LayerError::InvalidConfig(
                "卷积核尺寸必须大于0".to_string(),
            ));
        }

        // 先解析全部名称，保证配置错误先于一切张量操作暴露
        let pad = PadKind::resolve(self.pad_type.as_deref())?;
        let norm = NormKind::resolve(self.norm_type.as_deref())?;
        let activ = ActivKind::resolve(self.activ_type.as_deref())?;

        // 偏置默认策略：有归一化层则关闭，显式指定总是优先
        let use_bias = match self.bias {
            BiasMode::Default => norm.is_none(),
            BiasMode::Enabled => true,
            BiasMode::Disabled => false,
        };

        let pad_value = same_padding(self.kernel_size, self.dilation);

        let mut stages = Vec::with_capacity(4);

        // 子层1 - 填充
        if let Some(kind) = pad {
            stages.push(kind.build(pad_value));
        }

        // 子层2 - 卷积（可选谱归一化包装）
        let conv = Conv2d::new(
            self.in_channels,
            self.out_channels,
            self.kernel_size,
            self.stride,
            self.dilation,
            self.groups,
            use_bias,
        )?;
        if self.spectral {
            stages.push(SpectralConv2d::new(conv).into());
        } else {
            stages.push(conv.into());
        }

        // 子层3 - 归一化（batch/instance）
        if let Some(kind) = norm {
            stages.push(kind.build(self.out_channels, self.norm_options));
        }

        // 子层4 - 激活/非线性
        if let Some(kind) = activ {
            stages.push(kind.build(self.activ_options));
        }

        Ok(Conv2dBlock { stages })
    }
}

/// 组装完毕的卷积块：一串按序执行的子层
#[derive(Debug)]
pub struct Conv2dBlock {
    stages: Vec<Stage>,
}

impl Conv2dBlock {
    /// 开始构建一个卷积块，返回可链式调用的配置。
    ///
    /// # 参数
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_size`: 卷积核尺寸（预期为奇数；偶数核的“same”填充不精确）
    pub fn new(in_channels: usize, out_channels: usize, kernel_size: usize) -> Conv2dBlockConfig {
        Conv2dBlockConfig::new(in_channels, out_channels, kernel_size)
    }

    /// 实际组装的子层数量（被禁用的子层不占位）
    pub fn stage_len(&self) -> usize {
        self.stages.len()
    }

    /// 各子层的类型名，按执行顺序排列
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Layer::name).collect()
    }

    /// 切换块内归一化子层的训练/推理态。
    ///
    /// 目前只有BatchNorm2d区分两种状态（InstanceNorm2d始终用当前样本
    /// 统计量）；块内无批归一化层时本调用无效果。
    pub fn set_training(&mut self, training: bool) {
        for stage in &mut self.stages {
            if let Stage::BatchNorm2d(norm) = stage {
                norm.set_training(training);
            }
        }
    }

    /// 块内的卷积子层（构建成功后必然存在）
    pub fn conv(&self) -> &Conv2d {
        self.stages
            .iter()
            .find_map(|stage| match stage {
                Stage::Conv2d(conv) => Some(conv),
                Stage::SpectralConv2d(spectral) => Some(spectral.inner()),
                _ => None,
            })
            .expect("Conv2dBlock构建后必含卷积子层")
    }
}

impl Layer for Conv2dBlock {
    fn name(&self) -> &'static str {
        "Conv2dBlock"
    }

    /// 按序执行全部子层。形状不兼容会在第一个出问题的子层处返回错误。
    fn forward(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut output = input.clone();
        for stage in &mut self.stages {
            output = stage.forward(&output)?;
        }
        Ok(output)
    }
}
