use thiserror::Error;

/// 张量自身的错误类型。
/// 注：构造期的程序员错误（如`data`长度与`shape`乘积不符）会直接以本枚举的
/// 文本信息panic（见各构造函数中的assert），运算期的形状问题同理。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("数据长度{data_len}与形状{shape:?}的元素总数不符")]
    DataLenMismatch { data_len: usize, shape: Vec<usize> },

    #[error("形状不一致，无法逐元素运算：第一个张量为{tensor1_shape:?}，第二个张量为{tensor2_shape:?}")]
    UnmatchedShape {
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("索引{indices:?}超出张量形状{shape:?}的范围")]
    IndexOutOfBounds {
        indices: Vec<usize>,
        shape: Vec<usize>,
    },
}
