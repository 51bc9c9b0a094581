use super::Tensor;
use crate::errors::TensorError;
use std::ops::{Index, IndexMut};

/// 元素级索引：`tensor[[b, c, h, w]]`。
/// 索引的长度必须与张量的阶数一致，越界时panic。
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, indices: [usize; N]) -> &f32 {
        self.data.get(&indices[..]).unwrap_or_else(|| {
            panic!(
                "{}",
                TensorError::IndexOutOfBounds {
                    indices: indices.to_vec(),
                    shape: self.shape().to_vec(),
                }
            )
        })
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, indices: [usize; N]) -> &mut f32 {
        let shape = self.shape().to_vec();
        self.data.get_mut(&indices[..]).unwrap_or_else(|| {
            panic!(
                "{}",
                TensorError::IndexOutOfBounds {
                    indices: indices.to_vec(),
                    shape,
                }
            )
        })
    }
}
