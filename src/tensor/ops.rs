/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 张量的逐元素四则运算。
 *                 1. 其中一个操作数为纯数（f32）而另一个为张量：返回的张量形状与该张量相同；
 *                 2. 两个操作数均为张量：形状必须严格一致，否则panic（不做广播——
 *                    本crate的归一化/激活层只需要同形状运算）。
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use std::ops::{Add, Div, Mul, Sub};

fn check_same_shape(tensor1: &Tensor, tensor2: &Tensor) {
    assert!(
        tensor1.is_same_shape(tensor2),
        "{}",
        TensorError::UnmatchedShape {
            tensor1_shape: tensor1.shape().to_vec(),
            tensor2_shape: tensor2.shape().to_vec(),
        }
    );
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓张量 ⊕ 张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
macro_rules! impl_tensor_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Tensor {
            type Output = Tensor;
            fn $method(self, rhs: Tensor) -> Tensor {
                check_same_shape(&self, &rhs);
                Tensor { data: &self.data $op &rhs.data }
            }
        }
        impl $trait<&Tensor> for Tensor {
            type Output = Tensor;
            fn $method(self, rhs: &Tensor) -> Tensor {
                check_same_shape(&self, rhs);
                Tensor { data: &self.data $op &rhs.data }
            }
        }
        impl $trait<Tensor> for &Tensor {
            type Output = Tensor;
            fn $method(self, rhs: Tensor) -> Tensor {
                check_same_shape(self, &rhs);
                Tensor { data: &self.data $op &rhs.data }
            }
        }
        impl $trait<&Tensor> for &Tensor {
            type Output = Tensor;
            fn $method(self, rhs: &Tensor) -> Tensor {
                check_same_shape(self, rhs);
                Tensor { data: &self.data $op &rhs.data }
            }
        }
    };
}

impl_tensor_binary_op!(Add, add, +);
impl_tensor_binary_op!(Sub, sub, -);
impl_tensor_binary_op!(Mul, mul, *);
impl_tensor_binary_op!(Div, div, /);
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑张量 ⊕ 张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓张量 ⊕ f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
macro_rules! impl_scalar_binary_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f32> for Tensor {
            type Output = Tensor;
            fn $method(self, scalar: f32) -> Tensor {
                Tensor { data: &self.data $op scalar }
            }
        }
        impl $trait<f32> for &Tensor {
            type Output = Tensor;
            fn $method(self, scalar: f32) -> Tensor {
                Tensor { data: &self.data $op scalar }
            }
        }
    };
}

impl_scalar_binary_op!(Add, add, +);
impl_scalar_binary_op!(Sub, sub, -);
impl_scalar_binary_op!(Mul, mul, *);
impl_scalar_binary_op!(Div, div, /);

impl Add<Tensor> for f32 {
    type Output = Tensor;
    fn add(self, tensor: Tensor) -> Tensor {
        tensor + self
    }
}
impl Add<&Tensor> for f32 {
    type Output = Tensor;
    fn add(self, tensor: &Tensor) -> Tensor {
        tensor + self
    }
}
impl Mul<Tensor> for f32 {
    type Output = Tensor;
    fn mul(self, tensor: Tensor) -> Tensor {
        tensor * self
    }
}
impl Mul<&Tensor> for f32 {
    type Output = Tensor;
    fn mul(self, tensor: &Tensor) -> Tensor {
        tensor * self
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑张量 ⊕ f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
