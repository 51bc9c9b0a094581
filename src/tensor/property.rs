/*
 * @Author       : 老董
 * @Date         : 2026-02-11
 * @Description  : 本文件仅包含张量的属性方法，不包含任何运算方法
 */

use super::Tensor;
use ndarray::{ArrayViewD, ArrayViewMutD};

impl Tensor {
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    pub fn view_mut(&mut self) -> ArrayViewMutD<'_, f32> {
        self.data.view_mut()
    }

    /// 若为向量，`shape`可以是[n]；若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数，即`shape()`的元素个数。
    /// NOTE: 这里用`dimension`是参照了大多数库的命名规范，如PyTorch、NumPy等；
    /// 张量中所有元素的数量请使用`size()`方法来获取。
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }
}
