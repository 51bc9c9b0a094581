use crate::assert_panic;
use crate::tensor::Tensor;

#[test]
fn test_add_with_or_without_ownership() {
    let tensor1 = Tensor::new(&[1., 2., 3.], &[3]);
    let tensor2 = Tensor::new(&[4., 5., 6.], &[3]);

    // f32 + 张量 / 张量 + f32
    assert_eq!(5. + &tensor1, Tensor::new(&[6., 7., 8.], &[3]));
    assert_eq!(&tensor1 + 5., Tensor::new(&[6., 7., 8.], &[3]));

    // 张量 + 张量（各种所有权组合）
    assert_eq!(&tensor1 + &tensor2, Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(tensor1.clone() + &tensor2, Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(tensor1 + tensor2, Tensor::new(&[5., 7., 9.], &[3]));
}

#[test]
fn test_sub_mul_div() {
    let tensor1 = Tensor::new(&[4., 9., 16.], &[3]);
    let tensor2 = Tensor::new(&[2., 3., 4.], &[3]);

    assert_eq!(&tensor1 - &tensor2, Tensor::new(&[2., 6., 12.], &[3]));
    assert_eq!(&tensor1 * &tensor2, Tensor::new(&[8., 27., 64.], &[3]));
    assert_eq!(&tensor1 / &tensor2, Tensor::new(&[2., 3., 4.], &[3]));
    assert_eq!(&tensor1 * 2., Tensor::new(&[8., 18., 32.], &[3]));
    assert_eq!(&tensor1 / 2., Tensor::new(&[2., 4.5, 8.], &[3]));
    assert_eq!(&tensor1 - 1., Tensor::new(&[3., 8., 15.], &[3]));
}

#[test]
fn test_binary_op_with_unmatched_shape_panics() {
    let tensor1 = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    let tensor2 = Tensor::new(&[1., 2., 3., 4.], &[4]);
    assert_panic!(&tensor1 + &tensor2);
    assert_panic!(&tensor1 * &tensor2);
}
