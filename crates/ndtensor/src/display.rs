//! Human-readable rendering of views and tensors.
//!
//! Contents print as nested brackets in multi-index order, so a transposed
//! or sliced view renders exactly like its dense copy would.

use std::fmt;

use crate::tensor::Tensor;
use crate::view::{TensorView, TensorViewMut};

fn fmt_nested<E: fmt::Display>(
    view: &TensorView<'_, E>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match view.rank() {
        0 => match view.get(&[]) {
            Ok(v) => write!(f, "{v}"),
            Err(_) => write!(f, "[]"),
        },
        1 => {
            write!(f, "[")?;
            for i in 0..view.dims()[0] {
                if i > 0 {
                    write!(f, ", ")?;
                }
                match view.get(&[i]) {
                    Ok(v) => write!(f, "{v}")?,
                    Err(_) => write!(f, "?")?,
                }
            }
            write!(f, "]")
        }
        _ => {
            let iter = match view.axis_iter(0) {
                Ok(iter) => iter,
                Err(_) => return write!(f, "[]"),
            };
            write!(f, "[")?;
            for (i, sub) in iter.enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                fmt_nested(&sub, f)?;
            }
            write!(f, "]")
        }
    }
}

impl<E: fmt::Display> fmt::Display for TensorView<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nested(self, f)
    }
}

impl<E: fmt::Display> fmt::Display for TensorViewMut<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nested(&self.as_view(), f)
    }
}

impl<E: fmt::Display> fmt::Display for Tensor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_nested(&self.view(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_one_prints_flat() {
        let t = Tensor::from_vec(vec![1, 2, 3], &[3]).unwrap();
        assert_eq!(t.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn rank_two_prints_nested_rows() {
        let t = Tensor::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3]).unwrap();
        assert_eq!(t.to_string(), "[[1, 2, 3], [4, 5, 6]]");
    }

    #[test]
    fn scalar_view_prints_its_element() {
        let t = Tensor::from_vec(vec![7, 8, 9], &[3]).unwrap();
        let scalar = t.slice_dim(0, 1).unwrap();
        assert_eq!(scalar.to_string(), "8");
    }

    #[test]
    fn strided_views_print_in_index_order() {
        let data = [1, 2, 3, 4];
        let transposed = TensorView::with_strides(&data, &[2, 2], &[1, 2]).unwrap();
        assert_eq!(transposed.to_string(), "[[1, 3], [2, 4]]");
    }

    #[test]
    fn empty_shapes_print_empty_brackets() {
        let t = Tensor::<i32>::zeros(&[0, 3]);
        assert_eq!(t.to_string(), "[]");
    }
}
