//! Property-based tests over randomly generated shapes and layouts.

use proptest::prelude::*;

use crate::layout;
use crate::tensor::Tensor;
use crate::transform;

fn shape_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..6, 1..=4)
}

fn tensor_strategy() -> impl Strategy<Value = Tensor<i64>> {
    shape_strategy().prop_map(|dims| {
        let len = layout::flat_len(&dims);
        Tensor::from_vec((0..len as i64).collect(), &dims).unwrap()
    })
}

proptest! {
    #[test]
    fn canonical_strides_are_always_contiguous(dims in shape_strategy()) {
        let strides = layout::contiguous_strides(&dims);
        prop_assert!(layout::is_contiguous(&dims, &strides));
        prop_assert_eq!(
            layout::required_span(&dims, &strides),
            layout::flat_len(&dims)
        );
    }

    #[test]
    fn flat_indexing_covers_the_range_bijectively(dims in shape_strategy()) {
        let strides = layout::contiguous_strides(&dims);
        let len = layout::flat_len(&dims);
        let mut seen = vec![false; len];
        let mut coord = layout::Dims::new();
        for flat in 0..len {
            layout::unravel_index_into(flat, &dims, &mut coord);
            let index = layout::flat_index(&strides, &coord).unwrap();
            prop_assert!(index < len);
            prop_assert!(!seen[index]);
            seen[index] = true;
        }
    }

    #[test]
    fn reshape_roundtrips_content(t in tensor_strategy()) {
        let original = t.dims().to_vec();
        let flat = t.reshape(&[t.flat_len()]).unwrap();
        let back = flat.reshape(&original).unwrap();
        prop_assert!(back.item_eq(&t));
    }

    #[test]
    fn permute_inverts(t in tensor_strategy()) {
        let rank = t.rank();
        let order: Vec<usize> = (0..rank).rev().collect();
        let mut inverse = vec![0usize; rank];
        for (d, &axis) in order.iter().enumerate() {
            inverse[axis] = d;
        }
        let permuted = t.permute(&order).unwrap();
        let back = permuted.permute(&inverse).unwrap();
        prop_assert!(back.item_eq(&t));
    }

    #[test]
    fn reverse_is_an_involution(t in tensor_strategy()) {
        let back = t.reverse().unwrap().reverse().unwrap();
        prop_assert!(back.item_eq(&t));
    }

    #[test]
    fn split_concat_roundtrips(t in tensor_strategy(), raw_dim in 0usize..4, count in 1usize..4) {
        let dim = raw_dim % t.rank();
        prop_assume!(t.dims()[dim] % count == 0);
        let parts = transform::split(&t, count, dim).unwrap();
        let back = transform::concat(&parts, dim).unwrap();
        prop_assert!(back.item_eq(&t));
    }

    #[test]
    fn squeeze_preserves_content_in_order(dims in shape_strategy()) {
        let len = layout::flat_len(&dims);
        let t = Tensor::from_vec((0..len as i64).collect(), &dims).unwrap();
        let squeezed = t.squeeze();
        prop_assert_eq!(squeezed.flat_len(), len);
        let a = t.reshape(&[len]).unwrap();
        let b = squeezed.reshape(&[len]).unwrap();
        prop_assert!(a.item_eq(&b));
    }

    #[test]
    fn broadcast_union_is_commutative(a in shape_strategy(), b in shape_strategy()) {
        let left = crate::broadcast::broadcast_dims(&a, &b);
        let right = crate::broadcast::broadcast_dims(&b, &a);
        match (left, right) {
            (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "union succeeded in one direction only"),
        }
    }
}
