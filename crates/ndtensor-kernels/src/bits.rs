//! Bitwise, shift, and bit-counting kernels.
//!
//! These operate on raw bit patterns, not numeric values: storage is
//! reinterpreted as unsigned (or, for arithmetic shifts, signed) lanes of
//! the element's byte width. Only 1/2/4/8-byte element types are supported;
//! anything else fails with `UnsupportedElementWidth`. Counting kernels
//! (popcount, leading/trailing zeros) store their count as a raw lane value
//! reinterpreted back into the element type.

use std::mem::size_of;

use bytemuck::Pod;

use crate::element::Element;
use crate::error::{check_dst, check_same_len, KernelError, Result};

fn lane_binary<L: Pod, E: Element>(lhs: &[E], rhs: &[E], dst: &mut [E], op: impl Fn(L, L) -> L) {
    let lhs = bytemuck::cast_slice::<E, L>(lhs);
    let rhs = bytemuck::cast_slice::<E, L>(rhs);
    let dst = bytemuck::cast_slice_mut::<E, L>(dst);
    for ((d, &a), &b) in dst.iter_mut().zip(lhs).zip(rhs) {
        *d = op(a, b);
    }
}

fn lane_unary<L: Pod, E: Element>(x: &[E], dst: &mut [E], op: impl Fn(L) -> L) {
    let x = bytemuck::cast_slice::<E, L>(x);
    let dst = bytemuck::cast_slice_mut::<E, L>(dst);
    for (d, &v) in dst.iter_mut().zip(x) {
        *d = op(v);
    }
}

fn bitwise_binary<E: Element>(
    lhs: &[E],
    rhs: &[E],
    dst: &mut [E],
    op8: impl Fn(u8, u8) -> u8,
    op16: impl Fn(u16, u16) -> u16,
    op32: impl Fn(u32, u32) -> u32,
    op64: impl Fn(u64, u64) -> u64,
) -> Result<()> {
    check_same_len(lhs.len(), rhs.len())?;
    check_dst(lhs.len(), dst.len())?;
    match size_of::<E>() {
        1 => lane_binary(lhs, rhs, dst, op8),
        2 => lane_binary(lhs, rhs, dst, op16),
        4 => lane_binary(lhs, rhs, dst, op32),
        8 => lane_binary(lhs, rhs, dst, op64),
        width => return Err(KernelError::UnsupportedElementWidth { width }),
    }
    Ok(())
}

fn bitwise_unary<E: Element>(
    x: &[E],
    dst: &mut [E],
    op8: impl Fn(u8) -> u8,
    op16: impl Fn(u16) -> u16,
    op32: impl Fn(u32) -> u32,
    op64: impl Fn(u64) -> u64,
) -> Result<()> {
    check_dst(x.len(), dst.len())?;
    match size_of::<E>() {
        1 => lane_unary(x, dst, op8),
        2 => lane_unary(x, dst, op16),
        4 => lane_unary(x, dst, op32),
        8 => lane_unary(x, dst, op64),
        width => return Err(KernelError::UnsupportedElementWidth { width }),
    }
    Ok(())
}

/// Bitwise AND of raw element patterns.
pub fn and<E: Element>(lhs: &[E], rhs: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_binary(lhs, rhs, dst, |a, b| a & b, |a, b| a & b, |a, b| a & b, |a, b| a & b)
}

/// Bitwise OR of raw element patterns.
pub fn or<E: Element>(lhs: &[E], rhs: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_binary(lhs, rhs, dst, |a, b| a | b, |a, b| a | b, |a, b| a | b, |a, b| a | b)
}

/// Bitwise XOR of raw element patterns.
pub fn xor<E: Element>(lhs: &[E], rhs: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_binary(lhs, rhs, dst, |a, b| a ^ b, |a, b| a ^ b, |a, b| a ^ b, |a, b| a ^ b)
}

/// Bitwise complement of raw element patterns.
pub fn not<E: Element>(x: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_unary(x, dst, |a| !a, |a| !a, |a| !a, |a| !a)
}

/// Logical left shift; counts at or beyond the lane width produce zero.
pub fn shift_left<E: Element>(x: &[E], count: u32, dst: &mut [E]) -> Result<()> {
    bitwise_unary(
        x,
        dst,
        move |a| a.checked_shl(count).unwrap_or(0),
        move |a| a.checked_shl(count).unwrap_or(0),
        move |a| a.checked_shl(count).unwrap_or(0),
        move |a| a.checked_shl(count).unwrap_or(0),
    )
}

/// Logical (zero-filling) right shift; oversized counts produce zero.
pub fn shift_right_logical<E: Element>(x: &[E], count: u32, dst: &mut [E]) -> Result<()> {
    bitwise_unary(
        x,
        dst,
        move |a| a.checked_shr(count).unwrap_or(0),
        move |a| a.checked_shr(count).unwrap_or(0),
        move |a| a.checked_shr(count).unwrap_or(0),
        move |a| a.checked_shr(count).unwrap_or(0),
    )
}

fn sar<L>(a: L, count: u32) -> L
where
    L: Copy + PartialOrd + std::ops::Shr<u32, Output = L> + num_traits::Zero,
{
    let bits = 8 * size_of::<L>() as u32;
    if count >= bits {
        // Sign fill: all ones for negative lanes, zero otherwise.
        if a < L::zero() {
            a >> (bits - 1)
        } else {
            L::zero()
        }
    } else {
        a >> count
    }
}

/// Arithmetic (sign-filling) right shift over signed lanes.
pub fn shift_right_arithmetic<E: Element>(x: &[E], count: u32, dst: &mut [E]) -> Result<()> {
    check_dst(x.len(), dst.len())?;
    match size_of::<E>() {
        1 => lane_unary::<i8, E>(x, dst, move |a| sar(a, count)),
        2 => lane_unary::<i16, E>(x, dst, move |a| sar(a, count)),
        4 => lane_unary::<i32, E>(x, dst, move |a| sar(a, count)),
        8 => lane_unary::<i64, E>(x, dst, move |a| sar(a, count)),
        width => return Err(KernelError::UnsupportedElementWidth { width }),
    }
    Ok(())
}

/// Population count of each element's bit pattern, stored as a raw lane.
pub fn popcount<E: Element>(x: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_unary(
        x,
        dst,
        |a| a.count_ones() as u8,
        |a| a.count_ones() as u16,
        |a| a.count_ones() as u32,
        |a| a.count_ones() as u64,
    )
}

/// Leading-zero count of each element's bit pattern.
pub fn leading_zeros<E: Element>(x: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_unary(
        x,
        dst,
        |a| a.leading_zeros() as u8,
        |a| a.leading_zeros() as u16,
        |a| a.leading_zeros() as u32,
        |a| a.leading_zeros() as u64,
    )
}

/// Trailing-zero count of each element's bit pattern.
pub fn trailing_zeros<E: Element>(x: &[E], dst: &mut [E]) -> Result<()> {
    bitwise_unary(
        x,
        dst,
        |a| a.trailing_zeros() as u8,
        |a| a.trailing_zeros() as u16,
        |a| a.trailing_zeros() as u32,
        |a| a.trailing_zeros() as u64,
    )
}
