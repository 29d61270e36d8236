use core::fmt::Debug;

use num_traits::{Float, PrimInt, Unsigned};

/// Real-valued reliability: the sign carries the hard decision, the magnitude the confidence.
pub trait SoftValue: Float + Debug + Default + Send + Sync + 'static {}

impl<T> SoftValue for T where T: Float + Debug + Default + Send + Sync + 'static {}

/// Hard decision storage. Only `0` and `1` are ever written.
pub trait HardBit: PrimInt + Unsigned + Debug + Default + Send + Sync + 'static {}

impl<T> HardBit for T where T: PrimInt + Unsigned + Debug + Default + Send + Sync + 'static {}

#[inline]
#[must_use]
pub fn bit<B: HardBit>(one: bool) -> B {
    if one { B::one() } else { B::zero() }
}

/// Negative values (including `-0.0`) decide to `1`.
#[inline]
#[must_use]
pub fn hard_bit<B: HardBit, R: SoftValue>(value: R) -> B {
    bit(value.is_sign_negative())
}

pub fn hard_decide<B: HardBit, R: SoftValue>(soft: &[R], hard: &mut [B]) {
    for (h, &s) in hard.iter_mut().zip(soft) {
        *h = hard_bit(s);
    }
}

/// Even parity over `bits`.
#[must_use]
pub fn compute_parity<B: HardBit>(bits: &[B]) -> B {
    bits.iter().fold(B::zero(), |acc, &b| acc ^ b)
}
