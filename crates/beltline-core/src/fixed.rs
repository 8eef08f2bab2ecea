use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// `numerator / denominator` as a Fixed64, truncated toward zero. Zero when
/// the denominator is zero; saturates at `Fixed64::MAX`.
///
/// Counts may exceed the 31 integer bits of `Fixed64`, so the division runs
/// on the raw bits in `u128` and only the result is converted.
#[inline]
pub fn ratio(numerator: u64, denominator: u64) -> Fixed64 {
    if denominator == 0 {
        return Fixed64::ZERO;
    }
    let (num, den) = (u128::from(numerator), u128::from(denominator));
    let whole = num / den;
    if whole > i32::MAX as u128 {
        return Fixed64::MAX;
    }
    let frac = ((num % den) << Fixed64::FRAC_NBITS) / den;
    Fixed64::from_bits(((whole << Fixed64::FRAC_NBITS) | frac) as i64)
}

/// Convert Fixed64 to f64. Use only for display, never in the sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}
