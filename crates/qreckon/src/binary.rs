//! Bit-level helpers on integer-encoded outcomes.

/// Parity bit of `integer`.
///
/// With `even = true` this is the bit that makes the total number of ones
/// even, i.e. `popcount mod 2`. With `even = false` it is the complement.
#[inline]
pub fn parity_bit(integer: u64, even: bool) -> u8 {
    let odd_ones = (integer.count_ones() & 1) as u8;
    if even { odd_ones } else { odd_ones ^ 1 }
}

/// The binary digit of `integer` at `place` (0 = least significant).
///
/// Places beyond the width of `u64` read as zero.
#[inline]
pub fn binary_digit(integer: u64, place: u32) -> u8 {
    integer.checked_shr(place).map_or(0, |v| (v & 1) as u8)
}
