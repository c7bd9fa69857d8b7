//! Wide integer math for bonding-curve arithmetic
//!
//! Products of two 18-decimal amounts exceed `u128`, so `a * b / c`
//! expressions go through a 256-bit intermediate. Division rounds down.

/// Full 128x128 -> 256 bit multiplication, returned as (hi, lo)
fn full_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;

    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let (mid, mid_carry) = lh.overflowing_add(hl);
    let (lo, lo_carry) = ll.overflowing_add(mid << 64);

    let hi = hh
        + ((mid_carry as u128) << 64)
        + (mid >> 64)
        + lo_carry as u128;

    (hi, lo)
}

/// Divide the 256-bit value (hi, lo) by `divisor`
///
/// Returns `None` when the divisor is zero or the quotient does not fit
/// in 128 bits. Bitwise long division; the remainder always fits in
/// `u128` because it stays below the divisor.
fn div_256_by_128(hi: u128, lo: u128, divisor: u128) -> Option<u128> {
    if divisor == 0 {
        return None;
    }
    if hi == 0 {
        return Some(lo / divisor);
    }
    if hi >= divisor {
        // quotient >= 2^128
        return None;
    }

    let mut quotient: u128 = 0;
    let mut rem: u128 = hi;
    for i in (0..128).rev() {
        let bit = (lo >> i) & 1;
        let carry = rem >> 127;
        rem = (rem << 1) | bit;
        let mut q_bit = 0u128;
        if carry == 1 || rem >= divisor {
            rem = rem.wrapping_sub(divisor);
            q_bit = 1;
        }
        quotient = (quotient << 1) | q_bit;
    }
    Some(quotient)
}

/// Compute `a * b / c` with a 256-bit intermediate, rounding down
pub fn mul_div(a: u128, b: u128, c: u128) -> Option<u128> {
    let (hi, lo) = full_mul(a, b);
    div_256_by_128(hi, lo, c)
}
