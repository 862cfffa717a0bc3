//! Bit-string helpers shared by the codec and the filter.
//!
//! Bits are always most-significant first: the first bit of a counter or a
//! packed group is its highest bit. The textual `"0101"` form is what other
//! runtimes exchange with us, so it gets first-class parse/render functions.

use bitvec::prelude::*;

use crate::errors::{Result, SthirError};

pub type Bits = BitVec<u8, Msb0>;

pub fn parse_bits(s: &str) -> Result<Bits> {
    let mut out = Bits::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '0' => out.push(false),
            '1' => out.push(true),
            other => return Err(SthirError::BadBitChar(other)),
        }
    }
    Ok(out)
}

pub fn bits_to_string(bits: &BitSlice<u8, Msb0>) -> String {
    bits.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
}

/// Reads at most 32 bits as an unsigned integer, first bit highest.
#[inline]
pub fn bits_to_uint(bits: &BitSlice<u8, Msb0>) -> u32 {
    debug_assert!(bits.len() <= 32);
    bits.iter().by_vals().fold(0u32, |acc, b| (acc << 1) | b as u32)
}

/// Appends the low `width` bits of `value`, highest first.
#[inline]
pub fn push_uint(out: &mut Bits, value: u32, width: usize) {
    for shift in (0..width).rev() {
        out.push((value >> shift) & 1 == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_form_roundtrips() {
        let b = parse_bits("0010110").unwrap();
        assert_eq!(b.len(), 7);
        assert_eq!(bits_to_string(&b), "0010110");
        assert_eq!(bits_to_string(&parse_bits("").unwrap()), "");
    }

    #[test]
    fn rejects_non_binary_chars() {
        assert!(matches!(parse_bits("0120"), Err(SthirError::BadBitChar('2'))));
    }

    #[test]
    fn uint_is_msb_first() {
        let mut b = Bits::new();
        push_uint(&mut b, 5, 4);
        assert_eq!(bits_to_string(&b), "0101");
        assert_eq!(bits_to_uint(&b), 5);
        push_uint(&mut b, 0x3FF, 10);
        assert_eq!(bits_to_uint(&b[4..]), 0x3FF);
    }
}
