//! Base-2^15 packing of bit strings into printable text.
//!
//! Layout of an encoded string:
//!   symbol[0]   = pad length as one lowercase hex digit (`0`..`e`)
//!   symbol[1..] = one char per 15-bit group, value + 0xA1, group bits MSB-first
//!
//! The final group is zero-padded on the right; the pad digit says by how much.
//! Builder and reader may live in different runtimes, so every constant here is
//! part of the wire format.

use bitvec::prelude::*;

use crate::bits::{bits_to_uint, push_uint, Bits};
use crate::consts::{GROUP_BITS, GROUP_MAX, SYMBOL_OFFSET};
use crate::errors::{Result, SthirError};

#[inline]
fn pad_for(len: usize) -> usize {
    (GROUP_BITS - len % GROUP_BITS) % GROUP_BITS
}

#[inline]
fn symbol_for(group: u32) -> char {
    match char::from_u32(group + SYMBOL_OFFSET) {
        Some(c) => c,
        None => unreachable!("group {group:#x} maps below the surrogate block"),
    }
}

#[inline]
fn group_of(position: usize, symbol: char) -> Result<u32> {
    let v = symbol as u32;
    if v < SYMBOL_OFFSET || v - SYMBOL_OFFSET > GROUP_MAX {
        return Err(SthirError::BadSymbol { position, symbol });
    }
    Ok(v - SYMBOL_OFFSET)
}

fn pad_of(symbol: char) -> Result<usize> {
    match symbol.to_digit(16) {
        Some(p) if (p as usize) < GROUP_BITS => Ok(p as usize),
        _ => Err(SthirError::BadPad(symbol)),
    }
}

pub fn encode(bits: &BitSlice<u8, Msb0>) -> String {
    let pad = pad_for(bits.len());
    let mut out = String::with_capacity(1 + 3 * bits.len().div_ceil(GROUP_BITS));
    out.push(symbol_for_pad(pad));
    for group in bits.chunks(GROUP_BITS) {
        let v = bits_to_uint(group) << (GROUP_BITS - group.len());
        out.push(symbol_for(v));
    }
    out
}

#[inline]
fn symbol_for_pad(pad: usize) -> char {
    match char::from_digit(pad as u32, 16) {
        Some(c) => c,
        None => unreachable!("pad {pad} is below 15"),
    }
}

pub fn decode(text: &str) -> Result<Bits> {
    let mut symbols = text.chars();
    let pad = pad_of(symbols.next().ok_or(SthirError::EmptyEncoding)?)?;
    let mut out = Bits::new();
    for (i, s) in symbols.enumerate() {
        push_uint(&mut out, group_of(i + 1, s)?, GROUP_BITS);
    }
    if out.is_empty() {
        if pad != 0 {
            return Err(SthirError::MissingGroups { pad: pad as u32 });
        }
        return Ok(out);
    }
    let len = out.len() - pad;
    if out[len..].any() {
        return Err(SthirError::DirtyPadding);
    }
    out.truncate(len);
    Ok(out)
}

/// Number of payload bits in `text`, without decoding any group.
pub fn bit_length(text: &str) -> Result<usize> {
    let mut symbols = text.chars();
    let pad = pad_of(symbols.next().ok_or(SthirError::EmptyEncoding)?)?;
    let groups = symbols.count();
    if groups == 0 && pad != 0 {
        return Err(SthirError::MissingGroups { pad: pad as u32 });
    }
    Ok(groups * GROUP_BITS - pad)
}

/// Decodes bits `start..end` by touching only the groups that cover them.
pub fn get_range(text: &str, start: usize, end: usize) -> Result<Bits> {
    let len = bit_length(text)?;
    if start >= end || end > len {
        return Err(SthirError::OutOfRange { start, end, len });
    }
    let first = start / GROUP_BITS;
    let last = (end - 1) / GROUP_BITS;

    let mut window = Bits::with_capacity((last - first + 1) * GROUP_BITS);
    for (i, s) in text.chars().enumerate().skip(1 + first).take(last - first + 1) {
        push_uint(&mut window, group_of(i, s)?, GROUP_BITS);
    }
    let base = first * GROUP_BITS;
    Ok(window[start - base..end - base].to_bitvec())
}
