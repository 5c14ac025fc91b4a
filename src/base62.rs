//! Fixed-width, big-endian base-62 integers using `0-9`, `A-Z`, `a-z`.
//!
//! The digit alphabet is in ASCII order, so equal-width strings compare
//! bytewise exactly as their values compare numerically.

use crate::error::{Error, Result};

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[inline]
fn to_digit(n: u64) -> u8 {
    usize::try_from(n % 62).map_or(b'0', |i| ALPHABET[i])
}

#[inline]
fn from_digit(c: char) -> Result<u64> {
    let code = u64::from(c);
    let v = match c {
        '0'..='9' => code - u64::from('0'),
        'A'..='Z' => code - u64::from('A') + 10,
        'a'..='z' => code - u64::from('a') + 36,
        _ => {
            return Err(Error::InvalidCharacter {
                character: c,
                context: "base-62 digit",
            })
        }
    };
    Ok(v)
}

/// Append `n` as exactly `digits` base-62 characters.
pub fn encode_into(mut n: u64, digits: usize, out: &mut String) -> Result<()> {
    let value = n;
    let mut buf = vec![b'0'; digits];
    for slot in buf.iter_mut().rev() {
        *slot = to_digit(n);
        n /= 62;
    }
    if n != 0 {
        return Err(Error::ValueTooLarge { value, digits });
    }
    out.extend(buf.into_iter().map(char::from));
    Ok(())
}

pub fn encode(n: u64, digits: usize) -> Result<String> {
    let mut s = String::with_capacity(digits);
    encode_into(n, digits, &mut s)?;
    Ok(s)
}

pub fn decode(s: &str) -> Result<u64> {
    let mut n: u64 = 0;
    for c in s.chars() {
        let d = from_digit(c)?;
        n = n
            .checked_mul(62)
            .and_then(|m| m.checked_add(d))
            .ok_or(Error::ValueTooLarge {
                value: u64::MAX,
                digits: s.len(),
            })?;
    }
    Ok(n)
}
