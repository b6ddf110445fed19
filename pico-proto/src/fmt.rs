//! No-std number formatting for protocol serialization.
//!
//! Values are written straight into byte buffers without heap allocation or
//! `core::fmt` float machinery.

/// Longest output of [`write_u32`]: "4294967295".
pub const MAX_U32_LEN: usize = 10;

/// Longest output of [`write_fixed3`]: "-2147483.648".
pub const MAX_FIXED3_LEN: usize = 12;

/// Write a u32 as an unsigned decimal string.
///
/// Returns the number of bytes written (1-10 bytes).
///
/// # Panics
///
/// Panics if `buf` is shorter than the number of digits.
#[inline]
pub fn write_u32(buf: &mut [u8], value: u32) -> usize {
    if value == 0 {
        buf[0] = b'0';
        return 1;
    }

    // Digits come out least significant first
    let mut temp = [0u8; MAX_U32_LEN];
    let mut n = value;
    let mut len = 0;
    while n > 0 {
        temp[len] = b'0' + (n % 10) as u8;
        n /= 10;
        len += 1;
    }

    for i in 0..len {
        buf[i] = temp[len - 1 - i];
    }

    len
}

/// Write a value given in thousandths as a decimal with exactly three
/// fractional digits (`-500` becomes `-0.500`).
///
/// Returns the number of bytes written.
///
/// # Panics
///
/// Panics if `buf.len() < MAX_FIXED3_LEN` and the value needs the room.
#[inline]
pub fn write_fixed3(buf: &mut [u8], milli: i32) -> usize {
    if milli < 0 {
        buf[0] = b'-';
        1 + write_unsigned_fixed3(&mut buf[1..], milli.unsigned_abs())
    } else {
        write_unsigned_fixed3(buf, milli.unsigned_abs())
    }
}

/// Unsigned variant of [`write_fixed3`] (`1500` becomes `1.500`).
#[inline]
pub fn write_unsigned_fixed3(buf: &mut [u8], milli: u32) -> usize {
    let mut pos = write_u32(buf, milli / 1000);
    buf[pos] = b'.';
    pos += 1;

    let frac = milli % 1000;
    buf[pos] = b'0' + (frac / 100) as u8;
    buf[pos + 1] = b'0' + ((frac / 10) % 10) as u8;
    buf[pos + 2] = b'0' + (frac % 10) as u8;
    pos + 3
}

/// Convert a float to thousandths, rounding half away from zero.
///
/// Returns `None` for NaN, infinities, and values outside the `i32` range.
#[inline]
#[must_use]
pub fn to_milli(value: f32) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let scaled = value * 1000.0;
    if scaled >= i32::MAX as f32 || scaled <= i32::MIN as f32 {
        return None;
    }
    let rounded = if scaled >= 0.0 {
        scaled + 0.5
    } else {
        scaled - 0.5
    };
    // Float-to-int casts truncate toward zero, which completes the rounding
    Some(rounded as i32)
}
