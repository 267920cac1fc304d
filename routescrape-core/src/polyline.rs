//! Polyline codec.
//!
//! Routing providers ship route geometry as compact text. Two encodings are
//! supported:
//!
//! - **Encoded polyline** (Mapbox, TomTom): each coordinate is the running
//!   sum of zigzag-encoded deltas, written as 5-bit chunks offset by 63.
//!   Precision is 5 or 6 decimal places and is agreed out of band.
//! - **Flexible polyline** (HERE): same delta scheme over a URL-safe base64
//!   alphabet, preceded by a header that carries the precision and an
//!   optional third dimension.
//!
//! Decoded coordinates are `(lat, lon)` in path order.

use thiserror::Error;

use crate::models::Coordinate;

/// Alphabet used by the flexible polyline format.
const FLEXIBLE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Only flexible polyline version understood by [`decode_flexible`].
const FLEXIBLE_VERSION: u64 = 1;

/// Continuation bit of a 5-bit chunk.
const CONTINUATION: u64 = 0x20;

/// Payload bits of a 5-bit chunk.
const CHUNK_MASK: u64 = 0x1f;

/// Widest shift before a varint would overflow 64 bits.
const MAX_SHIFT: u32 = 60;

// ============================================================================
// Errors
// ============================================================================

/// Error decoding a polyline string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Precision outside of the supported set.
    #[error("Unsupported precision: {0}")]
    UnsupportedPrecision(u32),

    /// A character outside the encoding alphabet.
    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// Byte offset in the input.
        position: usize,
        /// The offending character.
        character: char,
    },

    /// The string ended inside a varint group.
    #[error("Unexpected end of input at position {0}")]
    UnexpectedEnd(usize),

    /// A latitude without its longitude.
    #[error("Latitude at position {0} has no matching longitude")]
    MissingLongitude(usize),

    /// A varint group longer than 64 bits.
    #[error("Value at position {0} overflows")]
    Overflow(usize),

    /// Unknown flexible polyline header version.
    #[error("Unsupported flexible polyline version {0}")]
    UnsupportedVersion(u64),
}

// ============================================================================
// Encoded Polyline
// ============================================================================

fn factor(precision: u32) -> Result<f64, DecodeError> {
    match precision {
        5 => Ok(1e5),
        6 => Ok(1e6),
        other => Err(DecodeError::UnsupportedPrecision(other)),
    }
}

#[allow(clippy::cast_possible_wrap)]
fn zigzag_decode(value: u64) -> i64 {
    let shifted = (value >> 1) as i64;
    if value & 1 == 0 { shifted } else { !shifted }
}

#[allow(clippy::cast_sign_loss)]
fn zigzag_encode(value: i64) -> u64 {
    let shifted = (value << 1) as u64;
    if value < 0 { !shifted } else { shifted }
}

/// Reads one unsigned varint, mapping each byte to its 6-bit value with `digit`.
fn read_varint(
    bytes: &[u8],
    index: &mut usize,
    digit: impl Fn(u8) -> Option<u64>,
) -> Result<u64, DecodeError> {
    let start = *index;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DecodeError::UnexpectedEnd(*index));
        };
        let chunk = digit(byte).ok_or(DecodeError::InvalidCharacter {
            position: *index,
            character: char::from(byte),
        })?;
        *index += 1;

        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow(start));
        }
        result |= (chunk & CHUNK_MASK) << shift;
        shift += 5;

        if chunk & CONTINUATION == 0 {
            return Ok(result);
        }
    }
}

fn polyline_digit(byte: u8) -> Option<u64> {
    (63..=126).contains(&byte).then(|| u64::from(byte - 63))
}

/// Decodes an encoded polyline into `(lat, lon)` coordinates.
///
/// `precision` is the number of decimal places, 5 or 6. An empty string
/// decodes to an empty path.
pub fn decode(encoded: &str, precision: u32) -> Result<Vec<Coordinate>, DecodeError> {
    let factor = factor(precision)?;
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut coords = Vec::new();

    while index < bytes.len() {
        let lat_start = index;
        lat = lat.wrapping_add(zigzag_decode(read_varint(bytes, &mut index, polyline_digit)?));
        if index >= bytes.len() {
            return Err(DecodeError::MissingLongitude(lat_start));
        }
        lon = lon.wrapping_add(zigzag_decode(read_varint(bytes, &mut index, polyline_digit)?));

        #[allow(clippy::cast_precision_loss)]
        coords.push(Coordinate {
            lat: lat as f64 / factor,
            lon: lon as f64 / factor,
        });
    }

    Ok(coords)
}

fn write_varint(mut value: u64, out: &mut String) {
    while value >= CONTINUATION {
        out.push(polyline_char((CONTINUATION | (value & CHUNK_MASK)) + 63));
        value >>= 5;
    }
    out.push(polyline_char(value + 63));
}

fn polyline_char(value: u64) -> char {
    // Callers only pass values in 63..=126.
    char::from(u8::try_from(value).unwrap_or(b'?'))
}

#[allow(clippy::cast_possible_truncation)]
fn scaled(value: f64, factor: f64) -> i64 {
    (value * factor).round() as i64
}

/// Encodes `(lat, lon)` coordinates as an encoded polyline.
pub fn encode(coords: &[Coordinate], precision: u32) -> Result<String, DecodeError> {
    let factor = factor(precision)?;
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for coord in coords {
        let lat = scaled(coord.lat, factor);
        let lon = scaled(coord.lon, factor);
        write_varint(zigzag_encode(lat - prev_lat), &mut out);
        write_varint(zigzag_encode(lon - prev_lon), &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    Ok(out)
}

// ============================================================================
// Flexible Polyline
// ============================================================================

fn flexible_digit(byte: u8) -> Option<u64> {
    FLEXIBLE_ALPHABET
        .iter()
        .position(|&c| c == byte)
        .map(|pos| pos as u64)
}

/// Decodes a HERE flexible polyline into `(lat, lon)` coordinates.
///
/// The precision comes from the header. A third dimension (elevation,
/// level) is parsed and discarded.
pub fn decode_flexible(encoded: &str) -> Result<Vec<Coordinate>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;

    let version = read_varint(bytes, &mut index, flexible_digit)?;
    if version != FLEXIBLE_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let header = read_varint(bytes, &mut index, flexible_digit)?;
    let precision = i32::try_from(header & 0x0f).unwrap_or(0);
    let has_third_dim = (header >> 4) & 0x07 != 0;
    let factor = 10f64.powi(precision);

    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut coords = Vec::new();

    while index < bytes.len() {
        let lat_start = index;
        lat = lat.wrapping_add(zigzag_decode(read_varint(bytes, &mut index, flexible_digit)?));
        if index >= bytes.len() {
            return Err(DecodeError::MissingLongitude(lat_start));
        }
        lon = lon.wrapping_add(zigzag_decode(read_varint(bytes, &mut index, flexible_digit)?));
        if has_third_dim {
            read_varint(bytes, &mut index, flexible_digit)?;
        }

        #[allow(clippy::cast_precision_loss)]
        coords.push(Coordinate {
            lat: lat as f64 / factor,
            lon: lon as f64 / factor,
        });
    }

    Ok(coords)
}

// ============================================================================
// Tests
// ============================================================================
