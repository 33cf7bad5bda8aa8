use core::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Error, Layout, Result, SnowflakeId, SnowflakeResolvable};

/// A deconstructed identifier: the packed value plus every decoded field.
///
/// Purely derived data, recomputed on demand by [`deconstruct`]; nothing here
/// can go stale relative to the identifier it was decoded from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snowflake {
    /// The packed identifier.
    pub id: SnowflakeId,
    /// Millisecond timestamp (epoch plus the encoded delta).
    pub timestamp: u64,
    /// The worker/shard id encoded in the identifier.
    pub worker_id: u64,
    /// The process id encoded in the identifier. Zero for layouts without a
    /// process field.
    pub process_id: u64,
    /// The per-millisecond sequence number.
    pub sequence: u64,
}

impl Snowflake {
    /// The identifier's binary digit string, left-padded to the layout's
    /// total width.
    pub fn binary(&self) -> &str {
        self.id.as_binary()
    }

    /// The encoded timestamp as a [`SystemTime`].
    pub fn date(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Splits an identifier back into its component fields.
///
/// Pure: reads only its arguments and mutates nothing. The identifier may be
/// any exact integer form accepted by [`SnowflakeResolvable`] — a decimal
/// string, a native integer, or a [`SnowflakeId`]. Values shorter than the
/// layout's total width are implicitly left-zero-padded; a bare sequence
/// number is a valid, if unusual, identifier.
///
/// # Example
/// ```
/// use cryoid::{Layout, deconstruct};
///
/// let layout = Layout::sharded64();
/// // timestamp delta 1, shard 3, sequence 7
/// let packed = (1u64 << 23) | (3 << 10) | 7;
/// let flake = deconstruct(1_577_836_800_000, &layout, packed).unwrap();
/// assert_eq!(flake.timestamp, 1_577_836_800_001);
/// assert_eq!(flake.worker_id, 3);
/// assert_eq!(flake.sequence, 7);
/// ```
///
/// # Errors
///
/// Returns a format error when the input cannot be parsed as a non-negative
/// integer ([`Error::EmptyId`], [`Error::InvalidDigit`]), needs more bits
/// than the layout's total width ([`Error::IdTooWide`]), or decodes a
/// timestamp past `u64::MAX` ([`Error::TimestampOverflow`]).
pub fn deconstruct<R>(epoch: u64, layout: &Layout, id: R) -> Result<Snowflake>
where
    R: SnowflakeResolvable,
{
    let id = id.resolve()?;
    let total_bits = layout.total_bits() as usize;
    if id.bit_len() > total_bits {
        return Err(Error::IdTooWide {
            bit_len: id.bit_len(),
            total_bits: layout.total_bits(),
        });
    }

    let bits = pad_to_width(id.as_binary(), total_bits);
    let delta = extract(&bits, layout.timestamp_shift(), layout.timestamp_bits());
    let worker_id = extract(&bits, layout.worker_shift(), layout.worker_bits());
    let process_id = extract(&bits, layout.process_shift(), layout.process_bits());
    let sequence = extract(&bits, layout.sequence_shift(), layout.sequence_bits());

    let timestamp = epoch
        .checked_add(delta)
        .ok_or(Error::TimestampOverflow { delta, epoch })?;

    let id = SnowflakeId::from_parts(bits, id.as_decimal().to_owned());
    Ok(Snowflake {
        id,
        timestamp,
        worker_id,
        process_id,
        sequence,
    })
}

/// Left-pads (or re-trims an over-padded value down) to exactly `width`
/// binary digits.
fn pad_to_width(binary: &str, width: usize) -> String {
    match binary.len().cmp(&width) {
        core::cmp::Ordering::Equal => binary.to_owned(),
        core::cmp::Ordering::Less => {
            let mut padded = String::with_capacity(width);
            for _ in 0..(width - binary.len()) {
                padded.push('0');
            }
            padded.push_str(binary);
            padded
        }
        // Only padding can exceed the width; significant bits were checked.
        core::cmp::Ordering::Greater => binary[binary.len() - width..].to_owned(),
    }
}

/// Reads the field at `shift`/`width` (offsets from the LSB) out of a binary
/// digit string.
fn extract(bits: &str, shift: u32, width: u32) -> u64 {
    if width == 0 {
        return 0;
    }
    let end = bits.len() - shift as usize;
    let start = end - width as usize;
    u64::from_str_radix(&bits[start..end], 2).expect("validated binary digits")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const EPOCH: u64 = 1_577_836_800_000;

    #[test]
    fn accepts_decimal_strings_and_integers() {
        let layout = Layout::sharded64();
        let packed = (5u64 << 23) | (1 << 10) | 42;

        let from_int = deconstruct(EPOCH, &layout, packed).unwrap();
        let from_str = deconstruct(EPOCH, &layout, packed.to_string()).unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int.timestamp, EPOCH + 5);
        assert_eq!(from_int.sequence, 42);
    }

    #[test]
    fn short_values_are_left_zero_padded() {
        let layout = Layout::sharded64();
        let flake = deconstruct(0, &layout, 9u64).unwrap();
        assert_eq!(flake.binary().len(), 64);
        assert_eq!(flake.sequence, 9);
        assert_eq!(flake.timestamp, 0);
        assert_eq!(flake.worker_id, 0);
    }

    #[test]
    fn process_field_is_decoded_when_present() {
        let layout = Layout::classic64();
        let packed = (7u64 << 22) | (2 << 17) | (3 << 12) | 1;
        let flake = deconstruct(EPOCH, &layout, packed).unwrap();
        assert_eq!(flake.timestamp, EPOCH + 7);
        assert_eq!(flake.worker_id, 2);
        assert_eq!(flake.process_id, 3);
        assert_eq!(flake.sequence, 1);
    }

    #[test]
    fn overwide_values_are_rejected() {
        let layout = Layout::sharded64();
        let err = deconstruct(EPOCH, &layout, u128::from(u64::MAX) + 1).unwrap_err();
        assert_eq!(
            err,
            Error::IdTooWide {
                bit_len: 65,
                total_bits: 64
            }
        );
    }

    #[test]
    fn malformed_strings_are_rejected() {
        let layout = Layout::sharded64();
        assert_eq!(
            deconstruct(EPOCH, &layout, "12abc"),
            Err(Error::InvalidDigit { ch: 'a' })
        );
        assert_eq!(deconstruct(EPOCH, &layout, ""), Err(Error::EmptyId));
        assert_eq!(
            deconstruct(EPOCH, &layout, "-5"),
            Err(Error::InvalidDigit { ch: '-' })
        );
    }

    #[test]
    fn date_derives_from_the_timestamp() {
        let layout = Layout::sharded64();
        let packed = (1_000u64 << 23) | (1 << 10);
        let flake = deconstruct(EPOCH, &layout, packed).unwrap();
        assert_eq!(
            flake.date(),
            UNIX_EPOCH + Duration::from_millis(EPOCH + 1_000)
        );
    }

    #[test]
    fn wide_identifiers_decode_past_native_range() {
        // 160-bit layout: the packed value cannot fit any native integer.
        let layout = Layout::new(160, 64, 16, 16, 32).unwrap();
        let bits = layout.pack(u64::MAX, 513, 9, 77);
        let id = SnowflakeId::from_binary(&bits).unwrap();
        let flake = deconstruct(0, &layout, &id).unwrap();
        assert_eq!(flake.timestamp, u64::MAX);
        assert_eq!(flake.worker_id, 513);
        assert_eq!(flake.process_id, 9);
        assert_eq!(flake.sequence, 77);
    }
}
