use thiserror::Error;

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `cryoid` can emit.
///
/// Variants fall into three groups:
///
/// - **Configuration**: the bit layout or epoch cannot produce valid IDs
///   ([`Error::ZeroWidthField`], [`Error::FieldTooWide`],
///   [`Error::LayoutOverflow`], [`Error::EpochExhausted`]). Raised at layout
///   construction or at generation time.
/// - **Range**: a caller asked for an impossible batch size
///   ([`Error::InvalidAmount`]).
/// - **Format**: an input could not be parsed into a non-negative integer of
///   the configured width ([`Error::EmptyId`], [`Error::InvalidDigit`],
///   [`Error::IdTooWide`], [`Error::TimestampOverflow`]).
///
/// Every error is synchronous and fatal only to the call that raised it. A
/// failed call never mutates generator state, so subsequent calls are
/// unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A field in the bit layout was configured with zero width.
    #[error("bit layout field `{field}` must have a non-zero width")]
    ZeroWidthField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field in the bit layout was configured wider than 64 bits.
    ///
    /// Field values are `u64` scalars; only the packed identifier itself may
    /// exceed 64 (or 128) bits.
    #[error("bit layout field `{field}` is {bits} bits wide, the maximum is 64")]
    FieldTooWide {
        /// Name of the offending field.
        field: &'static str,
        /// The configured width.
        bits: u32,
    },

    /// The field widths sum to more than the total identifier width.
    #[error("bit layout uses {used_bits} bits but the total width is {total_bits}")]
    LayoutOverflow {
        /// The configured total width.
        total_bits: u32,
        /// The sum of all field widths.
        used_bits: u32,
    },

    /// The timestamp delta no longer fits the timestamp field.
    ///
    /// The generator's epoch is too far in the past for the configured
    /// timestamp width; the operator must rotate to a more recent epoch.
    #[error(
        "timestamp {timestamp} exceeds the maximum encodable timestamp \
         {max_timestamp}; rotate the generator epoch"
    )]
    EpochExhausted {
        /// The millisecond timestamp that failed to encode.
        timestamp: u64,
        /// The largest encodable millisecond timestamp.
        max_timestamp: u64,
    },

    /// A batch generation was requested with an amount below 1.
    #[error("invalid amount {amount}, must be 1 or greater")]
    InvalidAmount {
        /// The requested amount.
        amount: usize,
    },

    /// An identifier string was empty.
    #[error("empty identifier")]
    EmptyId,

    /// An identifier string contained a character outside its radix.
    #[error("invalid digit {ch:?} in identifier")]
    InvalidDigit {
        /// The offending character.
        ch: char,
    },

    /// An identifier's value needs more bits than the configured total width.
    #[error("identifier needs {bit_len} bits but the total width is {total_bits}")]
    IdTooWide {
        /// Significant bits in the identifier value.
        bit_len: usize,
        /// The configured total width.
        total_bits: u32,
    },

    /// A decoded timestamp delta overflowed when added to the epoch.
    #[error("timestamp delta {delta} plus epoch {epoch} overflows a u64")]
    TimestampOverflow {
        /// The decoded timestamp delta in milliseconds.
        delta: u64,
        /// The epoch the delta is relative to.
        epoch: u64,
    },
}
