use core::fmt::Write as _;

use crate::{Error, Result};

/// A bit-width assignment for the fields packed into an identifier.
///
/// Fields are packed from **MSB to LSB**: timestamp delta, worker id, process
/// id, sequence. Any bits above the timestamp field (when the field widths sum
/// to less than the total width) are zero padding.
///
/// ```text
///  Bit Index:  high bits                                        low bits
///              +---------+-----------+--------+---------+--------------+
///  Field:      | pad (*) | delta (E) | wk (W) | pid (P) | sequence (S) |
///              +---------+-----------+--------+---------+--------------+
///              |<------------ MSB -- total bits -- LSB ------------->|
/// ```
///
/// A layout is validated once at construction and immutable afterwards. The
/// two historical layouts are available as presets ([`Layout::sharded64`] and
/// [`Layout::classic64`]); both are ordinary configurations of this one type.
///
/// # Example
/// ```
/// use cryoid::Layout;
///
/// let layout = Layout::new(64, 42, 5, 5, 12).unwrap();
/// assert_eq!(layout.max_worker(), 31);
/// assert_eq!(layout.max_sequence(), 4095);
/// assert_eq!(layout.timestamp_shift(), 22);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    total_bits: u32,
    timestamp_bits: u32,
    worker_bits: u32,
    process_bits: u32,
    sequence_bits: u32,
}

impl Layout {
    /// Builds and validates a layout.
    ///
    /// The timestamp, worker and sequence fields must be at least 1 bit wide;
    /// the process field may be 0 bits wide (folded into the worker field, as
    /// in [`Layout::sharded64`]). No field may exceed 64 bits, and the field
    /// widths must not sum past `total_bits`. The total width itself is
    /// unbounded: layouts wider than 128 bits are packed through the
    /// arbitrary-precision codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroWidthField`], [`Error::FieldTooWide`] or
    /// [`Error::LayoutOverflow`] when the widths are unusable.
    pub fn new(
        total_bits: u32,
        timestamp_bits: u32,
        worker_bits: u32,
        process_bits: u32,
        sequence_bits: u32,
    ) -> Result<Self> {
        for (field, bits) in [
            ("total_bits", total_bits),
            ("timestamp_bits", timestamp_bits),
            ("worker_bits", worker_bits),
            ("sequence_bits", sequence_bits),
        ] {
            if bits == 0 {
                return Err(Error::ZeroWidthField { field });
            }
        }
        for (field, bits) in [
            ("timestamp_bits", timestamp_bits),
            ("worker_bits", worker_bits),
            ("process_bits", process_bits),
            ("sequence_bits", sequence_bits),
        ] {
            if bits > 64 {
                return Err(Error::FieldTooWide { field, bits });
            }
        }
        let layout = Self {
            total_bits,
            timestamp_bits,
            worker_bits,
            process_bits,
            sequence_bits,
        };
        if layout.used_bits() > total_bits {
            return Err(Error::LayoutOverflow {
                total_bits,
                used_bits: layout.used_bits(),
            });
        }
        Ok(layout)
    }

    /// The fixed 64-bit layout: 41-bit timestamp delta, 13-bit shard id (no
    /// separate process field), 10-bit sequence.
    ///
    /// ```text
    ///  Bit Index:  63             23 22           10 9              0
    ///              +----------------+---------------+---------------+
    ///  Field:      | timestamp (41) | shard id (13) | sequence (10) |
    ///              +----------------+---------------+---------------+
    ///              |<----- MSB --------- 64 bits -------- LSB ----->|
    /// ```
    pub const fn sharded64() -> Self {
        Self {
            total_bits: 64,
            timestamp_bits: 41,
            worker_bits: 13,
            process_bits: 0,
            sequence_bits: 10,
        }
    }

    /// The configurable variant's historical default layout: 42-bit timestamp
    /// delta, 5-bit worker id, 5-bit process id, 12-bit sequence.
    ///
    /// ```text
    ///  Bit Index:  63             22 21   17 16   12 11             0
    ///              +----------------+-------+-------+---------------+
    ///  Field:      | timestamp (42) | wk (5)| pid(5)| sequence (12) |
    ///              +----------------+-------+-------+---------------+
    ///              |<----- MSB --------- 64 bits --------- LSB ---->|
    /// ```
    pub const fn classic64() -> Self {
        Self {
            total_bits: 64,
            timestamp_bits: 42,
            worker_bits: 5,
            process_bits: 5,
            sequence_bits: 12,
        }
    }

    /// Total identifier width in bits.
    pub const fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// Width of the timestamp-delta field.
    pub const fn timestamp_bits(&self) -> u32 {
        self.timestamp_bits
    }

    /// Width of the worker/shard-id field.
    pub const fn worker_bits(&self) -> u32 {
        self.worker_bits
    }

    /// Width of the process-id field. Zero when the layout folds the process
    /// id into the worker field.
    pub const fn process_bits(&self) -> u32 {
        self.process_bits
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(&self) -> u32 {
        self.sequence_bits
    }

    /// Sum of all field widths.
    pub const fn used_bits(&self) -> u32 {
        self.timestamp_bits + self.worker_bits + self.process_bits + self.sequence_bits
    }

    /// Largest encodable timestamp delta.
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    /// Largest encodable worker id.
    pub const fn max_worker(&self) -> u64 {
        mask(self.worker_bits)
    }

    /// Largest encodable process id. Zero for layouts without a process field.
    pub const fn max_process(&self) -> u64 {
        mask(self.process_bits)
    }

    /// Largest encodable sequence value. The per-millisecond counter wraps to
    /// zero past this value, rolling the timestamp forward.
    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    /// Bit offset of the sequence field (always 0).
    pub const fn sequence_shift(&self) -> u32 {
        0
    }

    /// Bit offset of the process-id field.
    pub const fn process_shift(&self) -> u32 {
        self.sequence_bits
    }

    /// Bit offset of the worker-id field.
    pub const fn worker_shift(&self) -> u32 {
        self.sequence_bits + self.process_bits
    }

    /// Bit offset of the timestamp-delta field.
    pub const fn timestamp_shift(&self) -> u32 {
        self.sequence_bits + self.process_bits + self.worker_bits
    }

    /// Packs pre-masked field values into a binary digit string of exactly
    /// [`Layout::total_bits`] characters.
    ///
    /// Callers must mask each value to its field width first; packing itself
    /// never truncates.
    pub(crate) fn pack(&self, delta: u64, worker: u64, process: u64, sequence: u64) -> String {
        debug_assert!(delta <= self.max_timestamp(), "timestamp delta overflow");
        debug_assert!(worker <= self.max_worker(), "worker id overflow");
        debug_assert!(process <= self.max_process(), "process id overflow");
        debug_assert!(sequence <= self.max_sequence(), "sequence overflow");

        let mut bits = String::with_capacity(self.total_bits as usize);
        for _ in 0..(self.total_bits - self.used_bits()) {
            bits.push('0');
        }
        push_field(&mut bits, delta, self.timestamp_bits);
        push_field(&mut bits, worker, self.worker_bits);
        push_field(&mut bits, process, self.process_bits);
        push_field(&mut bits, sequence, self.sequence_bits);
        bits
    }
}

const fn mask(bits: u32) -> u64 {
    if bits == 0 {
        0
    } else if bits >= 64 {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}

fn push_field(bits: &mut String, value: u64, width: u32) {
    if width > 0 {
        let width = width as usize;
        write!(bits, "{value:0width$b}").expect("writing to a String cannot fail");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_layouts_are_valid() {
        for layout in [Layout::sharded64(), Layout::classic64()] {
            assert_eq!(layout.total_bits(), 64);
            assert_eq!(layout.used_bits(), 64);
            Layout::new(
                layout.total_bits(),
                layout.timestamp_bits(),
                layout.worker_bits(),
                layout.process_bits(),
                layout.sequence_bits(),
            )
            .unwrap();
        }
    }

    #[test]
    fn sharded64_matches_the_fixed_variant() {
        let layout = Layout::sharded64();
        assert_eq!(layout.timestamp_shift(), 23);
        assert_eq!(layout.worker_shift(), 10);
        assert_eq!(layout.max_worker(), (1 << 13) - 1);
        assert_eq!(layout.max_sequence(), 1023);
        assert_eq!(layout.max_process(), 0);
    }

    #[test]
    fn zero_width_fields_are_rejected() {
        assert_eq!(
            Layout::new(64, 0, 13, 0, 10),
            Err(Error::ZeroWidthField {
                field: "timestamp_bits"
            })
        );
        assert_eq!(
            Layout::new(64, 41, 0, 0, 10),
            Err(Error::ZeroWidthField {
                field: "worker_bits"
            })
        );
        assert_eq!(
            Layout::new(64, 41, 13, 0, 0),
            Err(Error::ZeroWidthField {
                field: "sequence_bits"
            })
        );
        // The process field alone may be absent.
        Layout::new(64, 41, 13, 0, 10).unwrap();
    }

    #[test]
    fn overcommitted_layouts_are_rejected() {
        assert_eq!(
            Layout::new(64, 42, 5, 5, 13),
            Err(Error::LayoutOverflow {
                total_bits: 64,
                used_bits: 65
            })
        );
    }

    #[test]
    fn oversized_fields_are_rejected() {
        assert_eq!(
            Layout::new(256, 65, 5, 5, 12),
            Err(Error::FieldTooWide {
                field: "timestamp_bits",
                bits: 65
            })
        );
    }

    #[test]
    fn wide_layouts_leave_zero_padding() {
        let layout = Layout::new(96, 42, 5, 5, 12).unwrap();
        let bits = layout.pack(1, 1, 1, 1);
        assert_eq!(bits.len(), 96);
        assert!(bits.starts_with(&"0".repeat(32)));
    }

    #[test]
    fn packing_places_fields_at_their_offsets() {
        let layout = Layout::sharded64();
        let bits = layout.pack(1, 1, 0, 1);
        let value = u64::from_str_radix(&bits, 2).unwrap();
        assert_eq!(value, (1 << 23) | (1 << 10) | 1);
    }
}
