use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::{Error, Result, binary_to_decimal, decimal_to_binary};

/// An opaque, exact, non-negative identifier of arbitrary width.
///
/// The value is held as its binary digit string (possibly left-padded to the
/// width of the layout that minted it) alongside its decimal string form for
/// transport. Equality, ordering and hashing are numeric, so padding never
/// affects comparisons:
///
/// ```
/// use cryoid::SnowflakeId;
///
/// let a = SnowflakeId::from_binary("0000101010").unwrap();
/// let b = SnowflakeId::from_decimal("42").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "42");
/// ```
///
/// Callers must not assume the value fits a native integer: use
/// [`SnowflakeId::to_u64`]/[`SnowflakeId::to_u128`] for checked conversion,
/// or [`SnowflakeId::as_decimal`] for lossless transport.
#[derive(Clone)]
pub struct SnowflakeId {
    binary: String,
    decimal: String,
}

impl SnowflakeId {
    pub(crate) fn from_parts(binary: String, decimal: String) -> Self {
        Self { binary, decimal }
    }

    /// Parses an identifier from a binary digit string.
    ///
    /// Leading zeros are kept as the canonical width.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyId`] or [`Error::InvalidDigit`] for input that is
    /// not a binary digit string.
    pub fn from_binary(binary: &str) -> Result<Self> {
        let decimal = binary_to_decimal(binary)?;
        Ok(Self {
            binary: binary.to_owned(),
            decimal,
        })
    }

    /// Parses an identifier from a decimal digit string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyId`] or [`Error::InvalidDigit`] for input that is
    /// not a decimal digit string (a leading sign is rejected; identifiers are
    /// non-negative).
    pub fn from_decimal(decimal: &str) -> Result<Self> {
        let binary = decimal_to_binary(decimal)?;
        let decimal = binary_to_decimal(&binary)?;
        Ok(Self { binary, decimal })
    }

    /// Builds an identifier from a native 64-bit value.
    pub fn from_u64(value: u64) -> Self {
        Self {
            binary: format!("{value:b}"),
            decimal: value.to_string(),
        }
    }

    /// Builds an identifier from a native 128-bit value.
    pub fn from_u128(value: u128) -> Self {
        Self {
            binary: format!("{value:b}"),
            decimal: value.to_string(),
        }
    }

    /// The binary digit string, including any canonical left padding.
    pub fn as_binary(&self) -> &str {
        &self.binary
    }

    /// The decimal digit string, without leading zeros.
    pub fn as_decimal(&self) -> &str {
        &self.decimal
    }

    /// Number of significant bits in the value (0 for a zero identifier).
    pub fn bit_len(&self) -> usize {
        self.significant().len()
    }

    /// Converts to a native `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdTooWide`] when the value needs more than 64 bits.
    pub fn to_u64(&self) -> Result<u64> {
        let bits = self.significant();
        if bits.len() > 64 {
            return Err(Error::IdTooWide {
                bit_len: bits.len(),
                total_bits: 64,
            });
        }
        if bits.is_empty() {
            return Ok(0);
        }
        Ok(u64::from_str_radix(bits, 2).expect("validated binary digits"))
    }

    /// Converts to a native `u128`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdTooWide`] when the value needs more than 128 bits.
    pub fn to_u128(&self) -> Result<u128> {
        let bits = self.significant();
        if bits.len() > 128 {
            return Err(Error::IdTooWide {
                bit_len: bits.len(),
                total_bits: 128,
            });
        }
        if bits.is_empty() {
            return Ok(0);
        }
        Ok(u128::from_str_radix(bits, 2).expect("validated binary digits"))
    }

    /// The binary digits with canonical padding stripped (empty for zero).
    fn significant(&self) -> &str {
        self.binary.trim_start_matches('0')
    }
}

impl PartialEq for SnowflakeId {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for SnowflakeId {}

impl Hash for SnowflakeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl PartialOrd for SnowflakeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SnowflakeId {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.significant();
        let rhs = other.significant();
        // Equal-length binary strings compare numerically as text.
        lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decimal)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("decimal", &self.decimal)
            .field("bit_len", &self.bit_len())
            .finish()
    }
}

impl From<u64> for SnowflakeId {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<u128> for SnowflakeId {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

/// Input types accepted by the deconstructor.
///
/// Identifiers arrive as decimal strings from transport, as native integers
/// from storage, or as [`SnowflakeId`] values minted locally; each resolves
/// into the exact [`SnowflakeId`] form before field extraction.
pub trait SnowflakeResolvable {
    /// Resolves this value into an exact identifier.
    ///
    /// # Errors
    ///
    /// Returns a format error when the value is not a non-negative integer.
    fn resolve(self) -> Result<SnowflakeId>;
}

impl SnowflakeResolvable for SnowflakeId {
    fn resolve(self) -> Result<SnowflakeId> {
        Ok(self)
    }
}

impl SnowflakeResolvable for &SnowflakeId {
    fn resolve(self) -> Result<SnowflakeId> {
        Ok(self.clone())
    }
}

impl SnowflakeResolvable for u64 {
    fn resolve(self) -> Result<SnowflakeId> {
        Ok(SnowflakeId::from_u64(self))
    }
}

impl SnowflakeResolvable for u128 {
    fn resolve(self) -> Result<SnowflakeId> {
        Ok(SnowflakeId::from_u128(self))
    }
}

impl SnowflakeResolvable for &str {
    fn resolve(self) -> Result<SnowflakeId> {
        SnowflakeId::from_decimal(self)
    }
}

impl SnowflakeResolvable for &String {
    fn resolve(self) -> Result<SnowflakeId> {
        SnowflakeId::from_decimal(self)
    }
}

impl SnowflakeResolvable for String {
    fn resolve(self) -> Result<SnowflakeId> {
        SnowflakeId::from_decimal(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_padding() {
        let padded = SnowflakeId::from_binary("0000101010").unwrap();
        let bare = SnowflakeId::from_u64(42);
        assert_eq!(padded, bare);

        let mut seen = HashSet::new();
        assert!(seen.insert(padded));
        assert!(!seen.insert(bare));
    }

    #[test]
    fn ordering_is_numeric() {
        let small = SnowflakeId::from_binary("0000000001").unwrap();
        let large = SnowflakeId::from_u64(512);
        assert!(small < large);
        assert!(SnowflakeId::from_u64(0) < small);

        let wide = SnowflakeId::from_decimal("340282366920938463463374607431768211456").unwrap();
        assert!(large < wide); // 2^128 outranks any u64
    }

    #[test]
    fn native_conversions_are_checked() {
        let id = SnowflakeId::from_u64(u64::MAX);
        assert_eq!(id.to_u64().unwrap(), u64::MAX);

        let wide = SnowflakeId::from_u128(u128::from(u64::MAX) + 1);
        assert_eq!(
            wide.to_u64(),
            Err(Error::IdTooWide {
                bit_len: 65,
                total_bits: 64
            })
        );
        assert_eq!(wide.to_u128().unwrap(), u128::from(u64::MAX) + 1);
    }

    #[test]
    fn zero_is_representable() {
        let zero = SnowflakeId::from_decimal("0").unwrap();
        assert_eq!(zero.bit_len(), 0);
        assert_eq!(zero.to_u64().unwrap(), 0);
        assert_eq!(zero.to_string(), "0");
    }

    #[test]
    fn resolvable_accepts_every_exact_form() {
        let id = SnowflakeId::from_u64(6_917_529_027_641_081_857);
        assert_eq!(id.as_decimal().resolve().unwrap(), id);
        assert_eq!(6_917_529_027_641_081_857u64.resolve().unwrap(), id);
        assert_eq!(6_917_529_027_641_081_857u128.resolve().unwrap(), id);
        assert_eq!((&id).resolve().unwrap(), id);
    }
}
