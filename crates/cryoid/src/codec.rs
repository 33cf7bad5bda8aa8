use crate::{Error, Result};

/// Converts a base-10 digit string into a binary digit string, exactly.
///
/// Values that fit a native `u128` take the native conversion; anything wider
/// falls back to long division over a digit array, so there is no magnitude
/// limit and no precision loss at any size.
///
/// Leading zeros are not preserved: the result is the minimal binary
/// representation (`"0"` for zero).
///
/// # Example
/// ```
/// use cryoid::decimal_to_binary;
///
/// assert_eq!(decimal_to_binary("11").unwrap(), "1011");
/// assert_eq!(
///     decimal_to_binary("18446744073709551616").unwrap(), // 2^64
///     format!("1{}", "0".repeat(64)),
/// );
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyId`] for an empty string and [`Error::InvalidDigit`]
/// for any non-digit character.
pub fn decimal_to_binary(decimal: &str) -> Result<String> {
    let digits = parse_digits(decimal, 10)?;
    if digits.is_empty() {
        return Ok(String::from("0"));
    }
    if digits.len() <= 38 {
        // 38 decimal digits may still overflow a u128; fall through if so.
        if let Ok(value) = decimal.parse::<u128>() {
            return Ok(format!("{value:b}"));
        }
    }
    Ok(divide_down(digits))
}

/// Converts a binary digit string into a base-10 digit string, exactly.
///
/// The inverse of [`decimal_to_binary`]: round-trips losslessly for any width.
///
/// # Example
/// ```
/// use cryoid::binary_to_decimal;
///
/// assert_eq!(binary_to_decimal("1011").unwrap(), "11");
/// assert_eq!(binary_to_decimal("0000001011").unwrap(), "11");
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyId`] for an empty string and [`Error::InvalidDigit`]
/// for any character other than `0` or `1`.
pub fn binary_to_decimal(binary: &str) -> Result<String> {
    let bits = parse_digits(binary, 2)?;
    if bits.is_empty() {
        return Ok(String::from("0"));
    }
    if bits.len() <= 128 {
        let mut value = 0u128;
        for &bit in &bits {
            value = (value << 1) | u128::from(bit);
        }
        return Ok(value.to_string());
    }
    Ok(double_up(&bits))
}

/// Validates a digit string and returns its digit values with leading zeros
/// stripped. An all-zero input yields an empty vector.
fn parse_digits(input: &str, radix: u32) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Err(Error::EmptyId);
    }
    let mut digits = Vec::with_capacity(input.len());
    let mut significant = false;
    for ch in input.chars() {
        let digit = ch.to_digit(radix).ok_or(Error::InvalidDigit { ch })?;
        significant |= digit != 0;
        if significant {
            digits.push(digit as u8);
        }
    }
    Ok(digits)
}

/// Long division: repeatedly halves the decimal digit array, collecting
/// remainders as bits from least to most significant.
fn divide_down(mut digits: Vec<u8>) -> String {
    let mut bits = Vec::new();
    while !digits.is_empty() {
        let mut remainder = 0u8;
        let mut quotient = Vec::with_capacity(digits.len());
        for &digit in &digits {
            let current = remainder * 10 + digit;
            quotient.push(current / 2);
            remainder = current % 2;
        }
        bits.push(remainder);
        let leading = quotient.iter().take_while(|&&d| d == 0).count();
        quotient.drain(..leading);
        digits = quotient;
    }
    bits.iter()
        .rev()
        .map(|&b| char::from(b'0' + b))
        .collect()
}

/// Double-and-add: folds bits most-significant first into a decimal digit
/// array, doubling the accumulator and adding each bit with carry.
fn double_up(bits: &[u8]) -> String {
    // Least significant decimal digit first; reversed at the end.
    let mut digits = vec![0u8];
    for &bit in bits {
        let mut carry = bit;
        for digit in digits.iter_mut() {
            let value = *digit * 2 + carry;
            *digit = value % 10;
            carry = value / 10;
        }
        while carry > 0 {
            digits.push(carry % 10);
            carry /= 10;
        }
    }
    digits
        .iter()
        .rev()
        .map(|&d| char::from(b'0' + d))
        .collect()
}
