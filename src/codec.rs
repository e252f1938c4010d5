//! # Text Codec
//!
//! Per-type conversion between a value and its canonical text. The codec is
//! picked statically: every type a [`Storage`](crate::storage::Storage) can
//! hold implements [`TextCodec`], so `Storage<String, i32>` resolves both
//! conversions at compile time and no runtime type lookup exists.
//!
//! ## Grammar
//!
//! | Type                      | Decode accepts                                  | Encode emits          |
//! |---------------------------|-------------------------------------------------|-----------------------|
//! | `String`                  | `"` raw `"` (at least 2 chars, no escaping)     | `"` raw `"`           |
//! | `i8`..`i64`, `u8`..`u64`  | `[+-]` then `0x`hex, `0`octal or decimal        | decimal               |
//! | `f32`, `f64`              | finite decimal float literal                    | `{:.6}` fixed point   |
//! | `bool`                    | `true`, `false`                                 | `true`, `false`       |
//! | `FloatKey`, `DoubleKey`   | as `f32` / `f64`                                | as `f32` / `f64`      |
//!
//! No form accepts leading or trailing whitespace, and any character left
//! over after the value is an error.
//!
//! ## Float precision
//!
//! Floats are written with six fractional digits, like C's `%f`. When six
//! digits would not read back as the same value (very small or very precise
//! numbers) the shortest exact fixed-point form is written instead, so
//! `decode(encode(v)) == v` holds for every finite `v`. Non-finite values
//! have no encoding.
//!
//! ## Example
//!
//! ```
//! use lrukit::codec::{FloatKey, TextCodec};
//! use lrukit::error::CodecError;
//!
//! assert_eq!(String::decode("\"val1\"").unwrap(), "val1");
//! assert_eq!(String::decode("val1"), Err(CodecError::MissingQuote));
//!
//! assert_eq!(i32::decode("0x1f").unwrap(), 31);
//! assert_eq!(i32::decode("017").unwrap(), 15);
//! assert_eq!(i32::decode("42abc"), Err(CodecError::TrailingCharacters));
//! assert_eq!(i32::decode("99999999999"), Err(CodecError::OutOfRange));
//!
//! assert_eq!(4.2f32.encode().unwrap(), "4.200000");
//! assert_eq!(FloatKey::decode("1.7").unwrap(), FloatKey::new(1.7));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::CodecError;

/// Bidirectional conversion between a value and its canonical text.
pub trait TextCodec: Sized {
    /// Short type name used when caches are created by name.
    const TYPE_NAME: &'static str;

    /// Parses `text`, rejecting anything that is not exactly one value.
    fn decode(text: &str) -> Result<Self, CodecError>;

    /// Renders the canonical text for `self`.
    fn encode(&self) -> Result<String, CodecError>;
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

impl TextCodec for String {
    const TYPE_NAME: &'static str = "string";

    fn decode(text: &str) -> Result<Self, CodecError> {
        if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
            return Err(CodecError::MissingQuote);
        }
        Ok(text[1..text.len() - 1].to_string())
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(format!("\"{self}\""))
    }
}

// ---------------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------------

/// Parses a C-style integer literal into an `i128`.
///
/// Accepts an optional sign followed by `0x`/`0X` and hex digits, a leading
/// `0` and octal digits, or decimal digits.
fn parse_integer(text: &str) -> Result<i128, CodecError> {
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        // "0x" with no hex digits reads as "0" followed by garbage.
        if hex.is_empty() {
            return Err(CodecError::TrailingCharacters);
        }
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut magnitude: i128 = 0;
    for (consumed, c) in digits.chars().enumerate() {
        let digit = match c.to_digit(radix) {
            Some(d) => d,
            // A radix prefix already counts as the digit "0".
            None if consumed > 0 || radix != 10 => return Err(CodecError::TrailingCharacters),
            None => return Err(CodecError::Empty),
        };
        magnitude = magnitude
            .checked_mul(i128::from(radix))
            .and_then(|m| m.checked_add(i128::from(digit)))
            .ok_or(CodecError::OutOfRange)?;
    }

    Ok(if negative { -magnitude } else { magnitude })
}

macro_rules! impl_integer_codec {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl TextCodec for $ty {
                const TYPE_NAME: &'static str = $name;

                fn decode(text: &str) -> Result<Self, CodecError> {
                    let wide = parse_integer(text)?;
                    <$ty>::try_from(wide).map_err(|_| CodecError::OutOfRange)
                }

                fn encode(&self) -> Result<String, CodecError> {
                    Ok(self.to_string())
                }
            }
        )*
    };
}

impl_integer_codec! {
    i8 => "i8",
    i16 => "i16",
    i32 => "int",
    i64 => "long",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
}

// ---------------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------------

macro_rules! impl_float_codec {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl TextCodec for $ty {
                const TYPE_NAME: &'static str = $name;

                fn decode(text: &str) -> Result<Self, CodecError> {
                    if text.is_empty() {
                        return Err(CodecError::Empty);
                    }
                    let value: $ty = text.parse().map_err(|_| CodecError::InvalidFloat)?;
                    if !value.is_finite() {
                        return Err(CodecError::NotFinite);
                    }
                    Ok(value)
                }

                fn encode(&self) -> Result<String, CodecError> {
                    if !self.is_finite() {
                        return Err(CodecError::NotFinite);
                    }
                    let fixed = format!("{:.6}", self);
                    if fixed.parse::<$ty>() == Ok(*self) {
                        Ok(fixed)
                    } else {
                        Ok(format!("{}", self))
                    }
                }
            }
        )*
    };
}

impl_float_codec! {
    f32 => "float",
    f64 => "double",
}

// ---------------------------------------------------------------------------
// Booleans
// ---------------------------------------------------------------------------

impl TextCodec for bool {
    const TYPE_NAME: &'static str = "bool";

    fn decode(text: &str) -> Result<Self, CodecError> {
        match text {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CodecError::InvalidBool),
        }
    }

    fn encode(&self) -> Result<String, CodecError> {
        Ok(self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Hashable float keys
// ---------------------------------------------------------------------------

macro_rules! float_key {
    ($(#[$doc:meta])* $name:ident, $float:ty, $bits:ty) => {
        $(#[$doc])*
        ///
        /// Equality and hashing use the bit pattern, with `-0.0` folded into
        /// `0.0`. Ordering is [`total_cmp`](f64::total_cmp).
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name($float);

        impl $name {
            pub const fn new(value: $float) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $float {
                self.0
            }

            fn canonical_bits(self) -> $bits {
                if self.0 == 0.0 { 0 } else { self.0.to_bits() }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.canonical_bits() == other.canonical_bits()
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.canonical_bits().hash(state);
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                if self == other {
                    Ordering::Equal
                } else {
                    self.0.total_cmp(&other.0)
                }
            }
        }

        impl From<$float> for $name {
            fn from(value: $float) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $float {
            fn from(key: $name) -> Self {
                key.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl TextCodec for $name {
            const TYPE_NAME: &'static str = <$float as TextCodec>::TYPE_NAME;

            fn decode(text: &str) -> Result<Self, CodecError> {
                <$float>::decode(text).map(Self)
            }

            fn encode(&self) -> Result<String, CodecError> {
                self.0.encode()
            }
        }
    };
}

float_key!(
    /// `f32` usable as a cache key.
    FloatKey,
    f32,
    u32
);

float_key!(
    /// `f64` usable as a cache key.
    DoubleKey,
    f64,
    u64
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn text_requires_both_quotes() {
        assert_eq!(String::decode("\"mykey1\"").unwrap(), "mykey1");
        assert_eq!(String::decode("\"\"").unwrap(), "");
        assert_eq!(String::decode("\"with \" inside\"").unwrap(), "with \" inside");
        assert_eq!(String::decode("\"open"), Err(CodecError::MissingQuote));
        assert_eq!(String::decode("close\""), Err(CodecError::MissingQuote));
        assert_eq!(String::decode("\""), Err(CodecError::MissingQuote));
        assert_eq!(String::decode(""), Err(CodecError::MissingQuote));
        assert_eq!(String::decode("bare"), Err(CodecError::MissingQuote));
    }

    #[test]
    fn text_encodes_with_quotes() {
        assert_eq!("val1".to_string().encode().unwrap(), "\"val1\"");
        assert_eq!(String::new().encode().unwrap(), "\"\"");
    }

    #[test]
    fn integer_radix_prefixes() {
        assert_eq!(i32::decode("42").unwrap(), 42);
        assert_eq!(i32::decode("-17").unwrap(), -17);
        assert_eq!(i32::decode("+19").unwrap(), 19);
        assert_eq!(i32::decode("0").unwrap(), 0);
        assert_eq!(i32::decode("0x2A").unwrap(), 42);
        assert_eq!(i32::decode("0X2a").unwrap(), 42);
        assert_eq!(i32::decode("-0x10").unwrap(), -16);
        assert_eq!(i32::decode("052").unwrap(), 42);
        assert_eq!(i32::decode("00").unwrap(), 0);
    }

    #[test]
    fn integer_rejects_malformed_text() {
        assert_eq!(i32::decode(""), Err(CodecError::Empty));
        assert_eq!(i32::decode("-"), Err(CodecError::Empty));
        assert_eq!(i32::decode("abc"), Err(CodecError::Empty));
        assert_eq!(i32::decode(" 42"), Err(CodecError::Empty));
        assert_eq!(i32::decode("42 "), Err(CodecError::TrailingCharacters));
        assert_eq!(i32::decode("42abc"), Err(CodecError::TrailingCharacters));
        assert_eq!(i32::decode("0x"), Err(CodecError::TrailingCharacters));
        assert_eq!(i32::decode("0x1g"), Err(CodecError::TrailingCharacters));
        assert_eq!(i32::decode("08"), Err(CodecError::TrailingCharacters));
        assert_eq!(i32::decode("4.2"), Err(CodecError::TrailingCharacters));
    }

    #[test]
    fn integer_range_checks_target_width() {
        assert_eq!(i32::decode("2147483647").unwrap(), i32::MAX);
        assert_eq!(i32::decode("-2147483648").unwrap(), i32::MIN);
        assert_eq!(i32::decode("2147483648"), Err(CodecError::OutOfRange));
        assert_eq!(i32::decode("-2147483649"), Err(CodecError::OutOfRange));
        assert_eq!(u8::decode("255").unwrap(), 255);
        assert_eq!(u8::decode("256"), Err(CodecError::OutOfRange));
        assert_eq!(u32::decode("-1"), Err(CodecError::OutOfRange));
        assert_eq!(u32::decode("-0").unwrap(), 0);
        assert_eq!(u64::decode("0xffffffffffffffff").unwrap(), u64::MAX);
        assert_eq!(
            i64::decode("999999999999999999999999999999999999999999"),
            Err(CodecError::OutOfRange)
        );
    }

    #[test]
    fn integer_encodes_decimal() {
        assert_eq!(42i32.encode().unwrap(), "42");
        assert_eq!((-7i64).encode().unwrap(), "-7");
        assert_eq!(0u8.encode().unwrap(), "0");
    }

    #[test]
    fn float_decodes_standard_literals() {
        assert_eq!(f32::decode("4.2").unwrap(), 4.2);
        assert_eq!(f32::decode("-1.5e3").unwrap(), -1500.0);
        assert_eq!(f32::decode("0.0").unwrap(), 0.0);
        assert_eq!(f64::decode("6.25").unwrap(), 6.25);
    }

    #[test]
    fn float_rejects_garbage_and_non_finite() {
        assert_eq!(f32::decode(""), Err(CodecError::Empty));
        assert_eq!(f32::decode("4.2x"), Err(CodecError::InvalidFloat));
        assert_eq!(f32::decode(" 4.2"), Err(CodecError::InvalidFloat));
        assert_eq!(f32::decode("inf"), Err(CodecError::NotFinite));
        assert_eq!(f32::decode("-infinity"), Err(CodecError::NotFinite));
        assert_eq!(f32::decode("NaN"), Err(CodecError::NotFinite));
        assert_eq!(f32::decode("1e39"), Err(CodecError::NotFinite));
        assert_eq!(f64::decode("1e309"), Err(CodecError::NotFinite));
    }

    #[test]
    fn float_encodes_six_fraction_digits() {
        assert_eq!(4.2f32.encode().unwrap(), "4.200000");
        assert_eq!(0.0f32.encode().unwrap(), "0.000000");
        assert_eq!((-1.5f64).encode().unwrap(), "-1.500000");
        assert_eq!(6.25f64.encode().unwrap(), "6.250000");
    }

    #[test]
    fn float_widens_when_six_digits_lose_the_value() {
        let tiny = 1e-10f32;
        let text = tiny.encode().unwrap();
        assert_ne!(text, "0.000000");
        assert_eq!(f32::decode(&text).unwrap(), tiny);

        let precise = 0.1234567890123f64;
        assert_eq!(f64::decode(&precise.encode().unwrap()).unwrap(), precise);
    }

    #[test]
    fn float_non_finite_has_no_encoding() {
        assert_eq!(f32::NAN.encode(), Err(CodecError::NotFinite));
        assert_eq!(f64::INFINITY.encode(), Err(CodecError::NotFinite));
    }

    #[test]
    fn bool_literals() {
        assert!(bool::decode("true").unwrap());
        assert!(!bool::decode("false").unwrap());
        assert_eq!(bool::decode("True"), Err(CodecError::InvalidBool));
        assert_eq!(true.encode().unwrap(), "true");
    }

    #[test]
    fn float_key_folds_negative_zero() {
        assert_eq!(FloatKey::new(0.0), FloatKey::new(-0.0));
        let mut set = HashSet::new();
        set.insert(FloatKey::new(0.0));
        assert!(set.contains(&FloatKey::new(-0.0)));
        assert!(set.insert(FloatKey::new(4.2)));
        assert!(!set.insert(FloatKey::from(4.2f32)));
    }

    #[test]
    fn float_key_orders_totally() {
        let mut keys = vec![
            DoubleKey::new(6.25),
            DoubleKey::new(-1.0),
            DoubleKey::new(0.0),
            DoubleKey::new(-0.0),
        ];
        keys.sort();
        let raw: Vec<f64> = keys.into_iter().map(f64::from).collect();
        assert_eq!(raw[0], -1.0);
        assert_eq!(raw[3], 6.25);
        assert_eq!(FloatKey::new(-0.0).cmp(&FloatKey::new(0.0)), Ordering::Equal);
    }

    #[test]
    fn float_key_codec_delegates() {
        assert_eq!(FloatKey::decode("1.7").unwrap().get(), 1.7f32);
        assert_eq!(FloatKey::new(1.7).encode().unwrap(), "1.700000");
        assert_eq!(FloatKey::decode("nan"), Err(CodecError::NotFinite));
        assert_eq!(FloatKey::TYPE_NAME, "float");
        assert_eq!(DoubleKey::TYPE_NAME, "double");
        assert_eq!(FloatKey::new(2.5).to_string(), "2.5");
    }
}
