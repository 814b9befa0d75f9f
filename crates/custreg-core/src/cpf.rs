//! # CPF Sanitization and Check-Digit Validation
//!
//! A CPF (Cadastro de Pessoas Físicas) is an 11-digit Brazilian taxpayer
//! identifier: 9 base digits followed by 2 check digits, conventionally
//! displayed as `###.###.###-##`.
//!
//! ## Pipeline
//!
//! ```text
//! raw input ──sanitize──▶ canonical string ──validate──▶ bool
//! ```
//!
//! [`sanitize`] only strips the display mask; it does not validate.
//! [`validate`] assumes canonical input and answers `false` for anything
//! that is not 11 ASCII digits with matching check digits.
//!
//! ## Check digits
//!
//! For an `n`-digit prefix, the digit at position `i` (0-based) has weight
//! `n + 1 - i`. The first check digit is derived from the 9 base digits
//! (weights 10..=2), the second from the base digits plus the first check
//! digit (weights 11..=2). See [`sum_digits`] and [`make_check_digit`].

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a canonical CPF.
pub const CPF_LEN: usize = 11;

/// Number of base digits preceding the two check digits.
const BASE_LEN: usize = 9;

fn is_mask_char(c: char) -> bool {
    matches!(c, '.' | '-')
}

/// Strip the display mask from a raw identifier.
///
/// Every `.` and `-` is removed; everything else, including unexpected
/// characters, passes through unchanged. Returns `Cow::Borrowed` when the
/// input is already free of mask characters.
///
/// ```
/// use custreg_core::sanitize;
///
/// assert_eq!(sanitize("111.444.777-35"), "11144477735");
/// assert_eq!(sanitize("11144477735"), "11144477735");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> Cow<'_, str> {
    if !raw.contains(is_mask_char) {
        return Cow::Borrowed(raw);
    }
    Cow::Owned(raw.chars().filter(|c| !is_mask_char(*c)).collect())
}

/// [`sanitize`] for values that may be absent from a request body.
///
/// `None` passes through as `None`.
#[must_use]
pub fn sanitize_opt(raw: Option<&str>) -> Option<Cow<'_, str>> {
    raw.map(sanitize)
}

/// Weighted digit sum with descending weights ending at 2.
///
/// Returns `None` if any character is not an ASCII decimal digit.
///
/// ```
/// use custreg_core::sum_digits;
///
/// assert_eq!(sum_digits("111444777"), Some(162));
/// assert_eq!(sum_digits("1114447773"), Some(204));
/// ```
#[must_use]
pub fn sum_digits(digits: &str) -> Option<u32> {
    let len = u32::try_from(digits.len()).ok()?;
    let top = len.checked_add(1)?;
    digits
        .bytes()
        .zip((2..=top).rev())
        .try_fold(0u32, |acc, (b, weight)| {
            if !b.is_ascii_digit() {
                return None;
            }
            acc.checked_add(u32::from(b - b'0').checked_mul(weight)?)
        })
}

/// Derive a check digit from a weighted digit sum.
///
/// Remainders 0 and 1 map to `'0'`; any other remainder `r` maps to `11 - r`.
#[must_use]
pub fn make_check_digit(sum: u32) -> char {
    let remainder = sum % 11;
    let digit = if remainder >= 2 { 11 - remainder } else { 0 };
    // digit is in 0..=9
    char::from(b'0' + digit as u8)
}

/// Check whether a canonical string is a structurally valid CPF.
///
/// Returns `false` for any length other than 11, for any non-ASCII-digit
/// character, and when the supplied check digits differ from the computed
/// ones. Never panics.
#[must_use]
pub fn validate(canonical: &str) -> bool {
    if canonical.len() != CPF_LEN || !canonical.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let (base, supplied) = canonical.split_at(BASE_LEN);

    let Some(first) = sum_digits(base).map(make_check_digit) else {
        return false;
    };

    let mut extended = String::with_capacity(BASE_LEN + 1);
    extended.push_str(base);
    extended.push(first);

    let Some(second) = sum_digits(&extended).map(make_check_digit) else {
        return false;
    };

    let mut supplied = supplied.chars();
    supplied.next() == Some(first) && supplied.next() == Some(second)
}

/// A validated CPF, stored in canonical 11-digit form.
///
/// Accepts masked (`"208.021.130-79"`) and bare (`"20802113079"`) input.
/// Serializes as the canonical string; deserialization routes through
/// [`Cpf::parse`] so invalid values are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Cpf(String);

impl Cpf {
    /// Sanitize and validate a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCpf`] carrying the raw input if the
    /// sanitized value fails [`validate`].
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let canonical = sanitize(raw);
        if !validate(&canonical) {
            return Err(ValidationError::InvalidCpf(raw.to_string()));
        }
        Ok(Self(canonical.into_owned()))
    }

    /// Access the canonical 11-digit form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as `###.###.###-##`.
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }

    /// Consume and return the canonical string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Cpf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for Cpf {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Cpf {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
