//! Verification code value used as the customer's shared secret.

use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of digits in a verification code
pub const CODE_LENGTH: usize = 4;

const MIN_CODE: u16 = 1000;
const MAX_CODE: u16 = 9999;

/// A 4-digit numeric verification code
///
/// Codes are always in `1000..=9999`, so they are never zero and always
/// render as exactly four digits. `Debug` output is masked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VerificationCode(u16);

impl VerificationCode {
    /// Generates a new code from the OS random number generator
    pub fn generate() -> Self {
        Self(OsRng.gen_range(MIN_CODE..=MAX_CODE))
    }

    /// Generates a new code guaranteed to differ from `previous`
    pub fn generate_distinct_from(previous: VerificationCode) -> Self {
        loop {
            let code = Self::generate();
            if code != previous {
                return code;
            }
        }
    }

    /// Numeric value of the code
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Compares a presented code against this one in constant time
    ///
    /// Surrounding whitespace is ignored. Anything that is not the exact
    /// four-digit rendering of this code does not match.
    pub fn matches(&self, presented: &str) -> bool {
        let expected = self.to_string();
        let presented = presented.trim();
        presented.len() == CODE_LENGTH && constant_time_eq(expected.as_bytes(), presented.as_bytes())
    }
}

impl TryFrom<u16> for VerificationCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if (MIN_CODE..=MAX_CODE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("verification code must be {} digits", CODE_LENGTH))
        }
    }
}

impl From<VerificationCode> for u16 {
    fn from(code: VerificationCode) -> Self {
        code.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(****)")
    }
}
