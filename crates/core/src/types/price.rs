//! Integer yen prices.
//!
//! Product prices are whole yen stored as `INTEGER`; purchase totals are sums
//! over many rows and come back from the store as `BIGINT`, so the wrapper
//! holds an `i64` and accepts either width.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price in whole yen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from a yen amount.
    #[must_use]
    pub const fn new(yen: i64) -> Self {
        Self(yen)
    }

    /// Format with thousands separators, e.g. `12,800`.
    #[must_use]
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if self.0 < 0 {
            out.push('-');
        }
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

impl From<i32> for Price {
    fn from(yen: i32) -> Self {
        Self(i64::from(yen))
    }
}

impl From<i64> for Price {
    fn from(yen: i64) -> Self {
        Self(yen)
    }
}

impl From<Option<i64>> for Price {
    /// `SUM()` over zero rows is `NULL`; treat it as zero.
    fn from(yen: Option<i64>) -> Self {
        Self(yen.unwrap_or_default())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}円", self.grouped())
    }
}
