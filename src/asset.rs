//! Asset identifiers

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RateError;

/// Asset identifier: an ASCII symbol of up to 8 bytes, NUL padded
/// (e.g., "KNC\0\0\0\0\0")
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(pub [u8; 8]);

impl AssetId {
    /// Quote asset constant
    pub const QUOTE: Self = Self(*b"QUOTE\0\0\0");

    /// Build from a symbol of 1 to 8 printable ASCII bytes
    pub fn from_symbol(symbol: &str) -> Result<Self, RateError> {
        let bytes = symbol.as_bytes();
        let valid = !bytes.is_empty()
            && bytes.len() <= 8
            && bytes.iter().all(|b| b.is_ascii_graphic());
        if !valid {
            return Err(RateError::InvalidSymbol(symbol.to_string()));
        }
        let mut id = [0u8; 8];
        id[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(id))
    }

    /// Symbol without the NUL padding
    pub fn symbol(&self) -> &str {
        let len = self.0.iter().position(|b| *b == 0).unwrap_or(8);
        core::str::from_utf8(&self.0[..len]).unwrap_or("?")
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for AssetId {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
    }
}

impl TryFrom<String> for AssetId {
    type Error = RateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_symbol(&value)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.symbol().to_string()
    }
}
