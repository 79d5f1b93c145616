//! Serde helpers for 128-bit integers
//!
//! TOML integers are 64-bit, so rates such as `120_000_000_000_000_000_000`
//! must be written as strings. These helpers accept either form and always
//! serialize as a decimal string.

use core::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Serializer;

enum Wide {
    Unsigned(u128),
    Signed(i128),
}

struct WideVisitor;

impl<'de> Visitor<'de> for WideVisitor {
    type Value = Wide;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Wide, E> {
        Ok(Wide::Unsigned(v as u128))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Wide, E> {
        Ok(Wide::Signed(v as i128))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Wide, E> {
        Ok(Wide::Unsigned(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Wide, E> {
        Ok(Wide::Signed(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Wide, E> {
        let digits: String = v.trim().chars().filter(|c| *c != '_').collect();
        if digits.starts_with('-') {
            digits.parse().map(Wide::Signed).map_err(E::custom)
        } else {
            digits.parse().map(Wide::Unsigned).map_err(E::custom)
        }
    }
}

fn to_u128<E: de::Error>(wide: Wide) -> Result<u128, E> {
    match wide {
        Wide::Unsigned(v) => Ok(v),
        Wide::Signed(v) => u128::try_from(v).map_err(|_| E::custom(format!("{v} is negative"))),
    }
}

fn to_i128<E: de::Error>(wide: Wide) -> Result<i128, E> {
    match wide {
        Wide::Signed(v) => Ok(v),
        Wide::Unsigned(v) => {
            i128::try_from(v).map_err(|_| E::custom(format!("{v} does not fit in i128")))
        }
    }
}

/// `#[serde(with = "serde_utils::u128_string")]`
pub mod u128_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        to_u128(d.deserialize_any(WideVisitor)?)
    }
}

/// `#[serde(with = "serde_utils::i128_string")]`
pub mod i128_string {
    use super::*;

    pub fn serialize<S: Serializer>(value: &i128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i128, D::Error> {
        to_i128(d.deserialize_any(WideVisitor)?)
    }
}

/// `#[serde(with = "serde_utils::i128_seq")]` for breakpoint arrays
pub mod i128_seq {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(values: &[i128], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(values.len()))?;
        for v in values {
            seq.serialize_element(&v.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<i128>, D::Error> {
        struct SeqVisitor;

        impl<'de> Visitor<'de> for SeqVisitor {
            type Value = Vec<i128>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of integers or decimal strings")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<i128>, A::Error> {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(WideI128(v)) = seq.next_element()? {
                    out.push(v);
                }
                Ok(out)
            }
        }

        d.deserialize_seq(SeqVisitor)
    }

    struct WideI128(i128);

    impl<'de> serde::Deserialize<'de> for WideI128 {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            super::i128_string::deserialize(d).map(WideI128)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Sample {
        #[serde(with = "super::u128_string")]
        rate: u128,
        #[serde(with = "super::i128_string")]
        limit: i128,
        #[serde(with = "super::i128_seq")]
        xs: Vec<i128>,
    }

    #[test]
    fn test_integers_and_strings() {
        let sample: Sample = toml::from_str(
            r#"
            rate = "120_000_000_000_000_000_000"
            limit = -5
            xs = [-200, "-170141183460469231731687303715884105727", 3]
            "#,
        )
        .unwrap();
        assert_eq!(sample.rate, 120 * 1_000_000_000_000_000_000);
        assert_eq!(sample.limit, -5);
        assert_eq!(sample.xs, vec![-200, -i128::MAX, 3]);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(toml::from_str::<Sample>("rate = -1\nlimit = 0\nxs = []").is_err());
        assert!(toml::from_str::<Sample>("rate = \"abc\"\nlimit = 0\nxs = []").is_err());
    }

    #[test]
    fn test_serializes_as_strings() {
        let sample = Sample {
            rate: u128::MAX,
            limit: i128::MIN,
            xs: vec![1],
        };
        let text = toml::to_string(&sample).unwrap();
        let back: Sample = toml::from_str(&text).unwrap();
        assert_eq!(back, sample);
    }
}
