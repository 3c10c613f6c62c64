#![forbid(unsafe_code)]

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("id must not be empty")]
    Empty,
    #[error("id must start with '{expected}'")]
    WrongPrefix { expected: &'static str },
    #[error("id sequence must be a positive integer")]
    InvalidSequence,
}

fn parse_sequence(value: &str, prefix: &'static str) -> Result<u32, IdParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(IdParseError::Empty);
    }
    // Bare numbers are accepted so operators can type "3" instead of "VIL-0003".
    let digits = if value.bytes().all(|b| b.is_ascii_digit()) {
        value
    } else {
        value
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or(IdParseError::WrongPrefix { expected: prefix })?
    };
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => Err(IdParseError::InvalidSequence),
        Ok(seq) => Ok(seq),
    }
}

macro_rules! sequence_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            pub fn from_seq(seq: u32) -> Self {
                Self(seq.max(1))
            }

            pub fn seq(self) -> u32 {
                self.0
            }

            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{:04}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                parse_sequence(value, Self::PREFIX).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

sequence_id!(VillageId, "VIL");
sequence_id!(RemarkId, "REM");
