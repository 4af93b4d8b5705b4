//! The typed scalar carried by every revision: `BOOLEAN`, `INTEGER`, `FLOAT`,
//! `LONG`, `DOUBLE`, `LINK`, `STRING`, `TAG`, `TIMESTAMP` and `NULL`, plus the
//! two comparison sentinels `NEGATIVE_INFINITY`/`POSITIVE_INFINITY`.
//!
//! `encode`/`decode` round-trip a self-describing byte form (a one-byte type
//! tag followed by a type-specific payload). `canonical_bytes` is a second,
//! lossier byte form used only as an equality/range key: numerics collapse to
//! an 8 byte form and character-sequence types are lower-cased, so it does
//! not round-trip through `decode`.

use std::{cmp::Ordering, convert::TryFrom, hash::Hash, hash::Hasher};

use crate::{check_remaining, err_at, Error, Result};

pub type PrimaryKey = i64;

const TAG_NULL: u8 = 0;
const TAG_BOOLEAN: u8 = 1;
const TAG_INTEGER: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_LONG: u8 = 4;
const TAG_DOUBLE: u8 = 5;
const TAG_LINK: u8 = 6;
const TAG_STRING: u8 = 7;
const TAG_TAG: u8 = 8;
const TAG_TIMESTAMP: u8 = 9;
const TAG_NEGATIVE_INFINITY: u8 = 10;
const TAG_POSITIVE_INFINITY: u8 = 11;

/// Magnitude beyond which an integral value can no longer be represented
/// exactly as an `f64` (2^53).
const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_992;

#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Link(PrimaryKey),
    Str(String),
    Tag(String),
    Timestamp(i64),
    NegativeInfinity,
    PositiveInfinity,
}

enum NumRepr {
    I(i64),
    F(f64),
}

impl Value {
    pub fn type_tag(&self) -> u8 {
        match self {
            Value::Null => TAG_NULL,
            Value::Boolean(_) => TAG_BOOLEAN,
            Value::Integer(_) => TAG_INTEGER,
            Value::Float(_) => TAG_FLOAT,
            Value::Long(_) => TAG_LONG,
            Value::Double(_) => TAG_DOUBLE,
            Value::Link(_) => TAG_LINK,
            Value::Str(_) => TAG_STRING,
            Value::Tag(_) => TAG_TAG,
            Value::Timestamp(_) => TAG_TIMESTAMP,
            Value::NegativeInfinity => TAG_NEGATIVE_INFINITY,
            Value::PositiveInfinity => TAG_POSITIVE_INFINITY,
        }
    }

    pub fn is_character_sequence(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Tag(_))
    }

    fn numeric_repr(&self) -> Option<NumRepr> {
        match self {
            Value::Boolean(b) => Some(NumRepr::I(if *b { 1 } else { 0 })),
            Value::Integer(v) => Some(NumRepr::I(i64::from(*v))),
            Value::Long(v) => Some(NumRepr::I(*v)),
            Value::Link(v) => Some(NumRepr::I(*v)),
            Value::Timestamp(v) => Some(NumRepr::I(*v)),
            Value::Float(v) => Some(NumRepr::F(f64::from(*v))),
            Value::Double(v) => Some(NumRepr::F(*v)),
            _ => None,
        }
    }

    /// Self-describing encoding: `[type_tag][payload]`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.type_tag());
        match self {
            Value::Null | Value::NegativeInfinity | Value::PositiveInfinity => (),
            Value::Boolean(v) => buf.push(if *v { 1 } else { 0 }),
            Value::Integer(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Value::Float(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Value::Long(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Value::Double(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Value::Link(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Value::Timestamp(v) => buf.extend_from_slice(&v.to_be_bytes()),
            Value::Str(s) | Value::Tag(s) => {
                let bytes = s.as_bytes();
                buf.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                buf.extend_from_slice(bytes);
            }
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        buf
    }

    /// Decode a self-describing value, returning the value and the number of
    /// bytes consumed from `buf`.
    pub fn decode(buf: &[u8]) -> Result<(Value, usize)> {
        check_remaining!(buf, 1, "value-tag")?;
        let tag = buf[0];
        let body = &buf[1..];
        let (value, n) = match tag {
            TAG_NULL => (Value::Null, 0),
            TAG_NEGATIVE_INFINITY => (Value::NegativeInfinity, 0),
            TAG_POSITIVE_INFINITY => (Value::PositiveInfinity, 0),
            TAG_BOOLEAN => {
                check_remaining!(body, 1, "value-bool")?;
                (Value::Boolean(body[0] != 0), 1)
            }
            TAG_INTEGER => {
                check_remaining!(body, 4, "value-int")?;
                let mut a = [0u8; 4];
                a.copy_from_slice(&body[..4]);
                (Value::Integer(i32::from_be_bytes(a)), 4)
            }
            TAG_FLOAT => {
                check_remaining!(body, 4, "value-float")?;
                let mut a = [0u8; 4];
                a.copy_from_slice(&body[..4]);
                (Value::Float(f32::from_be_bytes(a)), 4)
            }
            TAG_LONG => {
                check_remaining!(body, 8, "value-long")?;
                let mut a = [0u8; 8];
                a.copy_from_slice(&body[..8]);
                (Value::Long(i64::from_be_bytes(a)), 8)
            }
            TAG_DOUBLE => {
                check_remaining!(body, 8, "value-double")?;
                let mut a = [0u8; 8];
                a.copy_from_slice(&body[..8]);
                (Value::Double(f64::from_be_bytes(a)), 8)
            }
            TAG_LINK => {
                check_remaining!(body, 8, "value-link")?;
                let mut a = [0u8; 8];
                a.copy_from_slice(&body[..8]);
                (Value::Link(i64::from_be_bytes(a)), 8)
            }
            TAG_TIMESTAMP => {
                check_remaining!(body, 8, "value-timestamp")?;
                let mut a = [0u8; 8];
                a.copy_from_slice(&body[..8]);
                (Value::Timestamp(i64::from_be_bytes(a)), 8)
            }
            TAG_STRING | TAG_TAG => {
                check_remaining!(body, 4, "value-str-len")?;
                let mut a = [0u8; 4];
                a.copy_from_slice(&body[..4]);
                let len = u32::from_be_bytes(a) as usize;
                check_remaining!(body[4..], len, "value-str-body")?;
                let s = err_at!(
                    FailConvert,
                    String::from_utf8(body[4..4 + len].to_vec()),
                    "non-utf8 string value"
                )?;
                let value = if tag == TAG_TAG { Value::Tag(s) } else { Value::Str(s) };
                (value, 4 + len)
            }
            tag => err_at!(Corruption, msg: "unknown value type-tag {}", tag)?,
        };
        Ok((value, n + 1))
    }

    /// Byte form used only for equality/range keys: 8 bytes for every
    /// numeric type, lower-cased UTF-8 bytes for character-sequence types.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        match self.numeric_repr() {
            Some(NumRepr::I(v)) if v.abs() > MAX_SAFE_INTEGER => v.to_be_bytes().to_vec(),
            Some(NumRepr::I(v)) => (v as f64).to_be_bytes().to_vec(),
            Some(NumRepr::F(v)) => v.to_be_bytes().to_vec(),
            None => match self {
                Value::Str(s) | Value::Tag(s) => s.to_lowercase().into_bytes(),
                Value::Null => Vec::new(),
                Value::NegativeInfinity => vec![0u8; 8],
                Value::PositiveInfinity => vec![0xffu8; 8],
                _ => unreachable!("non-numeric, non character-sequence value"),
            },
        }
    }

    /// Weakly-typed comparison: numeric types compare as numbers regardless
    /// of exact variant, character-sequence types compare case-insensitively,
    /// the infinity sentinels dominate every other value, and anything else
    /// falls back to comparing canonical byte forms.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::NegativeInfinity, Value::NegativeInfinity) => Ordering::Equal,
            (Value::NegativeInfinity, _) => Ordering::Less,
            (_, Value::NegativeInfinity) => Ordering::Greater,
            (Value::PositiveInfinity, Value::PositiveInfinity) => Ordering::Equal,
            (Value::PositiveInfinity, _) => Ordering::Greater,
            (_, Value::PositiveInfinity) => Ordering::Less,
            _ => match (self.numeric_repr(), other.numeric_repr()) {
                (Some(NumRepr::I(a)), Some(NumRepr::I(b))) => a.cmp(&b),
                (Some(a), Some(b)) => numeric_as_f64(a).partial_cmp(&numeric_as_f64(b)).unwrap_or(Ordering::Equal),
                _ if self.is_character_sequence() && other.is_character_sequence() => {
                    let (a, b) = (self.as_lowercase_str(), other.as_lowercase_str());
                    a.cmp(&b)
                }
                _ => self.canonical_bytes().cmp(&other.canonical_bytes()),
            },
        }
    }

    fn as_lowercase_str(&self) -> String {
        match self {
            Value::Str(s) | Value::Tag(s) => s.to_lowercase(),
            _ => String::new(),
        }
    }

    pub fn eq_weak(&self, other: &Value) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

fn numeric_as_f64(n: NumRepr) -> f64 {
    match n {
        NumRepr::I(v) => v as f64,
        NumRepr::F(v) => v,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.eq_weak(other)
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Value) -> Ordering {
        self.compare(other)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_bytes().hash(state);
    }
}

impl TryFrom<&[u8]> for Value {
    type Error = Error;

    fn try_from(buf: &[u8]) -> Result<Value> {
        let (value, _) = Value::decode(buf)?;
        Ok(value)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
