//! The lockable resources: one record, one field within a record, and a
//! key's value-range (held while a range operator scans the index). A
//! `Range` token carries enough of the predicate — the operator and its
//! operands — to tell whether it overlaps another range token on the same
//! key, rather than forcing every range scan to serialize behind every
//! other one regardless of which values they actually touch.

use crate::{
    codec::{value::PrimaryKey, Text, Value},
    operator::Operator,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    Record(PrimaryKey),
    Field(PrimaryKey, Text),
    Range(Text, Operator, Vec<Value>),
}

impl Token {
    pub fn record(record: PrimaryKey) -> Token {
        Token::Record(record)
    }

    pub fn field(record: PrimaryKey, key: Text) -> Token {
        Token::Field(record, key)
    }

    pub fn range(key: Text, operator: Operator, operands: Vec<Value>) -> Token {
        Token::Range(key, operator, operands)
    }

    /// The `[low, high]` interval this range token covers, `EQUALS` as a
    /// single point and `REGEX`/`LIKE`/everything else unbounded since they
    /// can't be expressed as a contiguous value interval.
    fn bounds(&self) -> Option<(Value, Value)> {
        match self {
            Token::Range(_, Operator::Equals, vals) => {
                vals.first().map(|v| (v.clone(), v.clone()))
            }
            Token::Range(_, Operator::Between, vals) => match vals.as_slice() {
                [lo, hi] => Some((lo.clone(), hi.clone())),
                _ => Some((Value::NegativeInfinity, Value::PositiveInfinity)),
            },
            Token::Range(..) => Some((Value::NegativeInfinity, Value::PositiveInfinity)),
            _ => None,
        }
    }

    /// Whether this token's key-range overlaps `other`'s. Only meaningful
    /// (and only ever called) for two `Range` tokens on the same key; any
    /// other pairing is exact-match and handled by the broker's hash map.
    pub fn overlaps_range(&self, other: &Token) -> bool {
        let (Token::Range(a_key, ..), Token::Range(b_key, ..)) = (self, other) else {
            return false;
        };
        if a_key != b_key {
            return false;
        }
        let (a_lo, a_hi) = self.bounds().unwrap();
        let (b_lo, b_hi) = other.bounds().unwrap();
        use std::cmp::Ordering::Greater;
        a_lo.compare(&b_hi) != Greater && b_lo.compare(&a_hi) != Greater
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;
