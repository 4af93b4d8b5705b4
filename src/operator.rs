//! The closed set of operators an `Expression` may compare a key's revisions
//! against.

use std::fmt;

use crate::{codec::Value, err_at, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    Between,
    Regex,
    NotRegex,
    Like,
    NotLike,
    LinksTo,
}

impl Operator {
    /// Number of operand `Value`s the operator expects (`Between` takes two,
    /// every other operator takes exactly one).
    pub fn operand_count(&self) -> usize {
        match self {
            Operator::Between => 2,
            _ => 1,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEquals => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEquals => "<=",
            Operator::Between => "><",
            Operator::Regex => "regex",
            Operator::NotRegex => "not regex",
            Operator::Like => "like",
            Operator::NotLike => "not like",
            Operator::LinksTo => "links_to",
        }
    }

    pub fn parse(s: &str) -> Result<Operator> {
        let op = match s {
            "=" | "eq" | "EQUALS" => Operator::Equals,
            "!=" | "ne" | "NOT_EQUALS" => Operator::NotEquals,
            ">" | "gt" | "GREATER_THAN" => Operator::GreaterThan,
            ">=" | "gte" | "GREATER_THAN_OR_EQUALS" => Operator::GreaterThanOrEquals,
            "<" | "lt" | "LESS_THAN" => Operator::LessThan,
            "<=" | "lte" | "LESS_THAN_OR_EQUALS" => Operator::LessThanOrEquals,
            "><" | "bw" | "BETWEEN" => Operator::Between,
            "regex" | "REGEX" => Operator::Regex,
            "not regex" | "NOT_REGEX" => Operator::NotRegex,
            "like" | "LIKE" => Operator::Like,
            "not like" | "NOT_LIKE" => Operator::NotLike,
            "links_to" | "LINKS_TO" => Operator::LinksTo,
            _ => err_at!(InvalidArgument, msg: "unknown operator {:?}", s)?,
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Evaluate `operator` applied to a stored `value` against the caller
/// supplied `operands`. `LIKE`/`NOT_LIKE` are rewritten to `Regex`/`NotRegex`
/// by the evaluator before reaching here; `LinksTo` is rewritten to
/// `Equals` on a `Value::Link`. Both still appear so this function remains
/// total over the operator set.
pub fn matches(operator: Operator, value: &Value, operands: &[Value]) -> Result<bool> {
    use std::cmp::Ordering::*;

    let first = operands.first();
    let ok = match operator {
        Operator::Equals | Operator::LinksTo => first.map_or(false, |o| value.eq_weak(o)),
        Operator::NotEquals => first.map_or(true, |o| !value.eq_weak(o)),
        Operator::GreaterThan => first.map_or(false, |o| value.compare(o) == Greater),
        Operator::GreaterThanOrEquals => {
            first.map_or(false, |o| matches!(value.compare(o), Greater | Equal))
        }
        Operator::LessThan => first.map_or(false, |o| value.compare(o) == Less),
        Operator::LessThanOrEquals => {
            first.map_or(false, |o| matches!(value.compare(o), Less | Equal))
        }
        Operator::Between => match operands {
            [lo, hi] => {
                matches!(value.compare(lo), Greater | Equal) && matches!(value.compare(hi), Less | Equal)
            }
            _ => err_at!(InvalidArgument, msg: "between requires exactly two operands")?,
        },
        Operator::Regex | Operator::NotRegex => {
            let pattern = match first {
                Some(Value::Str(s)) | Some(Value::Tag(s)) => s.as_str(),
                _ => err_at!(InvalidArgument, msg: "regex operand must be a string")?,
            };
            let text = match value {
                Value::Str(s) | Value::Tag(s) => s.as_str(),
                _ => return Ok(operator == Operator::NotRegex),
            };
            let re = err_at!(InvalidArgument, regex::Regex::new(pattern), "bad regex {:?}", pattern)?;
            let hit = re.is_match(text);
            if operator == Operator::NotRegex {
                !hit
            } else {
                hit
            }
        }
        Operator::Like | Operator::NotLike => {
            err_at!(Fatal, msg: "LIKE/NOT_LIKE must be rewritten to Regex before evaluation")?
        }
    };
    Ok(ok)
}

#[cfg(test)]
#[path = "operator_test.rs"]
mod operator_test;
