//! Evaluator: walks a `Conjunction` of `Expression`s against an `Engine`
//! and returns the matching record ids.
//!
//! `LIKE`/`NOT_LIKE` are rewritten to `Regex`/`NotRegex` (the caller's glob
//! pattern becomes an anchored regular expression) and `LINKS_TO` is
//! rewritten to `Equals` against a `Value::Link`, so `operator::matches`
//! only ever has to evaluate the narrower operator set.

use std::collections::BTreeSet;

use crate::{
    codec::{value::PrimaryKey, Text, Value},
    engine::Engine,
    err_at,
    operator::{self, Operator},
    revision,
    Result,
};

/// An `Expression`'s left-hand side: either a stored field, or the reserved
/// `$id` pseudo-field naming a record's own id. `$id` cannot be expressed as
/// a `Text` (its grammar excludes `$`), so it gets its own variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Field(Text),
    Id,
}

impl Key {
    pub fn parse(s: &str) -> Result<Key> {
        if s == "$id" {
            Ok(Key::Id)
        } else {
            Text::new(s).map(Key::Field)
        }
    }
}

#[derive(Clone, Debug)]
pub struct Expression {
    pub key: Key,
    pub operator: Operator,
    pub operands: Vec<Value>,
}

impl Expression {
    pub fn new(key: Key, operator: Operator, operands: Vec<Value>) -> Expression {
        Expression { key, operator, operands }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

#[derive(Clone, Debug)]
pub enum Conjunction {
    Leaf(Expression),
    Node(Combinator, Vec<Conjunction>),
}

fn rewrite(expr: &Expression) -> Result<(Operator, Vec<Value>)> {
    match expr.operator {
        Operator::Like | Operator::NotLike => {
            let pattern = match expr.operands.first() {
                Some(Value::Str(s)) | Some(Value::Tag(s)) => glob_to_regex(s),
                _ => err_at!(InvalidArgument, msg: "like operand must be a string")?,
            };
            let op = if expr.operator == Operator::Like { Operator::Regex } else { Operator::NotRegex };
            Ok((op, vec![Value::Str(pattern)]))
        }
        Operator::LinksTo => Ok((Operator::Equals, expr.operands.clone())),
        op => Ok((op, expr.operands.clone())),
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("(?i)^");
    for ch in pattern.chars() {
        match ch {
            '%' | '*' => out.push_str(".*"),
            '_' | '?' => out.push('.'),
            c if "\\.+()|[]{}^$".contains(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('$');
    out
}

/// Evaluate `conjunction` against `engine`'s current state, visible at
/// `at` (a commit version), over the candidate record ids in `universe`.
pub fn evaluate(
    engine: &Engine,
    conjunction: &Conjunction,
    universe: &[PrimaryKey],
    at: i64,
) -> Result<BTreeSet<PrimaryKey>> {
    match conjunction {
        Conjunction::Leaf(expr) => evaluate_leaf(engine, expr, universe, at),
        Conjunction::Node(Combinator::And, children) => {
            let mut iter = children.iter();
            let first = match iter.next() {
                Some(c) => evaluate(engine, c, universe, at)?,
                None => return Ok(BTreeSet::new()),
            };
            iter.try_fold(first, |acc, child| {
                let next = evaluate(engine, child, universe, at)?;
                Ok(acc.intersection(&next).cloned().collect())
            })
        }
        Conjunction::Node(Combinator::Or, children) => {
            let mut out = BTreeSet::new();
            for child in children {
                out.extend(evaluate(engine, child, universe, at)?);
            }
            Ok(out)
        }
    }
}

fn evaluate_leaf(
    engine: &Engine,
    expr: &Expression,
    universe: &[PrimaryKey],
    at: i64,
) -> Result<BTreeSet<PrimaryKey>> {
    let (operator, operands) = rewrite(expr)?;
    let mut matched = BTreeSet::new();

    let field = match &expr.key {
        Key::Id => {
            for &record in universe {
                if operator::matches(operator, &Value::Link(record), &operands)? {
                    matched.insert(record);
                }
            }
            return Ok(matched);
        }
        Key::Field(text) => text,
    };

    for &record in universe {
        let visible: Vec<_> = engine.current(record)?.into_iter().filter(|r| r.is_visible_at(at)).collect();
        // Fold ADD/REMOVE before matching, so a value that was added and then
        // retracted never matches an operator, even an EQUALS on its own
        // former value.
        let hit = revision::fold_presence(&visible)
            .iter()
            .filter(|(k, _)| k == field)
            .any(|(_, v)| operator::matches(operator, v, &operands).unwrap_or(false));
        if hit {
            matched.insert(record);
        }
    }
    Ok(matched)
}

#[cfg(test)]
#[path = "evaluator_test.rs"]
mod evaluator_test;
