//! `Text`: a validated, non-empty key name (field/table identifiers),
//! restricted to `[A-Za-z0-9_]+`.

use lazy_static::lazy_static;
use regex::Regex;

use std::{convert::TryFrom, fmt};

use crate::{err_at, Result};

lazy_static! {
    static ref KEY_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Text(String);

impl Text {
    pub fn new<S: Into<String>>(s: S) -> Result<Text> {
        let s = s.into();
        if !KEY_RE.is_match(&s) {
            err_at!(InvalidArgument, msg: "key {:?} must match [A-Za-z0-9_]+", s)?;
        }
        Ok(Text(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Text {
    type Error = crate::Error;

    fn try_from(s: &str) -> Result<Text> {
        Text::new(s)
    }
}

impl TryFrom<String> for Text {
    type Error = crate::Error;

    fn try_from(s: String) -> Result<Text> {
        Text::new(s)
    }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod key_test;
