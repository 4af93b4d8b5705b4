//! Lock broker: serializes concurrent writers against the record, field and
//! key-range they touch, while letting disjoint writers proceed concurrently.

pub mod broker;
pub mod token;

pub use broker::Broker;
pub use token::Token;
