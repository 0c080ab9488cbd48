//! Text query language: `QUERY <VERB> <PATTERN>`.
//!
//! | Verb | Output |
//! |---|---|
//! | `LIST` | one matching name per line |
//! | `SUM` | `<name>: <value>` per matching property with a value |
//! | `SUM_AGGREGATE` | one line holding the integer total of the matches |
//!
//! Every output line ends with `\n`; an empty match set yields an empty
//! response (or `0\n` for `SUM_AGGREGATE`).

mod command;
mod interpreter;
mod pattern;

pub use command::*;
pub use interpreter::*;
pub use pattern::*;
