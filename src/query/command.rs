use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_MAX_COMMAND_LENGTH;
use crate::constants::QUERY_KEYWORD;
use crate::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryVerb {
    List,
    Sum,
    SumAggregate,
}

impl QueryVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryVerb::List => "LIST",
            QueryVerb::Sum => "SUM",
            QueryVerb::SumAggregate => "SUM_AGGREGATE",
        }
    }
}

impl fmt::Display for QueryVerb {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryVerb {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIST" => Ok(QueryVerb::List),
            "SUM" => Ok(QueryVerb::Sum),
            "SUM_AGGREGATE" => Ok(QueryVerb::SumAggregate),
            other => Err(QueryError::UnknownVerb(other.to_owned())),
        }
    }
}

/// A parsed `QUERY <VERB> <PATTERN>` request line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    pub verb: QueryVerb,
    pub pattern: String,
}

impl QueryCommand {
    pub fn new(
        verb: QueryVerb,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            verb,
            pattern: pattern.into(),
        }
    }

    /// Parses one request line. The line is split on spaces into at most
    /// three tokens, so the pattern may itself contain spaces. A trailing
    /// line terminator is ignored.
    pub fn parse(
        line: &str,
        max_length: usize,
    ) -> Result<Self, QueryError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.len() > max_length {
            return Err(QueryError::MalformedCommand(format!(
                "command is {} bytes long, limit is {max_length}",
                line.len()
            )));
        }

        let tokens: Vec<&str> = line.splitn(3, ' ').collect();
        let [keyword, verb, pattern] = tokens[..] else {
            return Err(QueryError::MalformedCommand(format!(
                "expected `{QUERY_KEYWORD} <VERB> <PATTERN>`, got {line:?}"
            )));
        };

        if keyword != QUERY_KEYWORD {
            return Err(QueryError::MalformedCommand(format!(
                "expected `{QUERY_KEYWORD}` keyword, got {keyword:?}"
            )));
        }
        let verb: QueryVerb = verb.parse()?;
        if pattern.is_empty() {
            return Err(QueryError::MalformedCommand("empty query pattern".into()));
        }

        Ok(Self::new(verb, pattern))
    }
}

impl FromStr for QueryCommand {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_MAX_COMMAND_LENGTH)
    }
}

impl fmt::Display for QueryCommand {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{QUERY_KEYWORD} {} {}", self.verb, self.pattern)
    }
}
