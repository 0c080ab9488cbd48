use tracing::debug;
use tracing::error;
use tracing::warn;

use super::QueryCommand;
use super::QueryVerb;
use crate::QueryConfig;
use crate::Registry;
use crate::Result;

/// Turns request lines into registry queries and formats the matches.
pub struct QueryInterpreter<'a> {
    registry: &'a Registry,
    config: QueryConfig,
}

impl<'a> QueryInterpreter<'a> {
    pub fn new(
        registry: &'a Registry,
        config: QueryConfig,
    ) -> Self {
        Self { registry, config }
    }

    /// Parses and runs one request line.
    ///
    /// # Errors
    /// `Error::Query` for a malformed line, an unknown verb or an invalid
    /// pattern; `Error::Registry` when the registry is not initialized.
    pub fn process(
        &self,
        line: &str,
    ) -> Result<String> {
        let command = QueryCommand::parse(line, self.config.max_command_length).inspect_err(|e| {
            warn!(%e, "rejected query command");
        })?;
        self.execute(&command)
    }

    pub fn execute(
        &self,
        command: &QueryCommand,
    ) -> Result<String> {
        debug!(%command, "executing query");
        match command.verb {
            QueryVerb::List => self.list(&command.pattern),
            QueryVerb::Sum => self.sum(&command.pattern),
            QueryVerb::SumAggregate => self.sum_aggregate(&command.pattern),
        }
    }

    fn list(
        &self,
        pattern: &str,
    ) -> Result<String> {
        let mut output = String::new();
        self.registry.query(pattern, |name, _| {
            output.push_str(name);
            output.push('\n');
        })?;
        Ok(output)
    }

    fn sum(
        &self,
        pattern: &str,
    ) -> Result<String> {
        let mut output = String::new();
        self.registry.query(pattern, |name, property| match property.to_value_string() {
            Some(value) => output.push_str(&format!("{name}: {value}\n")),
            None => debug!(path = name, "skipping property without value"),
        })?;
        Ok(output)
    }

    fn sum_aggregate(
        &self,
        pattern: &str,
    ) -> Result<String> {
        let mut total: i64 = 0;
        self.registry.query(pattern, |name, property| {
            let Some(value) = property.to_value_string() else {
                return;
            };

            match value.trim().parse::<i64>() {
                Ok(number) => match total.checked_add(number) {
                    Some(sum) => total = sum,
                    None => error!(path = name, value = %value, total, "aggregate overflow, value skipped"),
                },
                Err(e) => error!(
                    path = name,
                    value = %value,
                    error = %e,
                    "failed to convert property to number"
                ),
            }
        })?;
        Ok(format!("{total}\n"))
    }
}

/// One-shot helper: runs `line` against `registry` with the default query
/// configuration.
pub fn process_query_command(
    registry: &Registry,
    line: &str,
) -> Result<String> {
    QueryInterpreter::new(registry, QueryConfig::default()).process(line)
}
