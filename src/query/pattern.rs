use glob::Pattern;

use crate::constants::GLOB_METACHARACTERS;
use crate::QueryError;

/// A compiled query pattern.
///
/// Patterns containing `*`, `?` or `[...]` are globs and must match a whole
/// name; `*` also crosses delimiters. Patterns without any of them are
/// literal paths and select the named entry plus everything below it, so
/// `dst.java` and `dst.java.` both select `dst.java.kafka.1`.
#[derive(Debug, Clone)]
pub struct QueryPattern {
    raw: String,
    delimiter: String,
    glob: Option<Pattern>,
    literal_prefix: Option<String>,
}

impl QueryPattern {
    pub fn new(
        pattern: &str,
        delimiter: &str,
    ) -> Result<Self, QueryError> {
        let glob = if pattern.contains(GLOB_METACHARACTERS) {
            let compiled = Pattern::new(&collapse_stars(pattern));
            Some(compiled.map_err(|source| QueryError::InvalidPattern {
                pattern: pattern.to_owned(),
                source,
            })?)
        } else {
            None
        };

        let literal_segments: Vec<&str> = pattern
            .split(delimiter)
            .take_while(|segment| !segment.contains(GLOB_METACHARACTERS))
            .collect();
        let literal_prefix = (!literal_segments.is_empty()).then(|| literal_segments.join(delimiter));

        Ok(Self {
            raw: pattern.to_owned(),
            delimiter: delimiter.to_owned(),
            glob,
            literal_prefix,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_glob(&self) -> bool {
        self.glob.is_some()
    }

    /// Leading segments free of glob metacharacters; every match lies at or
    /// below the node this prefix resolves to.
    pub fn literal_prefix(&self) -> Option<&str> {
        self.literal_prefix.as_deref()
    }

    /// Matches a root-relative name
    pub fn matches(
        &self,
        name: &str,
    ) -> bool {
        match &self.glob {
            Some(glob) => glob.matches(name),
            None => {
                let path = self.raw.trim_end_matches(self.delimiter.as_str());
                !path.is_empty()
                    && name
                        .strip_prefix(path)
                        .is_some_and(|rest| rest.is_empty() || rest.starts_with(self.delimiter.as_str()))
            }
        }
    }
}

/// Squeezes every run of `*` into one. `glob` only accepts `**` as a whole
/// path component, while a run of stars here means the same as one star.
fn collapse_stars(pattern: &str) -> String {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}
