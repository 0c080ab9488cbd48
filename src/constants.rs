// -
// Registry naming

/// Key of the registry root node; every FQDN starts with it
pub(crate) const DEFAULT_ROOT_NAME: &str = "hds";

/// Path segment delimiter
pub(crate) const DEFAULT_DELIMITER: &str = ".";

/// Characters that turn a path segment into a glob pattern
pub(crate) const GLOB_METACHARACTERS: &[char] = &['*', '?', '[', ']'];

// -
// Query protocol

/// First token of every query request line
pub(crate) const QUERY_KEYWORD: &str = "QUERY";

pub(crate) const DEFAULT_MAX_COMMAND_LENGTH: usize = 4096;
