//! Prefix handling for multi-tenant scoping.
//!
//! A prefix is the composite key `packageName + '$' + databaseName + '/'`.
//! Schema type names, namespaces and document ids are stored with a prefix
//! prepended so that tenants sharing one physical index never collide.

use thiserror::Error;

/// Separates the package name from the database name inside a prefix.
pub const PACKAGE_DELIMITER: char = '$';

/// Terminates a prefix; everything after it is the unscoped value.
pub const DATABASE_DELIMITER: char = '/';

/// Errors produced when parsing prefixed values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    /// The value does not contain a `/` prefix terminator.
    #[error("value is not prefixed: {0:?}")]
    NotPrefixed(String),

    /// The prefix portion does not contain a `$` package/database separator.
    #[error("malformed prefix: {0:?}")]
    Malformed(String),
}

/// Creates the prefix for a package/database pair.
#[must_use]
pub fn create_prefix(package_name: &str, database_name: &str) -> String {
    format!("{package_name}{PACKAGE_DELIMITER}{database_name}{DATABASE_DELIMITER}")
}

/// Prepends `prefix` to an unscoped value (schema type, namespace or id).
#[must_use]
pub fn add_prefix(prefix: &str, value: &str) -> String {
    format!("{prefix}{value}")
}

/// Returns the prefix of a prefixed value, including the trailing `/`.
pub fn get_prefix(prefixed_value: &str) -> Result<&str, PrefixError> {
    match prefixed_value.find(DATABASE_DELIMITER) {
        Some(pos) => Ok(&prefixed_value[..=pos]),
        None => Err(PrefixError::NotPrefixed(prefixed_value.to_string())),
    }
}

/// Strips the prefix from a prefixed value, returning the unscoped remainder.
pub fn remove_prefix(prefixed_value: &str) -> Result<&str, PrefixError> {
    match prefixed_value.find(DATABASE_DELIMITER) {
        Some(pos) => Ok(&prefixed_value[pos + 1..]),
        None => Err(PrefixError::NotPrefixed(prefixed_value.to_string())),
    }
}

/// Returns the package name encoded in a prefix.
pub fn package_name(prefix: &str) -> Result<&str, PrefixError> {
    match prefix.find(PACKAGE_DELIMITER) {
        Some(pos) => Ok(&prefix[..pos]),
        None => Err(PrefixError::Malformed(prefix.to_string())),
    }
}

/// Returns the database name encoded in a prefix.
pub fn database_name(prefix: &str) -> Result<&str, PrefixError> {
    let pkg_end = prefix
        .find(PACKAGE_DELIMITER)
        .ok_or_else(|| PrefixError::Malformed(prefix.to_string()))?;
    let db_end = prefix
        .rfind(DATABASE_DELIMITER)
        .ok_or_else(|| PrefixError::Malformed(prefix.to_string()))?;
    if db_end < pkg_end {
        return Err(PrefixError::Malformed(prefix.to_string()));
    }
    Ok(&prefix[pkg_end + 1..db_end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let prefix = create_prefix("com.example.app", "db1");
        assert_eq!(prefix, "com.example.app$db1/");
        assert_eq!(package_name(&prefix).unwrap(), "com.example.app");
        assert_eq!(database_name(&prefix).unwrap(), "db1");

        let prefixed = add_prefix(&prefix, "Person");
        assert_eq!(get_prefix(&prefixed).unwrap(), prefix);
        assert_eq!(remove_prefix(&prefixed).unwrap(), "Person");
    }

    #[test]
    fn unprefixed_value_is_an_error() {
        assert!(matches!(
            get_prefix("Person"),
            Err(PrefixError::NotPrefixed(_))
        ));
        assert!(remove_prefix("Person").is_err());
    }

    #[test]
    fn malformed_prefix_is_an_error() {
        assert!(package_name("no-delimiters/").is_err());
        assert!(database_name("no-delimiters/").is_err());
    }
}
