use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for {name}: {reason}")]
pub struct EnvValueError {
    pub name: String,
    pub reason: String,
}

/// Parses an optional environment value into `T`.
///
/// Returns `Ok(None)` when the value is absent, so that callers can choose their own default and log accordingly.
pub fn parse_env_value<T>(name: &str, value: Option<String>) -> Result<Option<T>, EnvValueError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EnvValueError { name: name.to_string(), reason: format!("'{s}' {e}") }),
    }
}
