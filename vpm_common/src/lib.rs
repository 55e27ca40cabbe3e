//! Small helpers shared between the vendor performance engine and server crates.
mod helpers;
mod secret;

pub use helpers::{parse_boolean_flag, parse_env_value, EnvValueError};
pub use secret::Secret;
