//! Credential providers
//!
//! Where the RCON password comes from. Secret-store integrations implement
//! [`CredentialProvider`]; the crate itself ships the two simple sources the
//! CLI needs.

use std::env;

use crate::error::{RconError, Result};

/// Default environment variable holding the RCON password
pub const DEFAULT_PASSWORD_VAR: &str = "RCON_PASSWORD";

/// A source of the RCON password
pub trait CredentialProvider {
    /// Return a non-empty password or a `Credential` error
    fn password(&self) -> Result<String>;
}

/// A password given directly (e.g. on the command line)
pub struct StaticPassword(String);

impl StaticPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }
}

impl CredentialProvider for StaticPassword {
    fn password(&self) -> Result<String> {
        if self.0.is_empty() {
            return Err(RconError::Credential("Empty password given".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// A password read from an environment variable
pub struct EnvPassword {
    var: String,
}

impl EnvPassword {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvPassword {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_VAR)
    }
}

impl CredentialProvider for EnvPassword {
    fn password(&self) -> Result<String> {
        let value = env::var(&self.var).map_err(|e| {
            RconError::Credential(format!("Cannot read ${}: {}", self.var, e))
        })?;

        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(RconError::Credential(format!("${} is empty", self.var)));
        }
        Ok(value)
    }
}
