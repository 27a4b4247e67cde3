//! Runtime configuration.
//!
//! Configuration is installed once per process through [`crate::context::init_with`] (or read
//! from the environment by [`crate::context::init`] and by lazy initialization) and controls
//! how the termination handler behaves:
//!
//! - [`Diagnostics`] - What the uncaught-exception line on stderr contains
//! - [`PrimaryContext`] - Which context's uncaught exception ends the whole process
//!
//! # Environment Overrides
//!
//! | Variable | Values |
//! |----------|--------|
//! | `TRYCATCH_DIAGNOSTICS` | `verbose`, `brief`, `silent` |
//! | `TRYCATCH_PRIMARY` | `initializer`, `main-thread`, `none` |
//!
//! # Example
//!
//! ```rust
//! use trycatch::context::{Config, Diagnostics, PrimaryContext};
//!
//! let config = Config::new()
//!     .with_diagnostics(Diagnostics::Brief)
//!     .with_primary(PrimaryContext::MainThread);
//!
//! assert_eq!(config.diagnostics.to_string(), "brief");
//! ```

use strum::{Display, EnumString};

use crate::{Error, Result};

/// Content of the diagnostic line written when an exception is not caught.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Diagnostics {
    /// Source location, enclosing function, message and code.
    Verbose,
    /// Message and code only.
    Brief,
    /// Nothing is written.
    Silent,
}

impl Default for Diagnostics {
    /// `Verbose` in debug builds, `Brief` in optimized builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Diagnostics::Verbose
        } else {
            Diagnostics::Brief
        }
    }
}

/// Rule designating the primary context, whose uncaught exception terminates the process.
///
/// Every other context only ends itself, surfacing the thrown code as its own result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PrimaryContext {
    /// The thread that called [`crate::context::init`] / [`crate::context::init_with`].
    #[default]
    Initializer,
    /// Any thread named `main`.
    ///
    /// The match is by name only. The standard runtime names the thread running `fn main`
    /// this way, but a thread spawned with the name `main` qualifies as well.
    MainThread,
    /// No context is primary; uncaught exceptions never end the process directly.
    #[strum(to_string = "none")]
    Disabled,
}

/// Process-wide runtime configuration.
///
/// # Default Configuration
///
/// - [`Diagnostics::default()`] (verbose in debug builds, brief otherwise)
/// - [`PrimaryContext::Initializer`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// What the termination handler prints.
    pub diagnostics: Diagnostics,

    /// How the primary context is chosen.
    pub primary: PrimaryContext,
}

impl Config {
    /// Environment variable overriding [`Config::diagnostics`].
    pub const DIAGNOSTICS_VAR: &'static str = "TRYCATCH_DIAGNOSTICS";

    /// Environment variable overriding [`Config::primary`].
    pub const PRIMARY_VAR: &'static str = "TRYCATCH_PRIMARY";

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset that prints nothing on uncaught exceptions.
    pub fn silent() -> Self {
        Self {
            diagnostics: Diagnostics::Silent,
            ..Self::default()
        }
    }

    /// Sets the diagnostics level.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Sets the primary-context rule.
    #[must_use]
    pub fn with_primary(mut self, primary: PrimaryContext) -> Self {
        self.primary = primary;
        self
    }

    /// Builds the default configuration with the process environment's overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a variable is set to an unknown value.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a value cannot be parsed.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(Self::DIAGNOSTICS_VAR) {
            self.diagnostics = parse(Self::DIAGNOSTICS_VAR, value)?;
        }
        if let Some(value) = lookup(Self::PRIMARY_VAR) {
            self.primary = parse(Self::PRIMARY_VAR, value)?;
        }
        Ok(self)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| Error::InvalidConfig { key, value })
}
