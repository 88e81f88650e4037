//! Engine configuration.
//!
//! The only runtime knob is the number of workers a transpose or multiplication is split
//! across. It is fixed for the lifetime of an [`crate::Engine`]; by default it follows
//! the `PARMUL_WORKERS` environment variable and otherwise the hardware concurrency.

use std::env;
use std::num::NonZeroUsize;
use std::thread;

use log::warn;

use crate::error::{config_error, Result};

/// Environment variable overriding the default worker count.
pub const WORKERS_ENV: &str = "PARMUL_WORKERS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    workers: NonZeroUsize,
}

impl EngineConfig {
    /// A configuration with exactly `workers` workers.
    pub fn with_workers(workers: usize) -> Result<Self> {
        NonZeroUsize::new(workers)
            .map(|workers| Self { workers })
            .ok_or_else(|| config_error("worker count must be at least 1"))
    }

    /// One worker per hardware thread, or a single worker if that cannot be queried.
    pub fn hardware() -> Self {
        Self {
            workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Reads [`WORKERS_ENV`]. `Ok(None)` when the variable is unset.
    pub fn from_env() -> Result<Option<Self>> {
        match env::var(WORKERS_ENV) {
            Ok(value) => Self::parse_workers(&value).map(Some),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => {
                Err(config_error(format!("{WORKERS_ENV} is not valid unicode")))
            }
        }
    }

    fn parse_workers(value: &str) -> Result<Self> {
        let workers = value.trim().parse::<usize>().map_err(|e| {
            config_error(format!("{WORKERS_ENV}={value:?} is not a worker count: {e}"))
        })?;
        Self::with_workers(workers)
    }

    #[inline(always)]
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        match Self::from_env() {
            Ok(Some(config)) => config,
            Ok(None) => Self::hardware(),
            Err(e) => {
                warn!("{e}; using hardware concurrency");
                Self::hardware()
            }
        }
    }
}
