//! Pool configuration and validation.

use crate::error::{Error, Result};
use crate::pool::FailureHook;
use std::fmt;

/// Pool configuration.
///
/// Worker count and priority-level count are captured at construction and
/// never change afterwards.
#[derive(Clone)]
pub struct Config {
    /// Number of worker threads draining the queue.
    pub workers: usize,
    /// Number of priority levels; 0 is the highest priority.
    pub priority_levels: usize,
    /// Prefix for worker thread names.
    pub thread_name_prefix: String,
    /// Stack size for worker threads, if overridden.
    pub stack_size: Option<usize>,
    /// Pin each worker to a CPU core (Linux only).
    pub pin_workers: bool,
    /// Invoked on the worker thread for every task that panicked.
    pub on_task_failure: Option<FailureHook>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 1,
            priority_levels: 1,
            thread_name_prefix: "strand-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            pin_workers: false,
            on_task_failure: None,
        }
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check the configuration for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::config("workers must be > 0"));
        }
        if self.workers > 1024 {
            return Err(Error::config("workers too large (max 1024)"));
        }
        if self.priority_levels == 0 {
            return Err(Error::config("priority_levels must be > 0"));
        }
        if self.priority_levels > 256 {
            return Err(Error::config("priority_levels too large (max 256)"));
        }
        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("workers", &self.workers)
            .field("priority_levels", &self.priority_levels)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .field("stack_size", &self.stack_size)
            .field("pin_workers", &self.pin_workers)
            .field("on_task_failure", &self.on_task_failure.is_some())
            .finish()
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the worker thread count.
    pub fn workers(mut self, n: usize) -> Self {
        self.config.workers = n;
        self
    }

    /// One worker per available CPU core.
    pub fn workers_per_core(mut self) -> Self {
        self.config.workers = num_cpus::get();
        self
    }

    /// Set the number of priority levels.
    pub fn priority_levels(mut self, n: usize) -> Self {
        self.config.priority_levels = n;
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Pin workers to CPU cores (Linux only, ignored elsewhere).
    pub fn pin_workers(mut self, pin: bool) -> Self {
        self.config.pin_workers = pin;
        self
    }

    /// Observe tasks whose execution panicked.
    ///
    /// The hook runs on the worker thread after the panic has been caught;
    /// the task itself is already gone and is not retried.
    pub fn on_task_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&crate::pool::TaskFailure) + Send + Sync + 'static,
    {
        self.config.on_task_failure = Some(std::sync::Arc::new(hook));
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
