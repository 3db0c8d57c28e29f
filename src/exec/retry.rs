//! Bounded retries with exponential backoff
//!
//! Attempts are strictly sequential. The delay after failed attempt `n` is
//! `backoff_base^n` seconds, without jitter.

use std::time::Duration;

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::exec::command_failed;
use crate::error::{ExecFailure, Result};

/// How often and how long a network-facing command may run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    timeout: Duration,
    backoff_base: f64,
}

impl RetryPolicy {
    /// Clamps `max_attempts` to at least 1 and `backoff_base` to above 1
    pub fn new(max_attempts: u32, timeout: Duration, backoff_base: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            timeout,
            backoff_base: if backoff_base > 1.0 { backoff_base } else { 2.0 },
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delay slept after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_base.powi(exponent)).unwrap_or(Duration::MAX)
    }
}

/// Run `command` up to `policy.max_attempts()` times
///
/// Every attempt is bounded by the policy timeout. Timeouts, launch failures
/// and (for checked commands) non-zero exits are retried; anything else is
/// returned immediately. Exhaustion yields `CommandFailed` with the attempt
/// count and the last failure.
pub fn run_with_retry<R>(runner: &R, command: &CommandSpec, policy: &RetryPolicy) -> Result<CommandOutput>
where
    R: CommandRunner + ?Sized,
{
    let bounded = command.clone().timeout(policy.timeout);
    let max_attempts = policy.max_attempts;
    let mut last_failure = ExecFailure::Spawn("no attempt made".to_string());

    for attempt in 1..=max_attempts {
        match runner.run(&bounded) {
            Ok(output) => return Ok(output),
            Err(err) => {
                let Some(failure) = err.exec_failure().cloned() else {
                    return Err(err);
                };
                tracing::warn!(
                    command = command.program(),
                    attempt,
                    max_attempts,
                    error = %failure,
                    "command attempt failed"
                );
                last_failure = failure;
            }
        }

        if attempt < max_attempts {
            let delay = policy.delay_after(attempt);
            tracing::debug!(delay_secs = delay.as_secs_f64(), "retrying");
            runner.pause(delay);
        }
    }

    Err(command_failed(command.to_string(), max_attempts, last_failure))
}
