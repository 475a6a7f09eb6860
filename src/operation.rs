use std::thread;
use std::time::Duration;

use crate::error::{ApiError, Result};
use crate::http::HttpClient;
use crate::types::{Link, OperationState, OperationStatus};

const OPERATIONS_MARKER: &str = "/disk/operations/";

/// Bounded fixed-interval polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            attempts: 60,
            interval: Duration::from_secs(1),
        }
    }
}

pub fn is_operation(link: &Link) -> bool {
    link.href.contains(OPERATIONS_MARKER)
}

/// Waits for the operation behind `link` to report `success`.
///
/// Links that don't point at an operation (a created folder, say) are done
/// already. `failed` stops polling at once; running out of attempts is a
/// timeout. `context` only labels errors and log lines.
pub fn wait_operation_success(
    client: &HttpClient,
    link: &Link,
    policy: &PollPolicy,
    context: &str,
) -> Result<()> {
    if !is_operation(link) {
        return Ok(());
    }
    let endpoint = link
        .href
        .strip_prefix(client.base_url())
        .unwrap_or(&link.href);

    for attempt in 1..=policy.attempts {
        let state: OperationState = client.get_json(endpoint, &[])?;
        match state.status {
            OperationStatus::Success => return Ok(()),
            OperationStatus::Failed => return Err(ApiError::OperationFailed(context.to_string())),
            OperationStatus::InProgress(status) => {
                log::info!(
                    "{}: current status {}, attempt {} / {}",
                    context,
                    status,
                    attempt,
                    policy.attempts
                );
            }
        }
        if attempt < policy.attempts {
            thread::sleep(policy.interval);
        }
    }
    Err(ApiError::Timeout(format!(
        "{} did not succeed after {} attempts",
        context, policy.attempts
    )))
}
