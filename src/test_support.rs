use std::time::Duration;

use crate::operation::PollPolicy;

/// Runs blocking client code off the async test runtime.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

pub fn fast_poll() -> PollPolicy {
    PollPolicy {
        attempts: 10,
        interval: Duration::from_millis(5),
    }
}
