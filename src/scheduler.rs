use std::future::Future;
use std::time::Duration;

/// Runs a task on a fixed interval for the lifetime of the process.
pub fn schedule<F, R>(interval: Duration, mut task: F)
where
    F: FnMut() -> R + Send + 'static,
    R: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);

        loop {
            interval.tick().await;
            task().await;
        }
    });
}
