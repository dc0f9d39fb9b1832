use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Run `future`, turning a panic into `Err(message)`.
///
/// Background tasks report back over a channel. Without this a panicking
/// task would vanish and the screen waiting on it would never hear back.
///
/// ```
/// use movierec::util::catch_task_panic;
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let result = rt.block_on(catch_task_panic(async { panic!("boom") }));
/// assert_eq!(result, Err::<(), _>("boom".to_string()));
/// ```
pub async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            }
        })
}
