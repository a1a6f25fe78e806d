//! Minimal workloads: values, delays and failures

use std::time::Duration;
use taskbridge_core::{TaskError, TaskResult};
use taskbridge_runtime::PendingTask;

/// Failure kind raised by [`throw_exception`] for `x % 3 == 2`
pub const MY_EXCEPTION: &str = "MyException";

/// Delay before the value-returning workloads complete
const RETURN_DELAY: Duration = Duration::from_millis(10);

/// Complete after `secs` seconds with no value
pub fn sleep(secs: f64) -> PendingTask {
    PendingTask::new(sleep_secs(secs))
}

/// Return `value` after a short delay
pub fn return_int(value: i32) -> PendingTask {
    PendingTask::new(delayed(value))
}

/// Return `value` after a short delay
pub fn return_string(value: impl Into<String>) -> PendingTask {
    PendingTask::new(delayed(value.into()))
}

/// Fail after a short delay with a kind chosen by `x % 3`
pub fn throw_exception(x: i32) -> PendingTask {
    PendingTask::new(async move {
        tokio::time::sleep(RETURN_DELAY).await;
        Err::<(), _>(failure_for(x))
    })
}

pub async fn sleep_secs(secs: f64) -> TaskResult<()> {
    let duration = Duration::try_from_secs_f64(secs)
        .map_err(|e| TaskError::InvalidArgument(format!("invalid sleep of {secs}s: {e}")))?;
    tokio::time::sleep(duration).await;
    Ok(())
}

async fn delayed<T>(value: T) -> TaskResult<T> {
    tokio::time::sleep(RETURN_DELAY).await;
    Ok(value)
}

/// Failure raised by [`throw_exception`]
///
/// `x` is reduced with `rem_euclid`, so negative inputs also map onto one of
/// the three kinds.
pub fn failure_for(x: i32) -> TaskError {
    match x.rem_euclid(3) {
        0 => TaskError::Runtime("this is runtime error".to_string()),
        1 => TaskError::InvalidArgument("this is invalid argument error".to_string()),
        _ => TaskError::custom(MY_EXCEPTION, "this is my exception"),
    }
}
