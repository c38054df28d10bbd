use crate::reply::{CallResult, Invocation};

/// Awaits a deferred invocation; a ready one is returned as is.
///
/// A rejected future and a synchronous failure come out identical, both as the
/// `Err` of the returned result.
pub async fn settle(invocation: Invocation) -> CallResult {
    match invocation {
        Invocation::Ready(result) => result,
        Invocation::Deferred(future) => future.await,
    }
}
