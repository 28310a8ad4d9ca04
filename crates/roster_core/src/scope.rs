use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::RosterError;

/// Lifetime of a view that issues roster operations.
///
/// Each operation runs under [`ViewScope::token`]; once the scope is closed
/// or dropped, in-flight responses are discarded instead of applied.
#[derive(Debug, Default)]
pub struct ViewScope {
    token: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for one operation, cancelled together with the scope.
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn close(&self) {
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Runs `fut` unless `token` fires first, in which case the request is dropped.
pub(crate) async fn until_cancelled<T, F>(
    token: &CancellationToken,
    fut: F,
) -> Result<T, RosterError>
where
    F: Future<Output = Result<T, RosterError>>,
{
    tokio::select! {
        biased;
        () = token.cancelled() => Err(RosterError::Cancelled),
        result = fut => result,
    }
}
