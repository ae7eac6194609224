//! Acquisitions that run on the tokio runtime while the caller keeps going.

use crate::error::AirQualityError;
use log::info;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A spawned request that can be polled, cancelled or awaited.
///
/// Cancelling drops the in-flight work at its next await point. Store slots are
/// only replaced once a payload has been fully decoded, so a cancelled request
/// never leaves a slot half-written.
#[derive(Debug)]
pub struct BackgroundRequest<T> {
    handle: JoinHandle<Option<Result<T, AirQualityError>>>,
    token: CancellationToken,
}

impl<T: Send + 'static> BackgroundRequest<T> {
    pub(crate) fn spawn<F>(label: &'static str, task: F) -> Self
    where
        F: Future<Output = Result<T, AirQualityError>> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    info!("Background {} request cancelled", label);
                    None
                }
                result = task => Some(result),
            }
        });
        Self { handle, token }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Requests cancellation. Has no effect once the request has finished.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the request to finish.
    ///
    /// # Errors
    ///
    /// [`AirQualityError::Cancelled`] if it was cancelled first, otherwise
    /// whatever the request itself returned.
    pub async fn wait(self) -> Result<T, AirQualityError> {
        match self.handle.await? {
            Some(result) => result,
            None => Err(AirQualityError::Cancelled),
        }
    }
}
