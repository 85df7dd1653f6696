//! Bounded waits on announcements
//!
//! Speech, result screens and similar collaborators finish on their own
//! schedule. The bot loop never waits on them unbounded: every wait races
//! a timeout and a cancel signal.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnouncementOutcome<T> {
    Completed(T),
    TimedOut,
    Cancelled,
}

impl<T> AnnouncementOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnnouncementOutcome::Completed(_))
    }
}

/// Await `announcement` for at most `timeout`, or until `cancel` flips to `true`
///
/// A cancel signal that is already set returns immediately. A dropped
/// sender never cancels.
pub async fn await_announcement<F>(
    announcement: F,
    timeout: Duration,
    cancel: &mut watch::Receiver<bool>,
) -> AnnouncementOutcome<F::Output>
where
    F: Future,
{
    if *cancel.borrow() {
        return AnnouncementOutcome::Cancelled;
    }

    tokio::select! {
        result = tokio::time::timeout(timeout, announcement) => match result {
            Ok(value) => AnnouncementOutcome::Completed(value),
            Err(_) => {
                debug!(timeout_ms = timeout.as_millis() as u64, "Announcement timed out");
                AnnouncementOutcome::TimedOut
            }
        },
        _ = cancelled(cancel) => AnnouncementOutcome::Cancelled,
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        if *cancel.borrow() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_before_timeout() {
        let (_tx, mut rx) = watch::channel(false);
        let outcome = await_announcement(async { 7 }, Duration::from_millis(500), &mut rx).await;
        assert_eq!(outcome, AnnouncementOutcome::Completed(7));
    }

    #[tokio::test]
    async fn test_times_out() {
        let (_tx, mut rx) = watch::channel(false);
        let slow = tokio::time::sleep(Duration::from_secs(10));
        let outcome = await_announcement(slow, Duration::from_millis(20), &mut rx).await;
        assert_eq!(outcome, AnnouncementOutcome::TimedOut);
    }

    #[tokio::test]
    async fn test_cancel_signal_wins() {
        let (tx, mut rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = tx.send(true);
        });
        let slow = tokio::time::sleep(Duration::from_secs(10));
        let outcome = await_announcement(slow, Duration::from_secs(5), &mut rx).await;
        assert_eq!(outcome, AnnouncementOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_already_cancelled() {
        let (_tx, mut rx) = watch::channel(true);
        let outcome = await_announcement(async { 1 }, Duration::from_secs(1), &mut rx).await;
        assert_eq!(outcome, AnnouncementOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_dropped_sender_does_not_cancel() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        let outcome = await_announcement(
            tokio::time::sleep(Duration::from_millis(5)),
            Duration::from_millis(500),
            &mut rx,
        )
        .await;
        assert!(outcome.is_completed());
    }
}
