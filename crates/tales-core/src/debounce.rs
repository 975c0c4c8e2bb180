//! Trailing-edge debounce timer.
//!
//! Holds at most one pending value. Every `push` replaces the value and moves
//! the deadline to `now + window`; the value becomes ready once the deadline
//! passes without another push. Superseded values are dropped, never queued.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Schedule `value`, discarding any value still waiting.
    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.window));
    }

    /// When the pending value becomes ready, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn take_ready(&mut self) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= Instant::now() => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Sleep until `deadline`, or forever when there is none.
pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_last_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(WINDOW);

        for (offset, value) in [(0, "s"), (50, "st"), (100, "sto"), (150, "stor")] {
            tokio::time::sleep_until(start + Duration::from_millis(offset)).await;
            debouncer.push(value);
            assert_eq!(debouncer.take_ready(), None);
        }

        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(450))
        );

        tokio::time::sleep_until(start + Duration::from_millis(449)).await;
        assert_eq!(debouncer.take_ready(), None);

        sleep_until_deadline(debouncer.deadline()).await;
        let elapsed = Instant::now() - start;
        assert!(elapsed >= Duration::from_millis(450) && elapsed < Duration::from_millis(451));
        assert_eq!(debouncer.take_ready(), Some("stor"));
        assert_eq!(debouncer.take_ready(), None);
        assert_eq!(debouncer.deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_pushes_fire_separately() {
        let mut debouncer = Debouncer::new(WINDOW);

        debouncer.push(1);
        tokio::time::advance(WINDOW).await;
        assert_eq!(debouncer.take_ready(), Some(1));

        debouncer.push(2);
        tokio::time::advance(WINDOW).await;
        assert_eq!(debouncer.take_ready(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let mut debouncer = Debouncer::new(WINDOW);
        debouncer.push("gone");
        debouncer.cancel();
        tokio::time::advance(WINDOW * 2).await;
        assert_eq!(debouncer.take_ready(), None);
        assert_eq!(debouncer.deadline(), None);
    }
}
