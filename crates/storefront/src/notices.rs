//! Transient user-facing messages with auto-dismiss.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

use shopcart_cart::{CartOutcome, LineChange};

/// How long a notice stays up.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(2500);

pub const ADDED: &str = "Added to cart successfully!";
pub const INCREASED: &str = "Quantity increased!";

pub fn removed(name: &str) -> String {
    format!("{name} removed from cart!")
}

/// Notice after adding a product.
pub fn after_add(outcome: &CartOutcome) -> Option<String> {
    if let Some(exceeded) = outcome.stock_exceeded {
        return Some(exceeded.to_string());
    }
    match outcome.change {
        LineChange::Created(_) => Some(ADDED.to_string()),
        LineChange::Updated(_) => Some(INCREASED.to_string()),
        LineChange::Unchanged(_) | LineChange::Removed(_) => None,
    }
}

/// Notice after a quantity change or removal. `name` is the product shown
/// on the affected line, when known.
pub fn after_update(outcome: &CartOutcome, name: Option<&str>) -> Option<String> {
    if let Some(exceeded) = outcome.stock_exceeded {
        return Some(exceeded.to_string());
    }
    match (&outcome.change, name) {
        (LineChange::Removed(Some(_)), Some(name)) => Some(removed(name)),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct NoticeState {
    current: Option<String>,
    /// Bumped on every `show`; a timer only clears the notice it scheduled.
    generation: u64,
}

/// The current notice, if any.
///
/// Showing a notice cancels the previous dismiss timer. A timer that fires
/// anyway (already past its sleep) checks the generation and leaves a newer
/// notice alone. Needs a tokio runtime.
#[derive(Debug)]
pub struct Notices {
    state: Arc<Mutex<NoticeState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    dismiss_after: Duration,
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Notices {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(NoticeState::default())),
            timer: Mutex::new(None),
            dismiss_after,
        }
    }

    pub fn show(&self, text: impl Into<String>) {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.current = Some(text.into());
            state.generation
        };

        let state = Arc::clone(&self.state);
        let dismiss_after = self.dismiss_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            let mut state = lock(&state);
            if state.generation == generation {
                state.current = None;
            }
        });

        if let Some(previous) = lock(&self.timer).replace(handle) {
            previous.abort();
        }
    }

    pub fn current(&self) -> Option<String> {
        lock(&self.state).current.clone()
    }

    pub fn dismiss(&self) {
        lock(&self.state).current = None;
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}

impl Drop for Notices {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// With the clock paused, sleeping auto-advances through earlier timers.
    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn notice_dismisses_itself() {
        let notices = Notices::default();
        notices.show(ADDED);
        assert_eq!(notices.current().as_deref(), Some(ADDED));

        advance(2499).await;
        assert_eq!(notices.current().as_deref(), Some(ADDED));

        advance(2).await;
        assert_eq!(notices.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn newer_notice_restarts_the_timer() {
        let notices = Notices::default();
        notices.show(ADDED);
        advance(2000).await;

        notices.show(INCREASED);
        advance(1000).await;
        assert_eq!(notices.current().as_deref(), Some(INCREASED));

        advance(1600).await;
        assert_eq!(notices.current(), None);
    }

    #[test]
    fn outcome_messages() {
        use shopcart_cart::{CartLine, StockExceeded};
        use shopcart_core::ProductId;

        let line = CartLine::first(ProductId::new());
        assert_eq!(
            after_add(&CartOutcome::new(LineChange::Created(line.clone()))).as_deref(),
            Some(ADDED)
        );
        assert_eq!(
            after_add(&CartOutcome::new(LineChange::Updated(line.clone()))).as_deref(),
            Some(INCREASED)
        );
        assert_eq!(
            after_add(&CartOutcome::with_stock_exceeded(
                LineChange::Unchanged(line.clone()),
                StockExceeded { available: 2 }
            ))
            .as_deref(),
            Some("Only 2 items in stock!")
        );
        assert_eq!(
            after_update(&CartOutcome::new(LineChange::Removed(Some(line.clone()))), Some("boot"))
                .as_deref(),
            Some("boot removed from cart!")
        );
        assert_eq!(after_update(&CartOutcome::new(LineChange::Updated(line)), Some("boot")), None);
        assert_eq!(after_update(&CartOutcome::new(LineChange::Removed(None)), None), None);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismiss() {
        let notices = Notices::default();
        notices.show(removed("boot"));
        assert_eq!(notices.current().as_deref(), Some("boot removed from cart!"));

        notices.dismiss();
        assert_eq!(notices.current(), None);
    }
}
