//! Repeating tasks for native hosts
//!
//! The browser drives the animation and the countdown through
//! `requestAnimationFrame` and `setInterval`. Outside the browser the same
//! work runs as tokio tasks that stop on a [`CancellationToken`].

use crate::countdown::{SessionCountdown, Tick};
use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Run `step` every `period` until it breaks or `token` is cancelled.
/// The first run happens one period after spawning.
pub fn spawn_repeating<F>(period: Duration, token: CancellationToken, mut step: F) -> JoinHandle<()>
where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!("Repeating task cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if step().is_break() {
                        break;
                    }
                }
            }
        }
    })
}

/// Tick a shared countdown every `period` and call `on_expire` once when
/// it reaches zero. A countdown that is already expired fires immediately.
pub fn spawn_countdown<F>(
    countdown: Arc<Mutex<SessionCountdown>>,
    period: Duration,
    token: CancellationToken,
    on_expire: F,
) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    let mut on_expire = Some(on_expire);

    let already_expired = countdown
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .is_expired();
    if already_expired {
        if let Some(on_expire) = on_expire.take() {
            on_expire();
        }
        return tokio::spawn(async {});
    }

    spawn_repeating(period, token, move || {
        let tick = countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick();
        match tick {
            Tick::Running(_) => ControlFlow::Continue(()),
            Tick::Expired | Tick::Idle => {
                if let Some(on_expire) = on_expire.take() {
                    on_expire();
                }
                ControlFlow::Break(())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let read = {
            let count = count.clone();
            move || count.load(Ordering::SeqCst)
        };
        (count, read)
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_task_stops_on_cancel() {
        let (count, read) = counter();
        let token = CancellationToken::new();

        let handle = spawn_repeating(Duration::from_secs(1), token.clone(), move || {
            count.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        });

        tokio::time::sleep(Duration::from_millis(2500)).await;
        token.cancel();
        handle.await.unwrap();

        assert_eq!(read(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn repeating_task_stops_on_break() {
        let (count, read) = counter();

        let handle = spawn_repeating(Duration::from_millis(10), CancellationToken::new(), move || {
            if count.fetch_add(1, Ordering::SeqCst) == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        handle.await.unwrap();

        assert_eq!(read(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expires_once() {
        let now = Utc::now();
        let countdown = Arc::new(Mutex::new(SessionCountdown::start(
            now + chrono::Duration::seconds(3),
            now,
        )));
        let (fired, read) = counter();

        let handle = spawn_countdown(
            countdown.clone(),
            Duration::from_secs(1),
            CancellationToken::new(),
            move || {
                fired.fetch_add(1, Ordering::SeqCst);
            },
        );
        handle.await.unwrap();

        assert_eq!(read(), 1);
        assert_eq!(countdown.lock().unwrap().remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_countdown_fires_immediately() {
        let now = Utc::now();
        let countdown = Arc::new(Mutex::new(SessionCountdown::start(now, now)));
        let (fired, read) = counter();

        spawn_countdown(countdown, Duration::from_secs(1), CancellationToken::new(), move || {
            fired.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

        assert_eq!(read(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_countdown_never_expires() {
        let now = Utc::now();
        let countdown = Arc::new(Mutex::new(SessionCountdown::start(
            now + chrono::Duration::seconds(60),
            now,
        )));
        let (fired, read) = counter();
        let token = CancellationToken::new();

        let handle = spawn_countdown(
            countdown.clone(),
            Duration::from_secs(1),
            token.clone(),
            move || {
                fired.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(5500)).await;
        token.cancel();
        handle.await.unwrap();

        assert_eq!(read(), 0);
        assert_eq!(countdown.lock().unwrap().remaining(), 55);
    }
}
