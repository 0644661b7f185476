//! Client-side access token countdown
//!
//! The remaining lifetime is computed once from the stored expiry and then
//! decremented locally, one tick per second. The server is never asked
//! again; when the count hits zero the caller is told exactly once.

use chrono::{DateTime, Local, Utc};
use std::fmt;

/// Seconds granted by an explicit extension
pub const EXTEND_SECONDS: u64 = 300;

/// Result of one countdown tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Still valid, with the seconds left after this tick
    Running(u64),
    /// This tick reached zero. Reported once per expiry.
    Expired,
    /// Already expired before this tick
    Idle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    Initialized,
    Extended,
}

/// Timestamped entry of the in-memory token log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub at: DateTime<Utc>,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            ActivityKind::Initialized => "Token initialized",
            ActivityKind::Extended => "Session extended",
        };
        let time = self.at.with_timezone(&Local).format("%H:%M:%S");
        write!(f, "{verb} at {time}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCountdown {
    remaining: u64,
    expired: bool,
    log: Vec<ActivityEntry>,
}

impl SessionCountdown {
    /// Start counting down towards `expires`.
    ///
    /// A token that is already past its expiry starts at zero and is
    /// expired immediately, so the caller can log out without waiting for a
    /// tick.
    pub fn start(expires: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let remaining = u64::try_from((expires - now).num_seconds()).unwrap_or(0);
        Self {
            remaining,
            expired: remaining == 0,
            log: vec![ActivityEntry {
                kind: ActivityKind::Initialized,
                at: now,
            }],
        }
    }

    pub fn tick(&mut self) -> Tick {
        if self.expired {
            return Tick::Idle;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.expired = true;
            tracing::info!("Access token countdown reached zero");
            Tick::Expired
        } else {
            Tick::Running(self.remaining)
        }
    }

    /// Reset to [`EXTEND_SECONDS`] and record the extension
    pub fn extend(&mut self, now: DateTime<Utc>) {
        self.extend_by(EXTEND_SECONDS, now);
    }

    /// Reset to `seconds` and record the extension
    pub fn extend_by(&mut self, seconds: u64, now: DateTime<Utc>) {
        self.remaining = seconds;
        self.expired = seconds == 0;
        self.log.push(ActivityEntry {
            kind: ActivityKind::Extended,
            at: now,
        });
    }

    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    /// Activity entries, oldest first
    pub fn log(&self) -> &[ActivityEntry] {
        &self.log
    }

    /// Remaining time as `M:SS`
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn start_floors_to_whole_seconds() {
        let countdown = SessionCountdown::start(now() + Duration::milliseconds(125_000), now());
        assert_eq!(countdown.remaining(), 125);

        let countdown = SessionCountdown::start(now() + Duration::milliseconds(125_999), now());
        assert_eq!(countdown.remaining(), 125);
        assert!(!countdown.is_expired());
    }

    #[test]
    fn past_expiry_starts_expired_at_zero() {
        let countdown = SessionCountdown::start(now() - Duration::minutes(5), now());
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_expired());

        let countdown = SessionCountdown::start(now() + Duration::milliseconds(400), now());
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_expired());
    }

    #[test]
    fn expires_exactly_once_after_all_ticks() {
        let mut countdown = SessionCountdown::start(now() + Duration::milliseconds(125_000), now());

        let ticks: Vec<Tick> = (0..125).map(|_| countdown.tick()).collect();

        assert_eq!(countdown.remaining(), 0);
        assert_eq!(ticks.iter().filter(|t| **t == Tick::Expired).count(), 1);
        assert_eq!(ticks.last(), Some(&Tick::Expired));
        assert_eq!(ticks[0], Tick::Running(124));

        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.tick(), Tick::Idle);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn extend_resets_to_fixed_window() {
        let start = now();
        let mut countdown = SessionCountdown::start(start + Duration::hours(2), start);
        assert_eq!(countdown.remaining(), 7200);

        countdown.extend(start + Duration::seconds(1));
        assert_eq!(countdown.remaining(), EXTEND_SECONDS);
        assert_eq!(countdown.log().len(), 2);

        for _ in 0..10 {
            countdown.tick();
        }
        countdown.extend(start + Duration::seconds(12));
        assert_eq!(countdown.remaining(), 300);
        assert_eq!(countdown.log().len(), 3);
        assert_eq!(countdown.log()[2].kind, ActivityKind::Extended);
    }

    #[test]
    fn extend_rearms_an_expired_countdown() {
        let mut countdown = SessionCountdown::start(now(), now());
        assert_eq!(countdown.tick(), Tick::Idle);

        countdown.extend(now());
        assert!(!countdown.is_expired());
        assert_eq!(countdown.tick(), Tick::Running(299));
    }

    #[test]
    fn extend_by_uses_the_given_window() {
        let mut countdown = SessionCountdown::start(now() + Duration::seconds(5), now());
        countdown.extend_by(60, now());
        assert_eq!(countdown.remaining(), 60);
        assert_eq!(countdown.display(), "1:00");
    }

    #[test]
    fn log_starts_with_initialization() {
        let countdown = SessionCountdown::start(now() + Duration::seconds(30), now());
        let log = countdown.log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, ActivityKind::Initialized);
        assert!(log[0].to_string().starts_with("Token initialized at "));
    }

    #[test]
    fn display_pads_seconds() {
        let countdown = SessionCountdown::start(now() + Duration::seconds(125), now());
        assert_eq!(countdown.display(), "2:05");

        let countdown = SessionCountdown::start(now(), now());
        assert_eq!(countdown.display(), "0:00");
    }
}
