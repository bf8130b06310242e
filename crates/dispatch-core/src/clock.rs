//! Injectable wall clock.
//!
//! Every store stamps records through a [`Clock`] handed in with its context, so tests can
//! pin or step time instead of sleeping.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

/// A clock that starts at `start` and advances by `step` on every reading.
///
/// Once the offset no longer fits a `DateTime` the clock stays at its last reading.
pub fn stepping_clock(start: DateTime<Utc>, step: Duration) -> Clock {
    // (readings so far, last reading)
    let state = Arc::new(Mutex::new((0i32, start)));
    Arc::new(move || {
        let mut state = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let (tick, last) = *state;
        let reading = step
            .checked_mul(tick)
            .and_then(|offset| start.checked_add_signed(offset))
            .unwrap_or(last);
        *state = (tick.saturating_add(1), reading);
        reading
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stepping_clock_advances_per_reading() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = stepping_clock(start, Duration::minutes(5));
        assert_eq!(clock(), start);
        assert_eq!(clock(), start + Duration::minutes(5));
        assert_eq!(clock(), start + Duration::minutes(10));
    }

    #[test]
    fn stepping_clock_stops_at_the_last_representable_reading() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        let clock = stepping_clock(start, Duration::hours(16));
        assert_eq!(clock(), start);
        assert_eq!(clock(), start + Duration::hours(16));
        assert_eq!(clock(), start + Duration::hours(16));
        assert_eq!(clock(), start + Duration::hours(16));
    }
}
