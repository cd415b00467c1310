use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};
use parking_lot::RwLock;

const MILLIS_PER_HOUR: u128 = 3_600_000;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock that can be frozen at an instant and moved by hand.
#[derive(Debug, Default)]
pub struct SimClock {
    frozen: RwLock<Option<Timestamp>>,
}

impl SimClock {
    pub fn system() -> SimClock {
        SimClock::default()
    }

    pub fn frozen_at(at: Timestamp) -> SimClock {
        SimClock {
            frozen: RwLock::new(Some(at)),
        }
    }

    pub fn freeze(&self, at: Timestamp) {
        *self.frozen.write() = Some(at);
    }

    pub fn resume(&self) {
        *self.frozen.write() = None;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.read().is_some()
    }

    /// Moves a frozen clock forward; a running clock is left alone.
    pub fn advance(&self, by: SignedDuration) {
        let mut frozen = self.frozen.write();
        if let Some(at) = frozen.as_mut() {
            if let Ok(next) = at.checked_add(by) {
                *at = next;
            }
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> Timestamp {
        self.frozen.read().unwrap_or_else(Timestamp::now)
    }
}

/// Parses an ISO-8601 instant. Inputs without an offset are read as UTC.
pub fn parse_instant(input: &str) -> Option<Timestamp> {
    let input = input.trim();
    if let Ok(ts) = input.parse::<Timestamp>() {
        return Some(ts);
    }
    if let Ok(dt) = input.parse::<DateTime>() {
        return dt.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp());
    }
    input
        .parse::<Date>()
        .ok()
        .and_then(|d| d.to_zoned(TimeZone::UTC).ok())
        .map(|z| z.timestamp())
}

/// Parses a `+<minutes>` clock offset. Offsets too large for a duration
/// are rejected.
pub fn parse_offset(input: &str) -> Option<SignedDuration> {
    let minutes = input.strip_prefix('+')?.parse::<i64>().ok()?;
    minutes.checked_mul(60).map(SignedDuration::from_secs)
}

/// Travel time for `miles` at `speed_mph`, truncated to whole milliseconds.
pub fn travel_time(miles: u64, speed_mph: u64) -> Option<SignedDuration> {
    let millis = u128::from(miles)
        .checked_mul(MILLIS_PER_HOUR)?
        .checked_div(u128::from(speed_mph))?;
    i64::try_from(millis).ok().map(SignedDuration::from_millis)
}

/// Share of the departure..arrival window elapsed at `now`, in whole percent
/// rounded half up. Clamped to 0..=100.
pub fn progress_percent(departure: Timestamp, arrival: Timestamp, now: Timestamp) -> u8 {
    let total = arrival.duration_since(departure).as_millis();
    if total <= 0 {
        return 100;
    }
    let elapsed = now.duration_since(departure).as_millis().clamp(0, total);
    let percent = (elapsed * 200 + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}
