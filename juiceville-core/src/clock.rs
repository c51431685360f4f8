use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

/// Source of "now". Ordering hours and report dates are evaluated in the
/// shop's local time, everything stored is UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn offset(&self) -> FixedOffset;

    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&self.offset()).naive_local()
    }
}

pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Offsets outside ±24h fall back to UTC.
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock pinned to one instant; used by tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub instant: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl FixedClock {
    /// Builds a clock from a local wall-clock time at the given offset.
    pub fn at_local(local: NaiveDateTime, utc_offset_minutes: i32) -> Option<Self> {
        let offset = FixedOffset::east_opt(utc_offset_minutes * 60)?;
        let instant = local.and_local_timezone(offset).single()?.with_timezone(&Utc);
        Some(Self { instant, offset })
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fixed_clock_local_round_trip() {
        let local = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let clock = FixedClock::at_local(local, 60).unwrap();

        assert_eq!(clock.local_now(), local);
        assert_eq!(clock.now().format("%H:%M").to_string(), "08:30");
    }
}
