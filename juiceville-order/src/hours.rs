use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// One row of the ordering schedule: either a weekday template or a dated
/// override (holiday closure or special hours).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingHours {
    pub id: Uuid,
    /// Monday = 0 … Sunday = 6; ignored when `date` is set
    pub weekday: Option<u8>,
    pub date: Option<NaiveDate>,
    pub is_open: bool,
    pub opening_time: Option<NaiveTime>,
    pub closing_time: Option<NaiveTime>,
}

impl OperatingHours {
    pub fn weekly(weekday: u8, opening_time: NaiveTime, closing_time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            weekday: Some(weekday),
            date: None,
            is_open: true,
            opening_time: Some(opening_time),
            closing_time: Some(closing_time),
        }
    }

    pub fn closed_on(weekday: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            weekday: Some(weekday),
            date: None,
            is_open: false,
            opening_time: None,
            closing_time: None,
        }
    }

    pub fn holiday(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            weekday: None,
            date: Some(date),
            is_open: false,
            opening_time: None,
            closing_time: None,
        }
    }
}

/// Ordering is allowed; how the decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Open { closes_at: NaiveTime },
    /// No schedule row covers today.
    Unscheduled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HoursError {
    #[error("We are closed today")]
    ClosedAllDay { weekday: u8 },

    #[error("We are closed on {0} for a holiday")]
    ClosedHoliday(NaiveDate),

    #[error("Opening hours for today are incomplete")]
    Misconfigured,

    #[error("Ordering is open from {opens} to {closes}")]
    OutsideWindow { opens: NaiveTime, closes: NaiveTime },

    #[error("More than one schedule row for weekday {0}")]
    DuplicateWeekday(u8),

    #[error("Weekday must be 0 to 6, got {0}")]
    InvalidWeekday(u8),
}

/// Decide whether orders may be placed at local time `now`.
///
/// A dated row for today beats the weekday row. Both ends of the window
/// are inclusive.
pub fn evaluate(schedule: &[OperatingHours], now: NaiveDateTime) -> Result<GateDecision, HoursError> {
    let today = now.date();
    let weekday = today.weekday().num_days_from_monday() as u8;

    let entry = schedule
        .iter()
        .find(|h| h.date == Some(today))
        .or_else(|| schedule.iter().find(|h| h.date.is_none() && h.weekday == Some(weekday)));

    let Some(entry) = entry else {
        warn!(%today, weekday, "No operating hours configured for today, allowing orders");
        return Ok(GateDecision::Unscheduled);
    };

    if !entry.is_open {
        return Err(match entry.date {
            Some(date) => HoursError::ClosedHoliday(date),
            None => HoursError::ClosedAllDay { weekday },
        });
    }

    let (Some(opens), Some(closes)) = (entry.opening_time, entry.closing_time) else {
        return Err(HoursError::Misconfigured);
    };

    let time = now.time();
    if time < opens || time > closes {
        return Err(HoursError::OutsideWindow { opens, closes });
    }
    Ok(GateDecision::Open { closes_at: closes })
}

/// Check the schedule holds at most one undated row per weekday.
pub fn validate_schedule(schedule: &[OperatingHours]) -> Result<(), HoursError> {
    let mut seen = [false; 7];
    for entry in schedule.iter().filter(|h| h.date.is_none()) {
        let Some(day) = entry.weekday else { continue };
        let slot = seen
            .get_mut(usize::from(day))
            .ok_or(HoursError::InvalidWeekday(day))?;
        if *slot {
            return Err(HoursError::DuplicateWeekday(day));
        }
        *slot = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2025-03-10 is a Monday
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_time(t(h, m))
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let schedule = vec![OperatingHours::weekly(0, t(9, 0), t(21, 0))];

        assert_eq!(
            evaluate(&schedule, monday_at(9, 0)),
            Ok(GateDecision::Open { closes_at: t(21, 0) })
        );
        assert!(evaluate(&schedule, monday_at(21, 0)).is_ok());
        assert!(matches!(
            evaluate(&schedule, monday_at(8, 59)),
            Err(HoursError::OutsideWindow { .. })
        ));
        assert!(evaluate(&schedule, monday_at(21, 1)).is_err());
    }

    #[test]
    fn test_holiday_beats_weekday() {
        let holiday = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let schedule = vec![
            OperatingHours::weekly(0, t(9, 0), t(21, 0)),
            OperatingHours::holiday(holiday),
        ];

        assert_eq!(
            evaluate(&schedule, monday_at(12, 0)),
            Err(HoursError::ClosedHoliday(holiday))
        );
    }

    #[test]
    fn test_closed_unscheduled_and_misconfigured() {
        let closed = vec![OperatingHours::closed_on(0)];
        assert_eq!(
            evaluate(&closed, monday_at(12, 0)),
            Err(HoursError::ClosedAllDay { weekday: 0 })
        );

        let tuesday_only = vec![OperatingHours::weekly(1, t(9, 0), t(21, 0))];
        assert_eq!(evaluate(&tuesday_only, monday_at(3, 0)), Ok(GateDecision::Unscheduled));

        let mut half = OperatingHours::weekly(0, t(9, 0), t(21, 0));
        half.closing_time = None;
        assert_eq!(evaluate(&[half], monday_at(12, 0)), Err(HoursError::Misconfigured));
    }

    #[test]
    fn test_schedule_validation() {
        let dup = vec![
            OperatingHours::weekly(2, t(9, 0), t(17, 0)),
            OperatingHours::closed_on(2),
        ];
        assert_eq!(validate_schedule(&dup), Err(HoursError::DuplicateWeekday(2)));
        assert_eq!(
            validate_schedule(&[OperatingHours::closed_on(7)]),
            Err(HoursError::InvalidWeekday(7))
        );
        assert!(validate_schedule(&[OperatingHours::holiday(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap())]).is_ok());
    }
}
