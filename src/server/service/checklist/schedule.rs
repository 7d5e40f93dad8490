//! Expansion of an assignment's schedule into concrete execution dates and periods.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use entity::sea_orm_active_enums::{AssignmentPeriod, ExecutionPeriod, ScheduleType};

use crate::server::{error::checklist::ChecklistError, model::db::AssignmentModel};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses the JSON array of `YYYY-MM-DD` strings stored on custom assignments
pub fn parse_custom_dates(raw: &str) -> Result<Vec<NaiveDate>, ChecklistError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let values: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| ChecklistError::InvalidSchedule(format!("custom dates: {}", e)))?;

    values
        .iter()
        .map(|value| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map_err(|_| ChecklistError::InvalidSchedule(format!("invalid date {:?}", value)))
        })
        .collect()
}

pub fn encode_custom_dates(dates: &[NaiveDate]) -> String {
    let values: Vec<String> = dates
        .iter()
        .map(|date| date.format(DATE_FORMAT).to_string())
        .collect();

    serde_json::Value::from(values).to_string()
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every date in `[start, end]` accepted by `keep`
fn days_between(start: NaiveDate, end: NaiveDate, keep: impl Fn(NaiveDate) -> bool) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| keep(*date))
        .collect()
}

/// Sorted dates on which `assignment` produces executions.
///
/// `this_week` covers Monday to Sunday of the week containing `today`, clipped to the
/// assignment range. Custom dates are taken as stored.
pub fn active_dates(
    assignment: &AssignmentModel,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>, ChecklistError> {
    let (start, end) = (assignment.start_date, assignment.end_date);

    let mut dates = match assignment.schedule_type {
        ScheduleType::Custom => parse_custom_dates(&assignment.custom_dates)?,
        ScheduleType::ThisWeek => {
            let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));

            monday
                .iter_days()
                .take(7)
                .filter(|date| start <= *date && *date <= end)
                .collect()
        }
        ScheduleType::WeekdaysMonth => days_between(start, end, |date| !is_weekend(date)),
        ScheduleType::WeekendsMonth => days_between(start, end, is_weekend),
        ScheduleType::Daily => days_between(start, end, |_| true),
    };

    dates.sort();
    dates.dedup();

    Ok(dates)
}

/// Execution periods an assignment period expands to
pub fn periods(period: AssignmentPeriod) -> &'static [ExecutionPeriod] {
    match period {
        AssignmentPeriod::Morning => &[ExecutionPeriod::Morning],
        AssignmentPeriod::Afternoon => &[ExecutionPeriod::Afternoon],
        AssignmentPeriod::Both => &[ExecutionPeriod::Morning, ExecutionPeriod::Afternoon],
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use entity::sea_orm_active_enums::{AssignmentPeriod, ExecutionPeriod, ScheduleType};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(schedule_type: ScheduleType, start: NaiveDate, end: NaiveDate) -> AssignmentModel {
        AssignmentModel {
            id: 1,
            template_id: 1,
            assigned_to: 1,
            assigned_by: 1,
            schedule_type,
            custom_dates: "[]".to_string(),
            start_date: start,
            end_date: end,
            period: AssignmentPeriod::Morning,
            is_active: true,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Expect weekday schedules to skip Saturdays and Sundays
    #[test]
    fn weekdays_skip_weekends() {
        // 2026-10-12 is a Monday
        let assignment = assignment(ScheduleType::WeekdaysMonth, date(2026, 10, 12), date(2026, 10, 19));

        let dates = active_dates(&assignment, date(2026, 10, 12)).unwrap();

        assert_eq!(dates.len(), 6);
        assert!(!dates.contains(&date(2026, 10, 17)));
        assert!(!dates.contains(&date(2026, 10, 18)));
        assert_eq!(dates.last(), Some(&date(2026, 10, 19)));
    }

    /// Expect weekend schedules to keep only Saturdays and Sundays
    #[test]
    fn weekends_only() {
        let assignment = assignment(ScheduleType::WeekendsMonth, date(2026, 10, 1), date(2026, 10, 31));

        let dates = active_dates(&assignment, date(2026, 10, 1)).unwrap();

        assert_eq!(dates.len(), 9);
        assert!(dates.iter().all(|d| is_weekend(*d)));
    }

    /// Expect this_week to cover the current week clipped to the assignment range
    #[test]
    fn this_week_is_clipped() {
        let assignment = assignment(ScheduleType::ThisWeek, date(2026, 10, 14), date(2026, 12, 31));

        // Friday of the week starting 2026-10-12
        let dates = active_dates(&assignment, date(2026, 10, 16)).unwrap();

        assert_eq!(dates.first(), Some(&date(2026, 10, 14)));
        assert_eq!(dates.last(), Some(&date(2026, 10, 18)));
        assert_eq!(dates.len(), 5);
    }

    /// Expect daily schedules to include both ends of the range
    #[test]
    fn daily_is_inclusive() {
        let assignment = assignment(ScheduleType::Daily, date(2026, 2, 27), date(2026, 3, 2));

        let dates = active_dates(&assignment, date(2026, 2, 27)).unwrap();

        assert_eq!(
            dates,
            vec![date(2026, 2, 27), date(2026, 2, 28), date(2026, 3, 1), date(2026, 3, 2)]
        );
    }

    /// Expect custom dates to be sorted and deduplicated, and garbage to be rejected
    #[test]
    fn custom_dates() {
        let mut custom = assignment(ScheduleType::Custom, date(2026, 1, 1), date(2026, 1, 1));
        custom.custom_dates = r#"["2026-10-20","2026-10-18","2026-10-20"]"#.to_string();

        let dates = active_dates(&custom, date(2026, 1, 1)).unwrap();
        assert_eq!(dates, vec![date(2026, 10, 18), date(2026, 10, 20)]);

        custom.custom_dates = r#"["20/10/2026"]"#.to_string();
        assert!(matches!(
            active_dates(&custom, date(2026, 1, 1)),
            Err(ChecklistError::InvalidSchedule(_))
        ));
    }

    /// Expect "both" to expand to a morning and an afternoon execution
    #[test]
    fn both_expands_to_two_periods() {
        assert_eq!(
            periods(AssignmentPeriod::Both),
            &[ExecutionPeriod::Morning, ExecutionPeriod::Afternoon]
        );
        assert_eq!(periods(AssignmentPeriod::Afternoon), &[ExecutionPeriod::Afternoon]);
    }

    /// Expect stored custom dates to parse back to the same list
    #[test]
    fn encodes_custom_dates() {
        let dates = vec![date(2026, 10, 16), date(2026, 10, 17)];

        assert_eq!(encode_custom_dates(&dates), r#"["2026-10-16","2026-10-17"]"#);
        assert_eq!(parse_custom_dates(&encode_custom_dates(&dates)).unwrap(), dates);
    }
}
