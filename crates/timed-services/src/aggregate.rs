//! Report aggregation
//!
//! The total over a filtered set is exposed as `total-time` metadata next
//! to listings and exports. Summation is commutative, so the result does
//! not depend on filter or sort order, and an empty set totals zero.

use chrono::Duration;
use timed_models::Report;

/// Sum the durations of the given reports. O(n), order-invariant.
pub fn total_duration<'a, I>(reports: I) -> Duration
where
    I: IntoIterator<Item = &'a Report>,
{
    reports
        .into_iter()
        .fold(Duration::zero(), |acc, report| acc + report.duration())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use timed_core::format_duration;

    use super::*;

    fn report(id: i64, minutes: i64) -> Report {
        Report {
            id,
            user_id: 1,
            task_id: 1,
            date: NaiveDate::from_ymd_opt(2017, 2, 1).unwrap(),
            duration_secs: minutes * 60,
            comment: String::new(),
            review: false,
            not_billable: false,
            verified_by_id: None,
        }
    }

    #[test]
    fn test_empty_set_totals_zero() {
        let reports: Vec<Report> = vec![];
        assert_eq!(total_duration(&reports), Duration::zero());
        assert_eq!(format_duration(total_duration(&reports)), "00:00:00");
    }

    #[test]
    fn test_single_report_total() {
        let reports = vec![report(1, 50)];
        assert_eq!(format_duration(total_duration(&reports)), "00:50:00");
    }

    #[test]
    fn test_total_is_order_invariant() {
        let mut reports = vec![report(1, 15), report(2, 480), report(3, 45)];
        let forward = total_duration(&reports);
        reports.reverse();
        assert_eq!(total_duration(&reports), forward);
        assert_eq!(format_duration(forward), "09:00:00");
    }

    #[test]
    fn test_total_may_exceed_a_day() {
        let reports: Vec<_> = (0..30).map(|i| report(i, 60)).collect();
        assert_eq!(format_duration(total_duration(&reports)), "30:00:00");
    }
}
