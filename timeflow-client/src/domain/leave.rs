use chrono::{Duration, NaiveDate};
use serde::Deserialize;

/// A leave request as returned by `GET /api/leave/track`. Statuses arrive
/// lowercase from the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub status: LeaveStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Expand approved leave requests into the inclusive set of covered dates.
/// Pending and rejected requests do not block timesheet days.
pub fn approved_leave_dates(requests: &[LeaveRequest]) -> Vec<NaiveDate> {
    let mut dates = Vec::new();

    for request in requests {
        if request.status != LeaveStatus::Approved {
            continue;
        }
        let mut day = request.start_date;
        while day <= request.end_date {
            dates.push(day);
            day += Duration::days(1);
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: LeaveStatus, start: (i32, u32, u32), end: (i32, u32, u32)) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            status,
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn expands_approved_ranges_inclusively() {
        let dates = approved_leave_dates(&[request(
            LeaveStatus::Approved,
            (2026, 8, 24),
            (2026, 8, 26),
        )]);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
                NaiveDate::from_ymd_opt(2026, 8, 26).unwrap(),
            ]
        );
    }

    #[test]
    fn ignores_non_approved_requests() {
        let dates = approved_leave_dates(&[
            request(LeaveStatus::Pending, (2026, 8, 24), (2026, 8, 25)),
            request(LeaveStatus::Rejected, (2026, 8, 26), (2026, 8, 27)),
        ]);
        assert!(dates.is_empty());
    }
}
