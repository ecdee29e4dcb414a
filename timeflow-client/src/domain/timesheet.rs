use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Approval status of a submitted timesheet, capitalized on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// One task worked during a day. Entries are not required to be unique
/// within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub task_id: i64,
    pub duration: f64,
}

/// One worked day inside a weekly timesheet. Times are plain `HH:MM`
/// strings, as the backend stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub task_entries: Vec<TaskEntry>,
}

/// Body of `POST /api/timesheet/create` and `PUT /api/timesheet/update/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct TimesheetPayload {
    pub week_start_date: NaiveDate,
    pub daily_logs: Vec<DailyLog>,
}

/// Response of `GET /api/timesheet/check?week_start=..`. `status` and
/// `entries` are absent when no submission exists for the week.
#[derive(Debug, Clone, Deserialize)]
pub struct WeekCheck {
    pub exists: bool,
    #[serde(default)]
    pub status: Option<ApprovalStatus>,
    #[serde(default)]
    pub entries: Vec<DailyLog>,
}

/// A stored timesheet as returned by `GET /api/timesheet/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct TimesheetRecord {
    pub id: i64,
    pub week_start_date: NaiveDate,
    pub approval_status: ApprovalStatus,
    #[serde(default)]
    pub daily_logs: Vec<DailyLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_check_without_submission_has_no_entries() {
        let check: WeekCheck = serde_json::from_str(r#"{"exists": false}"#).unwrap();
        assert!(!check.exists);
        assert!(check.status.is_none());
        assert!(check.entries.is_empty());
    }

    #[test]
    fn week_check_with_submission_carries_status_and_entries() {
        let raw = r#"{
            "exists": true,
            "status": "Pending",
            "entries": [
                {
                    "date": "2026-08-24",
                    "start_time": "09:00",
                    "end_time": "17:00",
                    "task_entries": [{"task_id": 3, "duration": 7.5}]
                }
            ]
        }"#;
        let check: WeekCheck = serde_json::from_str(raw).unwrap();
        assert_eq!(check.status, Some(ApprovalStatus::Pending));
        assert_eq!(check.entries.len(), 1);
        assert_eq!(check.entries[0].task_entries[0].duration, 7.5);
    }
}
