use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use timeflow_client::domain::{ApprovalStatus, DailyLog, TaskEntry, TimesheetPayload, WeekCheck};

use crate::store::StagedEdit;

pub const WEEKLY_HOUR_CAP: f64 = 40.0;
const WORKDAYS_PER_WEEK: i64 = 5;

/// Where this week stands with the approval process. `PendingApproval` and
/// `Approved` lock the editor; `RejectedEditable` keeps it open for a
/// resubmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekStatus {
    Unsubmitted,
    PendingApproval,
    Approved,
    RejectedEditable,
}

impl WeekStatus {
    pub fn is_locked(&self) -> bool {
        matches!(self, WeekStatus::PendingApproval | WeekStatus::Approved)
    }

    fn from_approval(status: ApprovalStatus) -> Self {
        match status {
            ApprovalStatus::Pending => WeekStatus::PendingApproval,
            ApprovalStatus::Approved => WeekStatus::Approved,
            ApprovalStatus::Rejected => WeekStatus::RejectedEditable,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeekStatus::Unsubmitted => "Unsubmitted",
            WeekStatus::PendingApproval => "Pending",
            WeekStatus::Approved => "Approved",
            WeekStatus::RejectedEditable => "Rejected",
        }
    }
}

/// One task row of a day, as typed. Coercion to numbers happens at
/// submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub task_id: String,
    pub duration: String,
}

impl EntryDraft {
    fn complete(&self) -> Option<TaskEntry> {
        let task_id = self.task_id.trim().parse::<i64>().ok()?;
        let duration = self
            .duration
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d > 0.0)?;
        Some(TaskEntry { task_id, duration })
    }
}

/// One worked day of the week being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayDraft {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub entries: Vec<EntryDraft>,
}

impl DayDraft {
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: String::new(),
            end_time: String::new(),
            entries: vec![EntryDraft::default()],
        }
    }

    fn from_log(log: &DailyLog) -> Self {
        Self {
            date: log.date,
            start_time: log.start_time.clone(),
            end_time: log.end_time.clone(),
            entries: log
                .task_entries
                .iter()
                .map(|entry| EntryDraft {
                    task_id: entry.task_id.to_string(),
                    duration: format_duration(entry.duration),
                })
                .collect(),
        }
    }

    /// Sum of this day's parseable positive durations.
    pub fn hours(&self) -> f64 {
        self.entries
            .iter()
            .filter_map(|entry| entry.duration.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0)
            .sum()
    }
}

fn format_duration(duration: f64) -> String {
    if duration.fract() == 0.0 {
        format!("{}", duration as i64)
    } else {
        format!("{}", duration)
    }
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayField {
    StartTime,
    EndTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryField {
    TaskId,
    Duration,
}

/// The weekly timesheet being edited. Owns the selected week, its day
/// logs, the approval state that gates editing, and the bookkeeping for
/// week-check responses (a generation counter so a response that arrives
/// after the week moved on is discarded, and a one-shot skip used when a
/// staged rejected-edit was just loaded).
#[derive(Debug, Clone)]
pub struct WeekDraft {
    pub week_start: NaiveDate,
    pub days: Vec<DayDraft>,
    pub status: WeekStatus,
    pub editing_id: Option<i64>,
    skip_next_check: bool,
    check_generation: u64,
}

impl WeekDraft {
    pub fn new(today: NaiveDate) -> Self {
        let week_start = monday_of(today);
        Self {
            week_start,
            days: vec![DayDraft::blank(week_start)],
            status: WeekStatus::Unsubmitted,
            editing_id: None,
            skip_next_check: false,
            check_generation: 0,
        }
    }

    /// Friday of the selected week.
    pub fn week_end(&self) -> NaiveDate {
        self.week_start + Duration::days(WORKDAYS_PER_WEEK - 1)
    }

    pub fn generation(&self) -> u64 {
        self.check_generation
    }

    pub fn is_locked(&self) -> bool {
        self.status.is_locked()
    }

    /// Move the selected week by whole weeks and reset to a blank draft
    /// pending the existing-submission check. Returns the new check
    /// generation so the caller can tag the in-flight request.
    pub fn change_week(&mut self, delta_weeks: i64) -> u64 {
        self.week_start = monday_of(self.week_start + Duration::days(7 * delta_weeks));
        self.days = vec![DayDraft::blank(self.week_start)];
        self.status = WeekStatus::Unsubmitted;
        self.editing_id = None;
        self.check_generation += 1;
        self.check_generation
    }

    /// Whether the existing-submission check should run. Consumes the
    /// one-shot skip armed by `load_staged_edit`, so the check resumes on
    /// the next week change.
    pub fn should_check(&mut self) -> bool {
        if self.skip_next_check {
            self.skip_next_check = false;
            false
        } else {
            true
        }
    }

    /// Apply the result of the existing-submission check. Returns false
    /// when the response belongs to an older generation and was dropped.
    pub fn apply_check(
        &mut self,
        generation: u64,
        check: WeekCheck,
        saved_draft: Option<Vec<DayDraft>>,
    ) -> bool {
        if generation != self.check_generation {
            return false;
        }

        if check.exists {
            self.status = check
                .status
                .map(WeekStatus::from_approval)
                .unwrap_or(WeekStatus::Unsubmitted);
            self.days = check.entries.iter().map(DayDraft::from_log).collect();
        } else {
            self.status = WeekStatus::Unsubmitted;
            self.days = saved_draft.unwrap_or_default();
        }

        if self.days.is_empty() {
            self.days = vec![DayDraft::blank(self.week_start)];
        }
        true
    }

    /// Seed the editor from a staged rejected submission and arm the
    /// one-shot check skip so the staged days are not immediately
    /// overwritten by the server copy.
    pub fn load_staged_edit(&mut self, staged: &StagedEdit) {
        self.week_start = monday_of(staged.week_start_date);
        self.days = staged.daily_logs.iter().map(DayDraft::from_log).collect();
        if self.days.is_empty() {
            self.days = vec![DayDraft::blank(self.week_start)];
        }
        self.status = WeekStatus::RejectedEditable;
        self.editing_id = Some(staged.id);
        self.skip_next_check = true;
        self.check_generation += 1;
    }

    /// Append a blank log for the first weekday (Mon-Fri) not already
    /// present. No-op when locked or when all five weekdays have logs.
    pub fn add_day(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        for offset in 0..WORKDAYS_PER_WEEK {
            let date = self.week_start + Duration::days(offset);
            if !self.days.iter().any(|day| day.date == date) {
                self.days.push(DayDraft::blank(date));
                return true;
            }
        }
        false
    }

    pub fn add_entry(&mut self, day: usize) {
        if self.is_locked() {
            return;
        }
        if let Some(day) = self.days.get_mut(day) {
            day.entries.push(EntryDraft::default());
        }
    }

    pub fn update_day_field(&mut self, day: usize, field: DayField, value: String) {
        if self.is_locked() {
            return;
        }
        if let Some(day) = self.days.get_mut(day) {
            match field {
                DayField::StartTime => day.start_time = value,
                DayField::EndTime => day.end_time = value,
            }
        }
    }

    pub fn update_entry(&mut self, day: usize, entry: usize, field: EntryField, value: String) {
        if self.is_locked() {
            return;
        }
        if let Some(entry) = self
            .days
            .get_mut(day)
            .and_then(|day| day.entries.get_mut(entry))
        {
            match field {
                EntryField::TaskId => entry.task_id = value,
                EntryField::Duration => entry.duration = value,
            }
        }
    }

    /// Move a day's date by whole days within Mon-Fri of the selected
    /// week. Refused when it would collide with another day's date, so
    /// dates stay distinct.
    pub fn shift_day_date(&mut self, day: usize, delta_days: i64) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(current) = self.days.get(day).map(|d| d.date) else {
            return false;
        };
        let date = current + Duration::days(delta_days);
        if date < self.week_start || date > self.week_end() {
            return false;
        }
        if self.days.iter().any(|d| d.date == date) {
            return false;
        }
        self.days[day].date = date;
        true
    }

    /// Weekly (regular, overtime) hours: day totals accumulate in date
    /// order, and whatever pushes the week past the 40-hour cap counts as
    /// overtime. Pure; recomputed every render.
    pub fn weekly_totals(&self) -> (f64, f64) {
        let mut days: Vec<&DayDraft> = self.days.iter().collect();
        days.sort_by_key(|day| day.date);

        let mut regular = 0.0;
        let mut overtime = 0.0;
        for day in days {
            let day_total = day.hours();
            if regular + day_total > WEEKLY_HOUR_CAP {
                let over = (regular + day_total) - WEEKLY_HOUR_CAP;
                overtime += over;
                regular += day_total - over;
            } else {
                regular += day_total;
            }
        }
        (regular, overtime)
    }

    /// Build the submission payload: days with both times and at least one
    /// complete task entry, entries with a task and a positive numeric
    /// duration. `None` means nothing submittable — the caller aborts
    /// locally without a network call.
    pub fn submission(&self) -> Option<TimesheetPayload> {
        let daily_logs: Vec<DailyLog> = self
            .days
            .iter()
            .filter_map(|day| {
                if day.start_time.trim().is_empty() || day.end_time.trim().is_empty() {
                    return None;
                }
                let task_entries: Vec<TaskEntry> =
                    day.entries.iter().filter_map(EntryDraft::complete).collect();
                if task_entries.is_empty() {
                    return None;
                }
                Some(DailyLog {
                    date: day.date,
                    start_time: day.start_time.clone(),
                    end_time: day.end_time.clone(),
                    task_entries,
                })
            })
            .collect();

        if daily_logs.is_empty() {
            return None;
        }
        Some(TimesheetPayload {
            week_start_date: self.week_start,
            daily_logs,
        })
    }

    /// Record a successful submission: the week locks as pending and the
    /// rejected-edit marker is gone.
    pub fn mark_submitted(&mut self) {
        self.status = WeekStatus::PendingApproval;
        self.editing_id = None;
        self.skip_next_check = false;
    }
}
