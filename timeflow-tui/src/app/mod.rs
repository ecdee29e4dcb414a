pub mod draft;
mod state;

pub use state::*;

use chrono::NaiveDate;
use throbber_widgets_tui::ThrobberState;

use timeflow_client::domain::{LoggedInUser, Notification, Task, TimesheetRecord};

use draft::{DayField, EntryField, WeekDraft};

pub struct App {
    pub running: bool,
    pub view: View,
    pub user: LoggedInUser,
    pub draft: WeekDraft,

    // Reference data; absence is an empty set, never an error.
    pub assigned_tasks: Vec<Task>,
    pub internal_tasks: Vec<Task>,
    pub leave_dates: Vec<NaiveDate>,
    pub holidays: Vec<NaiveDate>,

    pub records: Vec<TimesheetRecord>,
    pub selected_record: usize,
    pub notifications: Vec<Notification>,

    pub status: Option<StatusMessage>,
    pub is_submitting: bool,
    pub confirm_submit: bool,
    pub throbber_state: ThrobberState,

    pub selected_day: usize,
    pub field: EditorField,
}

impl App {
    pub fn new(user: LoggedInUser, today: NaiveDate) -> Self {
        Self {
            running: true,
            view: View::Editor,
            user,
            draft: WeekDraft::new(today),
            assigned_tasks: Vec::new(),
            internal_tasks: Vec::new(),
            leave_dates: Vec::new(),
            holidays: Vec::new(),
            records: Vec::new(),
            selected_record: 0,
            notifications: Vec::new(),
            status: None,
            is_submitting: false,
            confirm_submit: false,
            throbber_state: ThrobberState::default(),
            selected_day: 0,
            field: EditorField::StartTime,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Display name for a typed task id, with the project in parentheses
    /// for assigned tasks.
    pub fn task_name(&self, raw_id: &str) -> Option<String> {
        let id = raw_id.trim().parse::<i64>().ok()?;
        if let Some(task) = self.assigned_tasks.iter().find(|t| t.id == id) {
            return Some(match &task.project_name {
                Some(project) => format!("{} ({})", task.name, project),
                None => task.name.clone(),
            });
        }
        self.internal_tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.clone())
    }

    /// Dates greyed out in the editor: approved leave and bank holidays.
    pub fn is_excluded_date(&self, date: NaiveDate) -> bool {
        self.leave_dates.contains(&date) || self.holidays.contains(&date)
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn selected_day_entry_count(&self) -> usize {
        self.draft
            .days
            .get(self.selected_day)
            .map(|day| day.entries.len())
            .unwrap_or(0)
    }

    /// Cycle to the next field of the selected day:
    /// start -> end -> task/duration per entry -> wrap.
    pub fn next_field(&mut self) {
        let entries = self.selected_day_entry_count();
        self.field = match self.field {
            EditorField::StartTime => EditorField::EndTime,
            EditorField::EndTime if entries > 0 => EditorField::Task(0),
            EditorField::EndTime => EditorField::StartTime,
            EditorField::Task(i) => EditorField::Duration(i),
            EditorField::Duration(i) if i + 1 < entries => EditorField::Task(i + 1),
            EditorField::Duration(_) => EditorField::StartTime,
        };
    }

    pub fn prev_field(&mut self) {
        let entries = self.selected_day_entry_count();
        self.field = match self.field {
            EditorField::StartTime if entries > 0 => EditorField::Duration(entries - 1),
            EditorField::StartTime => EditorField::EndTime,
            EditorField::EndTime => EditorField::StartTime,
            EditorField::Task(0) => EditorField::EndTime,
            EditorField::Task(i) => EditorField::Duration(i - 1),
            EditorField::Duration(i) => EditorField::Task(i),
        };
    }

    pub fn select_day(&mut self, delta: i64) {
        let count = self.draft.days.len();
        if count == 0 {
            self.selected_day = 0;
            self.field = EditorField::StartTime;
            return;
        }
        let current = self.selected_day as i64;
        self.selected_day = (current + delta).clamp(0, count as i64 - 1) as usize;
        self.field = EditorField::StartTime;
    }

    /// Clamp cursor state after the draft was replaced wholesale (week
    /// change, check result, staged edit).
    pub fn reset_cursor(&mut self) {
        self.selected_day = 0;
        self.field = EditorField::StartTime;
    }

    pub fn current_field_value(&self) -> String {
        let Some(day) = self.draft.days.get(self.selected_day) else {
            return String::new();
        };
        match self.field {
            EditorField::StartTime => day.start_time.clone(),
            EditorField::EndTime => day.end_time.clone(),
            EditorField::Task(i) => day
                .entries
                .get(i)
                .map(|e| e.task_id.clone())
                .unwrap_or_default(),
            EditorField::Duration(i) => day
                .entries
                .get(i)
                .map(|e| e.duration.clone())
                .unwrap_or_default(),
        }
    }

    pub fn apply_field_edit(&mut self, value: String) {
        match self.field {
            EditorField::StartTime => {
                self.draft
                    .update_day_field(self.selected_day, DayField::StartTime, value)
            }
            EditorField::EndTime => {
                self.draft
                    .update_day_field(self.selected_day, DayField::EndTime, value)
            }
            EditorField::Task(i) => {
                self.draft
                    .update_entry(self.selected_day, i, EntryField::TaskId, value)
            }
            EditorField::Duration(i) => {
                self.draft
                    .update_entry(self.selected_day, i, EntryField::Duration, value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeflow_client::Role;

    fn test_app() -> App {
        let user = LoggedInUser {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jo".to_string(),
            role: Role::Employee,
        };
        App::new(user, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap())
    }

    #[test]
    fn field_cycle_covers_times_and_entries() {
        let mut app = test_app();
        app.draft.add_entry(0);

        let mut seen = vec![app.field];
        for _ in 0..5 {
            app.next_field();
            seen.push(app.field);
        }
        assert_eq!(
            seen,
            vec![
                EditorField::StartTime,
                EditorField::EndTime,
                EditorField::Task(0),
                EditorField::Duration(0),
                EditorField::Task(1),
                EditorField::Duration(1),
            ]
        );

        app.next_field();
        assert_eq!(app.field, EditorField::StartTime);
        app.prev_field();
        assert_eq!(app.field, EditorField::Duration(1));
    }

    #[test]
    fn day_selection_is_clamped() {
        let mut app = test_app();
        app.draft.add_day();

        app.select_day(5);
        assert_eq!(app.selected_day, 1);
        app.select_day(-5);
        assert_eq!(app.selected_day, 0);
    }
}
