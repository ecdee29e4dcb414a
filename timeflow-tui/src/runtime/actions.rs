use anyhow::Result;

use timeflow_client::domain::{approved_leave_dates, partition_tasks, ApprovalStatus};
use timeflow_client::{TimeflowClient, TimeflowError};

use crate::app::{App, StatusKind, View};
use crate::store::{LocalStore, StagedEdit};

use super::action_queue::{Action, ActionTx};

pub(super) async fn run_action(
    action: Action,
    app: &mut App,
    client: &TimeflowClient,
    store: &LocalStore,
    tx: &ActionTx,
) -> Result<()> {
    match action {
        Action::LoadWeek { generation } => load_week(generation, app, client, store).await,
        Action::SaveDraft => save_draft(app, store),
        Action::Submit => submit(app, client, store, tx).await,
        Action::LoadReferenceData => load_reference_data(app, client).await,
        Action::LoadList => load_list(app, client).await,
        Action::EditRejected => edit_rejected(app, store),
    }
    Ok(())
}

/// Check the server for an existing submission for the selected week and
/// reconcile the draft: server copy wins when one exists, the locally
/// saved draft fills in otherwise. Skipped exactly once right after a
/// staged rejected-edit was loaded.
async fn load_week(generation: u64, app: &mut App, client: &TimeflowClient, store: &LocalStore) {
    if !app.draft.should_check() {
        return;
    }

    let week_start = app.draft.week_start;
    match client.check_week(week_start).await {
        Ok(check) => {
            let saved_draft = store.load_draft(week_start).unwrap_or_else(|e| {
                tracing::warn!(%e, "ignoring unreadable local draft");
                None
            });
            if app.draft.apply_check(generation, check, saved_draft) {
                app.reset_cursor();
                // A pending or approved submission supersedes any staged
                // rejected-edit markers left behind.
                if app.draft.is_locked() {
                    if let Err(e) = store.clear_staged_edit() {
                        tracing::warn!(%e, "could not clear staged edit");
                    }
                }
            }
        }
        Err(e) => {
            tracing::warn!(%e, week = %week_start, "existing-submission check failed");
            app.set_status(StatusKind::Error, "Could not check this week's submission");
        }
    }
}

fn save_draft(app: &mut App, store: &LocalStore) {
    match store.save_draft(app.draft.week_start, &app.draft.days) {
        Ok(()) => app.set_status(StatusKind::Success, "Draft saved"),
        Err(e) => {
            tracing::warn!(%e, "could not save draft");
            app.set_status(StatusKind::Error, "Could not save draft");
        }
    }
}

/// Submit the week. The payload is the filtered draft; an empty filter
/// result aborts locally without touching the network. A staged
/// rejected-edit dispatches an update, anything else a create.
async fn submit(app: &mut App, client: &TimeflowClient, store: &LocalStore, tx: &ActionTx) {
    let Some(payload) = app.draft.submission() else {
        app.is_submitting = false;
        app.set_status(
            StatusKind::Error,
            "Please enter at least one valid daily log with task entries.",
        );
        return;
    };

    let result = match app.draft.editing_id {
        Some(id) => client.update_timesheet(id, &payload).await,
        None => client.create_timesheet(&payload).await,
    };
    app.is_submitting = false;

    match result {
        Ok(()) => {
            complete_submission(app, store);
            let _ = tx.send(Action::LoadList);
        }
        // Server-side validation: surface the backend's message verbatim,
        // keep the draft editable.
        Err(TimeflowError::Validation(message)) => app.set_status(StatusKind::Error, message),
        Err(TimeflowError::Unauthorized) => app.set_status(
            StatusKind::Error,
            "Session expired. Run `timeflow-tui login` to re-authenticate.",
        ),
        Err(e) => {
            tracing::error!(%e, "timesheet submission failed");
            app.set_status(StatusKind::Error, "Failed to submit the timesheet");
        }
    }
}

/// Bookkeeping after the server accepted a submission: the per-week draft
/// and any staged rejected-edit are spent, the week locks as pending, and
/// the UI lands on the list view.
fn complete_submission(app: &mut App, store: &LocalStore) {
    if let Err(e) = store.clear_draft(app.draft.week_start) {
        tracing::warn!(%e, "could not clear local draft");
    }
    if let Err(e) = store.clear_staged_edit() {
        tracing::warn!(%e, "could not clear staged edit");
    }
    app.draft.mark_submitted();
    app.set_status(StatusKind::Success, "Timesheet submitted successfully!");
    app.view = View::List;
}

/// Tasks, approved leave days and bank holidays. Each source degrades to
/// an empty set on failure.
async fn load_reference_data(app: &mut App, client: &TimeflowClient) {
    match client.assigned_tasks().await {
        Ok(tasks) => {
            let (assigned, internal) = partition_tasks(tasks);
            app.assigned_tasks = assigned;
            app.internal_tasks = internal;
        }
        Err(e) => tracing::warn!(%e, "could not load assigned tasks"),
    }

    match client.leave_requests().await {
        Ok(requests) => app.leave_dates = approved_leave_dates(&requests),
        Err(e) => tracing::warn!(%e, "could not load leave days"),
    }

    match client.bank_holidays().await {
        Ok(dates) => app.holidays = dates,
        Err(e) => tracing::warn!(%e, "could not load bank holidays"),
    }
}

async fn load_list(app: &mut App, client: &TimeflowClient) {
    match client.list_timesheets().await {
        Ok(mut records) => {
            records.sort_by(|a, b| b.week_start_date.cmp(&a.week_start_date));
            app.records = records;
            app.selected_record = 0;
        }
        Err(e) => {
            tracing::warn!(%e, "could not load timesheet list");
            app.set_status(StatusKind::Error, "Could not load timesheets");
        }
    }
}

/// Stage the selected rejected record for resubmission and re-enter the
/// editor seeded from it.
fn edit_rejected(app: &mut App, store: &LocalStore) {
    let Some(record) = app.records.get(app.selected_record) else {
        return;
    };
    if record.approval_status != ApprovalStatus::Rejected {
        app.set_status(StatusKind::Info, "Only rejected timesheets can be edited");
        return;
    }

    let staged = StagedEdit {
        id: record.id,
        week_start_date: record.week_start_date,
        daily_logs: record.daily_logs.clone(),
    };
    if let Err(e) = store.stage_edit(&staged) {
        tracing::warn!(%e, "could not stage rejected edit");
        app.set_status(StatusKind::Error, "Could not stage this timesheet for editing");
        return;
    }

    app.draft.load_staged_edit(&staged);
    app.reset_cursor();
    app.view = View::Editor;
    app.set_status(
        StatusKind::Info,
        "Editing a previously rejected timesheet. Submitting will replace the existing record.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::draft::{DayDraft, EntryDraft, WeekStatus};
    use chrono::NaiveDate;
    use timeflow_client::domain::{DailyLog, LoggedInUser, TaskEntry};
    use timeflow_client::Role;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
    }

    fn temp_store(name: &str) -> LocalStore {
        let root = std::env::temp_dir()
            .join("timeflow-tui-tests")
            .join(format!("{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        LocalStore::with_root(root)
    }

    fn test_app() -> App {
        let user = LoggedInUser {
            id: 1,
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            first_name: "Jo".to_string(),
            role: Role::Employee,
        };
        App::new(user, monday())
    }

    #[test]
    fn accepted_submission_spends_local_state_and_locks_the_week() {
        let store = temp_store("submit");
        let mut app = test_app();

        app.draft.days = vec![DayDraft {
            date: monday(),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            entries: vec![EntryDraft {
                task_id: "3".to_string(),
                duration: "8".to_string(),
            }],
        }];
        store.save_draft(monday(), &app.draft.days).unwrap();

        let staged = StagedEdit {
            id: 9,
            week_start_date: monday(),
            daily_logs: vec![DailyLog {
                date: monday(),
                start_time: "09:00".to_string(),
                end_time: "17:00".to_string(),
                task_entries: vec![TaskEntry {
                    task_id: 3,
                    duration: 8.0,
                }],
            }],
        };
        store.stage_edit(&staged).unwrap();
        app.draft.load_staged_edit(&staged);

        complete_submission(&mut app, &store);

        assert_eq!(store.load_draft(monday()).unwrap(), None);
        assert!(store.staged_edit().unwrap().is_none());
        assert_eq!(app.draft.status, WeekStatus::PendingApproval);
        assert!(app.draft.is_locked());
        assert_eq!(app.draft.editing_id, None);
        assert_eq!(app.view, View::List);
    }
}
