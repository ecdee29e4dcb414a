use serde::Deserialize;

/// A task the user can log hours against, as returned by
/// `GET /api/task/get_assigned_tasks`.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub requires_assignment: bool,
    #[serde(default)]
    pub assigned_to: Option<i64>,
}

/// Split the task list into (assigned, internal). Assigned tasks require an
/// assignment and carry one; internal (non-billable) tasks require none and
/// carry none. Tasks matching neither shape are dropped.
pub fn partition_tasks(tasks: Vec<Task>) -> (Vec<Task>, Vec<Task>) {
    let mut assigned = Vec::new();
    let mut internal = Vec::new();

    for task in tasks {
        if task.requires_assignment && task.assigned_to.is_some() {
            assigned.push(task);
        } else if !task.requires_assignment && task.assigned_to.is_none() {
            internal.push(task);
        }
    }

    (assigned, internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, requires_assignment: bool, assigned_to: Option<i64>) -> Task {
        Task {
            id,
            name: format!("task-{id}"),
            project_name: None,
            requires_assignment,
            assigned_to,
        }
    }

    #[test]
    fn partitions_assigned_and_internal() {
        let (assigned, internal) = partition_tasks(vec![
            task(1, true, Some(7)),
            task(2, false, None),
            task(3, true, None),
            task(4, false, Some(7)),
        ]);

        assert_eq!(assigned.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(internal.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }
}
