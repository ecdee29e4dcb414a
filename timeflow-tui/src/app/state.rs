#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Editor,
    List,
}

/// The editable slot the cursor is on within the selected day. Task and
/// duration fields are per task-entry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    StartTime,
    EndTime,
    Task(usize),
    Duration(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}
