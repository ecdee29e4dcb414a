use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub(super) enum Action {
    /// Existing-submission check for the currently selected week. Tagged
    /// with the draft generation so stale responses are dropped.
    LoadWeek { generation: u64 },
    SaveDraft,
    Submit,
    LoadReferenceData,
    LoadList,
    EditRejected,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
