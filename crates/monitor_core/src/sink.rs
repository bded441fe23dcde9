use crate::{ActiveStatusView, AppViewModel, LabeledValue, ListView, StatusView};

/// Rendering target for the status view.
pub trait StatusSink {
    fn set_idle_status(&mut self);
    fn set_active_status(&mut self, status: &ActiveStatusView);
    /// Several conversions running at once.
    fn set_concurrent_status(&mut self, statuses: &[ActiveStatusView]);
    fn set_pending_list(&mut self, pending: &ListView<String>);
    fn set_completed_list(&mut self, completed: &ListView<LabeledValue>);
    fn set_statistics(&mut self, statistics: &ListView<LabeledValue>);

    /// Called once after every render pass.
    fn flush(&mut self) {}
}

/// Applies a full view to the sink.
pub fn render(view: &AppViewModel, sink: &mut dyn StatusSink) {
    match &view.status {
        StatusView::Idle => sink.set_idle_status(),
        StatusView::Active(active) => sink.set_active_status(active),
        StatusView::Concurrent(statuses) => sink.set_concurrent_status(statuses),
    }
    sink.set_pending_list(&view.pending);
    sink.set_completed_list(&view.completed);
    sink.set_statistics(&view.statistics);
    sink.flush();
}
