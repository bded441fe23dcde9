use crate::LinkEvent;

/// Receives link events; called from the runtime thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: LinkEvent);
}
