use std::time::Duration;

use url::Url;

use crate::connection::ConnectionManager;
use crate::label::LabelFormatter;
use crate::protocol::ConvertedFileEntry;
use crate::router::{completed_view, pending_view, LabelLayout};
use crate::scheduler::{PollScheduler, DEFAULT_TICK_INTERVAL};
use crate::view_model::{AppViewModel, LabeledValue, ListView, StatusView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Running,
    Stopped,
}

/// Construction parameters for [`AppState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Socket address, usually from [`crate::endpoint_for_page`].
    pub endpoint: Url,
    pub tick_interval: Duration,
    pub layout: LabelLayout,
    pub start_focused: bool,
}

impl ClientSettings {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            tick_interval: DEFAULT_TICK_INTERVAL,
            layout: LabelLayout::default(),
            start_focused: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    lifecycle: Lifecycle,
    connection: ConnectionManager,
    scheduler: PollScheduler,
    layout: LabelLayout,
    formatter: LabelFormatter,
    status: StatusView,
    pending_names: Vec<String>,
    pending: ListView<String>,
    completed_entries: Vec<ConvertedFileEntry>,
    completed: ListView<LabeledValue>,
    statistics: ListView<LabeledValue>,
    dirty: bool,
}

impl AppState {
    pub fn new(settings: ClientSettings) -> Self {
        let mut scheduler = PollScheduler::new(settings.tick_interval);
        scheduler.set_focused(settings.start_focused);
        Self {
            lifecycle: Lifecycle::Created,
            connection: ConnectionManager::new(settings.endpoint),
            scheduler,
            layout: settings.layout,
            formatter: LabelFormatter::new(),
            status: StatusView::Idle,
            pending_names: Vec::new(),
            pending: ListView::default(),
            completed_entries: Vec::new(),
            completed: ListView::default(),
            statistics: ListView::default(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            connection: self.connection.state(),
            focused: self.scheduler.is_focused(),
            status: self.status.clone(),
            pending: self.pending.clone(),
            completed: self.completed.clone(),
            statistics: self.statistics.clone(),
            dirty: self.dirty,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    pub fn layout(&self) -> &LabelLayout {
        &self.layout
    }

    /// Returns whether the view changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn formatter(&self) -> &LabelFormatter {
        &self.formatter
    }

    pub(crate) fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut ConnectionManager, &mut PollScheduler) {
        (&mut self.connection, &mut self.scheduler)
    }

    pub(crate) fn set_status(&mut self, status: StatusView) {
        self.status = status;
        self.mark_dirty();
    }

    pub(crate) fn set_pending(&mut self, names: Vec<String>, view: ListView<String>) {
        self.pending_names = names;
        self.pending = view;
        self.mark_dirty();
    }

    pub(crate) fn set_completed(
        &mut self,
        entries: Vec<ConvertedFileEntry>,
        view: ListView<LabeledValue>,
    ) {
        self.completed_entries = entries;
        self.completed = view;
        self.mark_dirty();
    }

    pub(crate) fn set_statistics(&mut self, statistics: ListView<LabeledValue>) {
        self.statistics = statistics;
        self.mark_dirty();
    }

    /// Re-fits every label for a new width.
    pub(crate) fn apply_width(&mut self, width: usize) {
        if self.layout.width == width {
            return;
        }
        self.layout.width = width;
        let label_width = self.layout.label_width();
        for active in self.status.conversions_mut() {
            active.label = self.formatter.fit(&active.filename, label_width);
        }
        if !self.pending_names.is_empty() {
            self.pending = pending_view(&self.pending_names, &self.layout, &self.formatter);
        }
        if !self.completed_entries.is_empty() {
            self.completed = completed_view(&self.completed_entries, &self.layout, &self.formatter);
        }
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
