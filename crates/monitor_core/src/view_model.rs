use crate::ConnectionState;

pub const NO_FILE_CONVERTING: &str = "No file being converted";
pub const NO_FILES_TO_CONVERT: &str = "No files to convert";
pub const NO_FILES_CONVERTED: &str = "No files converted";
pub const NO_STATISTICS: &str = "No statistics";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub connection: ConnectionState,
    pub focused: bool,
    pub status: StatusView,
    pub pending: ListView<String>,
    pub completed: ListView<LabeledValue>,
    pub statistics: ListView<LabeledValue>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum StatusView {
    #[default]
    Idle,
    Active(ActiveStatusView),
    /// Two or more files converting at once, in server order.
    Concurrent(Vec<ActiveStatusView>),
}

impl StatusView {
    /// Builds the view for a list of conversions: none is idle, one is active.
    pub fn from_conversions(mut conversions: Vec<ActiveStatusView>) -> Self {
        match conversions.len() {
            0 => StatusView::Idle,
            1 => StatusView::Active(conversions.remove(0)),
            _ => StatusView::Concurrent(conversions),
        }
    }

    pub fn conversions(&self) -> &[ActiveStatusView] {
        match self {
            StatusView::Idle => &[],
            StatusView::Active(active) => std::slice::from_ref(active),
            StatusView::Concurrent(conversions) => conversions,
        }
    }

    /// Mean progress over all running conversions; zero when idle.
    pub fn progress(&self) -> f64 {
        let conversions = self.conversions();
        if conversions.is_empty() {
            return 0.0;
        }
        conversions.iter().map(|active| active.progress).sum::<f64>() / conversions.len() as f64
    }

    pub(crate) fn conversions_mut(&mut self) -> &mut [ActiveStatusView] {
        match self {
            StatusView::Idle => &mut [],
            StatusView::Active(active) => std::slice::from_mut(active),
            StatusView::Concurrent(conversions) => conversions,
        }
    }
}

/// Display record for the file currently being converted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveStatusView {
    pub filename: String,
    /// `filename` fitted to the available width.
    pub label: String,
    /// Clamped to `0.0..=100.0`.
    pub progress: f64,
    pub elapsed: String,
    pub remaining: Option<String>,
    pub projected_completion: Option<String>,
    pub backend: Option<String>,
}

/// Either the collection to show or the text shown in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<T> {
    Placeholder(&'static str),
    Items(Vec<T>),
}

impl<T> ListView<T> {
    pub fn items(&self) -> &[T] {
        match self {
            ListView::Placeholder(_) => &[],
            ListView::Items(items) => items,
        }
    }
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        ListView::Items(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
}

impl LabeledValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}
