//! Per-message handlers turning decoded payloads into display records.

use chrono::{DateTime, TimeZone};
use monitor_logging::{monitor_debug, monitor_warn};

use crate::duration::{format_completion, projected_completion};
use crate::label::{LabelFormatter, TextMeasure};
use crate::protocol::{ConversionStatus, ConvertedFileEntry, ServerMessage, StatisticsSnapshot};
use crate::statistics::StatisticKey;
use crate::view_model::{
    ActiveStatusView, LabeledValue, ListView, StatusView, NO_FILES_CONVERTED,
    NO_FILES_TO_CONVERT, NO_STATISTICS,
};

/// Widths and precision used when building labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLayout {
    /// Total width of the view.
    pub width: usize,
    /// Width reserved for the value column next to a label.
    pub value_column: usize,
    /// Decimal places for percentages.
    pub percentage_precision: usize,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            width: 80,
            value_column: 12,
            percentage_precision: 1,
        }
    }
}

impl LabelLayout {
    pub fn label_width(&self) -> usize {
        self.width.saturating_sub(self.value_column)
    }
}

/// Outcome of routing one message.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    Status(StatusView),
    Pending {
        names: Vec<String>,
        view: ListView<String>,
    },
    Completed {
        entries: Vec<ConvertedFileEntry>,
        view: ListView<LabeledValue>,
    },
    Statistics(ListView<LabeledValue>),
    Ignored,
}

pub fn route<Tz, M>(
    message: ServerMessage,
    received_at: DateTime<Tz>,
    layout: &LabelLayout,
    formatter: &LabelFormatter<M>,
) -> Routed
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    M: TextMeasure,
{
    match message {
        ServerMessage::ConvertingFile(status) => Routed::Status(status_view(
            status.as_ref(),
            received_at,
            layout,
            formatter,
        )),
        ServerMessage::ConvertingFiles(statuses) => Routed::Status(conversions_view(
            statuses.as_deref(),
            received_at,
            layout,
            formatter,
        )),
        ServerMessage::FilesToConvert(files) => {
            let names = files.unwrap_or_default();
            let view = pending_view(&names, layout, formatter);
            Routed::Pending { names, view }
        }
        ServerMessage::ConvertedFiles(entries) => {
            let entries = entries.unwrap_or_default();
            let view = completed_view(&entries, layout, formatter);
            Routed::Completed { entries, view }
        }
        ServerMessage::Statistics(snapshot) => {
            Routed::Statistics(statistics_view(snapshot.as_ref()))
        }
        ServerMessage::Unknown { tag } => {
            monitor_warn!("Unknown message type received: {}", tag);
            Routed::Ignored
        }
    }
}

pub fn status_view<Tz, M>(
    status: Option<&ConversionStatus>,
    received_at: DateTime<Tz>,
    layout: &LabelLayout,
    formatter: &LabelFormatter<M>,
) -> StatusView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    M: TextMeasure,
{
    match status {
        Some(status) => StatusView::Active(active_view(status, received_at, layout, formatter)),
        None => StatusView::Idle,
    }
}

/// Status for a list of concurrent conversions; an empty list is idle.
pub fn conversions_view<Tz, M>(
    statuses: Option<&[ConversionStatus]>,
    received_at: DateTime<Tz>,
    layout: &LabelLayout,
    formatter: &LabelFormatter<M>,
) -> StatusView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    M: TextMeasure,
{
    let conversions = statuses
        .unwrap_or_default()
        .iter()
        .map(|status| active_view(status, received_at.clone(), layout, formatter))
        .collect();
    StatusView::from_conversions(conversions)
}

fn active_view<Tz, M>(
    status: &ConversionStatus,
    received_at: DateTime<Tz>,
    layout: &LabelLayout,
    formatter: &LabelFormatter<M>,
) -> ActiveStatusView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
    M: TextMeasure,
{
    let remaining = status
        .time_remaining
        .as_deref()
        .filter(|remaining| !remaining.trim().is_empty());
    let projected_completion = remaining
        .map(|remaining| format_completion(&projected_completion(remaining, received_at)));

    ActiveStatusView {
        filename: status.filename.clone(),
        label: formatter.fit(&status.filename, layout.label_width()),
        progress: status.progress.clamp(0.0, 100.0),
        elapsed: status.time_since_start.clone(),
        remaining: remaining.map(ToOwned::to_owned),
        projected_completion,
        backend: status.backend_name.clone(),
    }
}

pub fn pending_view<M: TextMeasure>(
    names: &[String],
    layout: &LabelLayout,
    formatter: &LabelFormatter<M>,
) -> ListView<String> {
    if names.is_empty() {
        return ListView::Placeholder(NO_FILES_TO_CONVERT);
    }
    let width = layout.label_width();
    ListView::Items(names.iter().map(|name| formatter.fit(name, width)).collect())
}

pub fn completed_view<M: TextMeasure>(
    entries: &[ConvertedFileEntry],
    layout: &LabelLayout,
    formatter: &LabelFormatter<M>,
) -> ListView<LabeledValue> {
    if entries.is_empty() {
        return ListView::Placeholder(NO_FILES_CONVERTED);
    }
    let width = layout.label_width();
    ListView::Items(
        entries
            .iter()
            .map(|entry| {
                let value = entry
                    .percentage_saved
                    .map(|saved| format!("{:.*}%", layout.percentage_precision, saved))
                    .unwrap_or_default();
                LabeledValue::new(formatter.fit(&entry.filename, width), value)
            })
            .collect(),
    )
}

pub fn statistics_view(snapshot: Option<&StatisticsSnapshot>) -> ListView<LabeledValue> {
    let Some(snapshot) = snapshot else {
        return ListView::Placeholder(NO_STATISTICS);
    };
    let rows = snapshot
        .iter()
        .filter_map(|(name, value)| match StatisticKey::from_wire(name) {
            Some(key) => Some(LabeledValue::new(key.label(), key.format_value(value))),
            None => {
                monitor_debug!("Unknown statistics key: {}", name);
                None
            }
        })
        .collect();
    ListView::Items(rows)
}
