use std::io::{self, Write};

use crossterm::cursor::{MoveTo, MoveToNextLine};
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use monitor_core::{ActiveStatusView, LabeledValue, ListView, StatusSink, NO_FILE_CONVERTING};
use monitor_logging::monitor_warn;

use super::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Redraw the whole screen in place.
    Screen,
    /// Append each pass as plain lines.
    Plain,
}

/// Draws render passes onto a terminal or any writer.
pub struct TerminalSink<W: Write> {
    out: W,
    mode: RenderMode,
    status: Vec<String>,
    pending: Vec<String>,
    completed: Vec<String>,
    statistics: Vec<String>,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, mode: RenderMode) -> Self {
        Self {
            out,
            mode,
            status: Vec::new(),
            pending: Vec::new(),
            completed: Vec::new(),
            statistics: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn lines(&self) -> Vec<&str> {
        let sections = [
            (HEADING_CONVERTING, &self.status),
            (HEADING_PENDING, &self.pending),
            (HEADING_COMPLETED, &self.completed),
            (HEADING_STATISTICS, &self.statistics),
        ];
        let mut lines = Vec::new();
        for (heading, body) in sections {
            lines.push(heading);
            lines.extend(body.iter().map(String::as_str));
            lines.push("");
        }
        lines
    }

    fn write_pass(&mut self) -> io::Result<()> {
        let lines: Vec<String> = self.lines().into_iter().map(str::to_owned).collect();
        match self.mode {
            RenderMode::Screen => {
                queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
                for line in lines.iter().map(String::as_str).chain([FOOTER_HINT]) {
                    queue!(self.out, Print(line), MoveToNextLine(1))?;
                }
            }
            RenderMode::Plain => {
                for line in &lines {
                    writeln!(self.out, "{line}")?;
                }
                writeln!(self.out, "{PASS_SEPARATOR}")?;
            }
        }
        self.out.flush()
    }
}

impl<W: Write> StatusSink for TerminalSink<W> {
    fn set_idle_status(&mut self) {
        self.status = vec![
            format!("  {NO_FILE_CONVERTING}"),
            format!("  {}", progress_bar(0.0, BAR_WIDTH)),
        ];
    }

    fn set_active_status(&mut self, status: &ActiveStatusView) {
        self.status = status_lines(status);
    }

    fn set_concurrent_status(&mut self, statuses: &[ActiveStatusView]) {
        self.status = statuses
            .iter()
            .enumerate()
            .flat_map(|(index, status)| {
                let gap = (index > 0).then(String::new);
                gap.into_iter().chain(status_lines(status))
            })
            .collect();
    }

    fn set_pending_list(&mut self, pending: &ListView<String>) {
        self.pending = match pending {
            ListView::Placeholder(text) => vec![format!("  {text}")],
            ListView::Items(items) => items.iter().map(|item| format!("  {item}")).collect(),
        };
    }

    fn set_completed_list(&mut self, completed: &ListView<LabeledValue>) {
        self.completed = labeled_lines(completed);
    }

    fn set_statistics(&mut self, statistics: &ListView<LabeledValue>) {
        self.statistics = labeled_lines(statistics);
    }

    fn flush(&mut self) {
        if let Err(err) = self.write_pass() {
            monitor_warn!("Failed to draw status: {}", err);
        }
    }
}

fn status_lines(status: &ActiveStatusView) -> Vec<String> {
    let mut lines = vec![
        format!("  {}", status.label),
        format!("  {}", progress_bar(status.progress, BAR_WIDTH)),
        format!("  Elapsed: {}", status.elapsed),
    ];
    if let Some(remaining) = &status.remaining {
        lines.push(format!("  Remaining: {remaining}"));
    }
    if let Some(done_by) = &status.projected_completion {
        lines.push(format!("  Done by: {done_by}"));
    }
    if let Some(backend) = &status.backend {
        lines.push(format!("  Backend: {backend}"));
    }
    lines
}

/// `[####....]  42.5%`; `progress` is a percentage.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let progress = progress.clamp(0.0, 100.0);
    let filled = ((progress / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {:>5.1}%",
        BAR_FILLED.to_string().repeat(filled),
        BAR_EMPTY.to_string().repeat(width - filled),
        progress
    )
}

/// Aligns values one column past the longest label.
fn labeled_lines(list: &ListView<LabeledValue>) -> Vec<String> {
    match list {
        ListView::Placeholder(text) => vec![format!("  {text}")],
        ListView::Items(items) => {
            let pad = items
                .iter()
                .map(|item| item.label.chars().count())
                .max()
                .unwrap_or(0);
            items
                .iter()
                .map(|item| format!("  {:<pad$} {}", item.label, item.value).trim_end().to_string())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use monitor_core::{render, AppViewModel, StatusView, NO_FILES_CONVERTED};

    use super::*;

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 4), "[....]   0.0%");
        assert_eq!(progress_bar(50.0, 4), "[##..]  50.0%");
        assert_eq!(progress_bar(150.0, 4), "[####] 100.0%");
    }

    #[test]
    fn plain_mode_writes_each_section() {
        let view = AppViewModel {
            status: StatusView::Active(ActiveStatusView {
                filename: "holiday.mkv".to_string(),
                label: "holiday.mkv".to_string(),
                progress: 25.0,
                elapsed: "0:10:00".to_string(),
                remaining: Some("0:30:00".to_string()),
                projected_completion: Some("Monday 10:40".to_string()),
                backend: None,
            }),
            pending: ListView::Items(vec!["next.mkv".to_string()]),
            completed: ListView::Placeholder(NO_FILES_CONVERTED),
            statistics: ListView::Items(vec![
                LabeledValue::new("Total Files", "10"),
                LabeledValue::new("GB Saved", "3.5 GB"),
            ]),
            ..AppViewModel::default()
        };

        let mut sink = TerminalSink::new(Vec::new(), RenderMode::Plain);
        render(&view, &mut sink);
        let text = String::from_utf8(sink.into_inner()).unwrap();

        let expected = [
            "Converting",
            "  holiday.mkv",
            "  [##########..............................]  25.0%",
            "  Elapsed: 0:10:00",
            "  Remaining: 0:30:00",
            "  Done by: Monday 10:40",
            "",
            "Files to convert",
            "  next.mkv",
            "",
            "Converted files",
            "  No files converted",
            "",
            "Statistics",
            "  Total Files 10",
            "  GB Saved    3.5 GB",
            "",
            "--",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn concurrent_conversions_are_drawn_one_after_another() {
        let status = |label: &str, progress: f64, backend: &str| ActiveStatusView {
            filename: label.to_string(),
            label: label.to_string(),
            progress,
            elapsed: "0:01:00".to_string(),
            remaining: None,
            projected_completion: None,
            backend: Some(backend.to_string()),
        };
        let mut sink = TerminalSink::new(Vec::new(), RenderMode::Plain);
        sink.set_concurrent_status(&[status("a.mkv", 10.0, "nvenc"), status("b.mkv", 90.0, "cpu")]);

        assert_eq!(sink.status.len(), 9);
        assert_eq!(sink.status[0], "  a.mkv");
        assert_eq!(sink.status[3], "  Backend: nvenc");
        assert_eq!(sink.status[4], "");
        assert_eq!(sink.status[5], "  b.mkv");
        assert!(sink.status[6].ends_with(" 90.0%"));
        assert_eq!(sink.status[8], "  Backend: cpu");
    }

    #[test]
    fn idle_status_shows_placeholder_and_empty_bar() {
        let mut sink = TerminalSink::new(Vec::new(), RenderMode::Plain);
        sink.set_idle_status();
        assert_eq!(sink.status[0], "  No file being converted");
        assert!(sink.status[1].ends_with("  0.0%"));
    }
}
