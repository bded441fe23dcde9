pub const HEADING_CONVERTING: &str = "Converting";
pub const HEADING_PENDING: &str = "Files to convert";
pub const HEADING_COMPLETED: &str = "Converted files";
pub const HEADING_STATISTICS: &str = "Statistics";

pub const BAR_WIDTH: usize = 40;
pub const BAR_FILLED: char = '#';
pub const BAR_EMPTY: char = '.';

/// Separates render passes in plain mode.
pub const PASS_SEPARATOR: &str = "--";
pub const FOOTER_HINT: &str = "q / Esc: quit";
