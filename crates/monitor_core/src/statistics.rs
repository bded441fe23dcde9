use serde_json::Value;

/// Statistics keys the view knows how to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticKey {
    TotalFiles,
    TotalConverted,
    TotalToConvert,
    GigabytesBeforeConversion,
    GigabytesAfterConversion,
    GigabytesSaved,
    PercentageSaved,
    TotalConversionTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Count,
    Gigabytes,
    Percent,
    Duration,
}

impl StatisticKey {
    pub const ALL: [StatisticKey; 8] = [
        StatisticKey::TotalFiles,
        StatisticKey::TotalConverted,
        StatisticKey::TotalToConvert,
        StatisticKey::GigabytesBeforeConversion,
        StatisticKey::GigabytesAfterConversion,
        StatisticKey::GigabytesSaved,
        StatisticKey::PercentageSaved,
        StatisticKey::TotalConversionTime,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            StatisticKey::TotalFiles => "total_files",
            StatisticKey::TotalConverted => "total_converted",
            StatisticKey::TotalToConvert => "total_to_convert",
            StatisticKey::GigabytesBeforeConversion => "gigabytes_before_conversion",
            StatisticKey::GigabytesAfterConversion => "gigabytes_after_conversion",
            StatisticKey::GigabytesSaved => "gigabytes_saved",
            StatisticKey::PercentageSaved => "percentage_saved",
            StatisticKey::TotalConversionTime => "total_conversion_time",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatisticKey::TotalFiles => "Total Files",
            StatisticKey::TotalConverted => "Total Files Converted",
            StatisticKey::TotalToConvert => "Total Files to Convert",
            StatisticKey::GigabytesBeforeConversion => "GB Before Conversion",
            StatisticKey::GigabytesAfterConversion => "GB After Conversion",
            StatisticKey::GigabytesSaved => "GB Saved",
            StatisticKey::PercentageSaved => "Percentage Saved",
            StatisticKey::TotalConversionTime => "Total Conversion Time",
        }
    }

    pub fn unit(self) -> Unit {
        match self {
            StatisticKey::TotalFiles
            | StatisticKey::TotalConverted
            | StatisticKey::TotalToConvert => Unit::Count,
            StatisticKey::GigabytesBeforeConversion
            | StatisticKey::GigabytesAfterConversion
            | StatisticKey::GigabytesSaved => Unit::Gigabytes,
            StatisticKey::PercentageSaved => Unit::Percent,
            StatisticKey::TotalConversionTime => Unit::Duration,
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.wire_name() == name)
    }

    pub fn format_value(self, value: &Value) -> String {
        let raw = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        match self.unit() {
            Unit::Gigabytes => format!("{raw} GB"),
            Unit::Percent => format!("{raw}%"),
            Unit::Count | Unit::Duration => raw,
        }
    }
}
