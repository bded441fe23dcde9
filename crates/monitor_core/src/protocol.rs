//! Wire envelope shared with the conversion server.
//!
//! Every frame is `{ "messageType": <tag>, "messageBody": <payload> }`. The
//! server has shipped several body shapes over time; decoding normalizes them
//! into [`ServerMessage`] so the router only sees one form per message.

use serde::de::Error as _;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Ordered statistics mapping; unknown keys are kept as received.
pub type StatisticsSnapshot = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConversionStatus {
    pub filename: String,
    pub progress: f64,
    #[serde(default)]
    pub time_since_start: String,
    #[serde(default)]
    pub time_remaining: Option<String>,
    #[serde(default)]
    pub backend_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConvertedFileEntry {
    pub filename: String,
    /// Missing for entries that arrive in the legacy name-only form.
    #[serde(default)]
    pub percentage_saved: Option<f64>,
}

impl ConvertedFileEntry {
    fn name_only(filename: String) -> Self {
        Self {
            filename,
            percentage_saved: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    ConvertingFile,
    /// Newer servers report every concurrent conversion in one message.
    ConvertingFiles,
    FilesToConvert,
    ConvertedFiles,
    Statistics,
}

impl MessageKind {
    pub const ALL: [MessageKind; 5] = [
        MessageKind::ConvertingFile,
        MessageKind::ConvertingFiles,
        MessageKind::FilesToConvert,
        MessageKind::ConvertedFiles,
        MessageKind::Statistics,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            MessageKind::ConvertingFile => "converting_file",
            MessageKind::ConvertingFiles => "converting_files",
            MessageKind::FilesToConvert => "files_to_convert",
            MessageKind::ConvertedFiles => "converted_files",
            MessageKind::Statistics => "statistics",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// `None` means no file is being converted.
    ConvertingFile(Option<ConversionStatus>),
    /// `None` or empty means no file is being converted.
    ConvertingFiles(Option<Vec<ConversionStatus>>),
    FilesToConvert(Option<Vec<String>>),
    ConvertedFiles(Option<Vec<ConvertedFileEntry>>),
    Statistics(Option<StatisticsSnapshot>),
    Unknown { tag: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    Ping,
}

impl ClientMessage {
    pub fn tag(self) -> &'static str {
        match self {
            ClientMessage::Ping => "ping",
        }
    }

    pub fn to_frame(self) -> String {
        serde_json::json!({ "messageType": self.tag() }).to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("frame is not a valid envelope: {0}")]
    Envelope(#[source] serde_json::Error),
    #[error("body of {tag} message is malformed: {source}")]
    Body {
        tag: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "messageType")]
    message_type: String,
    #[serde(rename = "messageBody", default)]
    message_body: Value,
}

/// Decodes one inbound text frame.
pub fn decode_frame(text: &str) -> Result<ServerMessage, ProtocolError> {
    let envelope: Envelope = serde_json::from_str(text).map_err(ProtocolError::Envelope)?;
    let Some(kind) = MessageKind::from_tag(&envelope.message_type) else {
        return Ok(ServerMessage::Unknown {
            tag: envelope.message_type,
        });
    };

    let body = envelope.message_body;
    let decoded = match kind {
        MessageKind::ConvertingFile => {
            serde_json::from_value(body).map(ServerMessage::ConvertingFile)
        }
        MessageKind::ConvertingFiles => converting_files(body).map(ServerMessage::ConvertingFiles),
        MessageKind::FilesToConvert => pending_files(body).map(ServerMessage::FilesToConvert),
        MessageKind::ConvertedFiles => converted_files(body).map(ServerMessage::ConvertedFiles),
        MessageKind::Statistics => serde_json::from_value(body).map(ServerMessage::Statistics),
    };
    decoded.map_err(|source| ProtocolError::Body {
        tag: kind.tag(),
        source,
    })
}

fn converting_files(body: Value) -> Result<Option<Vec<ConversionStatus>>, serde_json::Error> {
    match body {
        Value::Null => Ok(None),
        Value::Array(_) => serde_json::from_value(body).map(Some),
        Value::Object(mut fields) => match fields.remove("converting_files") {
            Some(entries) => serde_json::from_value(entries),
            None => Ok(None),
        },
        other => Err(serde_json::Error::custom(format!(
            "expected a list of conversions, got {other}"
        ))),
    }
}

fn pending_files(body: Value) -> Result<Option<Vec<String>>, serde_json::Error> {
    match body {
        Value::Null => Ok(None),
        Value::Array(_) => serde_json::from_value(body).map(Some),
        Value::Object(mut fields) => match fields.remove("filenames") {
            Some(names) => serde_json::from_value(names),
            None => Ok(None),
        },
        other => Err(serde_json::Error::custom(format!(
            "expected a list of filenames, got {other}"
        ))),
    }
}

fn converted_files(body: Value) -> Result<Option<Vec<ConvertedFileEntry>>, serde_json::Error> {
    match body {
        Value::Null => Ok(None),
        Value::Array(_) => serde_json::from_value(body).map(Some),
        Value::Object(mut fields) => {
            if let Some(entries) = fields.remove("converted_files") {
                return serde_json::from_value(entries);
            }
            match fields.remove("filenames") {
                Some(names) => {
                    let names: Option<Vec<String>> = serde_json::from_value(names)?;
                    Ok(names.map(|names| {
                        names.into_iter().map(ConvertedFileEntry::name_only).collect()
                    }))
                }
                None => Ok(None),
            }
        }
        other => Err(serde_json::Error::custom(format!(
            "expected converted file entries, got {other}"
        ))),
    }
}
