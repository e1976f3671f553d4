//! Append-only JSONL transcript of a chat session.
//!
//! One line per [`ConversationEvent`]: the event's own fields, its `event`
//! tag, and `session` and `ts` stamps. Successive runs append to the same
//! file; the `session` field tells them apart.

use basilisk_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session: String,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    ///
    /// Returns `None` with a warning when the file cannot be opened; a chat
    /// without a transcript is still a working chat.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Cannot create transcript directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Cannot open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            session: chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier stamped on every line written by this logger.
    pub fn session(&self) -> &str {
        &self.session
    }

    fn record(&self, event: &ConversationEvent) -> Value {
        let mut fields = match serde_json::to_value(event) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        fields.insert("session".to_string(), Value::from(self.session.as_str()));
        fields.insert(
            "ts".to_string(),
            Value::from(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
        Value::Object(fields)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let record = self.record(&event);
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        // Flushed per line so a crash mid-answer keeps everything before it
        if let Err(e) = writeln!(writer, "{record}").and_then(|_| writer.flush()) {
            warn!("Transcript write to {} failed: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::UserTurn {
            text: "hi".to_string(),
        });
        logger.log(ConversationEvent::PredictionCreated {
            id: None,
            stream_url: "http://localhost/streams/1".to_string(),
            version: "v".to_string(),
            prompt_tokens: 12,
        });
        let session = logger.session().to_string();
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "user_turn");
        assert_eq!(lines[0]["text"], "hi");
        assert_eq!(lines[1]["event"], "prediction_created");
        assert_eq!(lines[1]["prompt_tokens"], 12);
        assert!(lines[1]["id"].is_null());
        for line in &lines {
            assert_eq!(line["session"], session.as_str());
            assert!(line["ts"].is_string());
        }
    }

    #[test]
    fn test_appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");

        for text in ["first", "second"] {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::UserTurn {
                text: text.to_string(),
            });
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["text"], "first");
        assert_eq!(lines[1]["text"], "second");
    }

    #[test]
    fn test_stream_error_keeps_message_and_partial_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::StreamError {
            message: "connection reset".to_string(),
            partial_chars: 7,
        });
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["event"], "stream_error");
        assert_eq!(lines[0]["message"], "connection reset");
        assert_eq!(lines[0]["partial_chars"], 7);
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlConversationLogger::open(blocker.join("chat.jsonl")).is_none());
    }
}
