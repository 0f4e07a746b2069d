//! The chat log and its persistent mirror.
//!
//! `ChatLog` is the only owner of the message list. Every mutation writes the
//! store first and updates memory only once the write succeeded, so the two
//! copies cannot drift apart.

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use tracing::{debug, warn};

use crate::core::message::Message;
use crate::core::storage::{KeyValueStore, StorageError};

pub const HISTORY_KEY: &str = "history.json";
pub const CORRUPT_HISTORY_KEY: &str = "history.json.corrupt";

#[derive(Debug)]
pub enum HistoryError {
    Storage(StorageError),
    Encode(serde_json::Error),
    Decode(serde_json::Error),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Storage(err) => write!(f, "{err}"),
            HistoryError::Encode(err) => write!(f, "Failed to encode chat history: {err}"),
            HistoryError::Decode(err) => write!(f, "Saved chat history is unreadable: {err}"),
        }
    }
}

impl StdError for HistoryError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            HistoryError::Storage(err) => Some(err),
            HistoryError::Encode(err) | HistoryError::Decode(err) => Some(err),
        }
    }
}

impl From<StorageError> for HistoryError {
    fn from(err: StorageError) -> Self {
        HistoryError::Storage(err)
    }
}

/// What `ChatLog::load` found in the store.
#[derive(Debug)]
pub enum LoadOutcome {
    Empty,
    Restored(usize),
    /// The slot held something that is not a message list. The raw contents
    /// were copied to [`CORRUPT_HISTORY_KEY`] when possible.
    Corrupt { error: HistoryError, backed_up: bool },
}

pub struct ChatLog {
    store: Arc<dyn KeyValueStore>,
    messages: Vec<Message>,
}

impl ChatLog {
    /// Start with an empty in-memory log without reading the store.
    pub fn empty(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            messages: Vec::new(),
        }
    }

    /// Read the persisted log. A missing slot is an empty log; an unreadable
    /// one is backed up and the log starts empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<(Self, LoadOutcome), StorageError> {
        let raw = store.get(HISTORY_KEY)?;
        let mut log = Self::empty(store);

        let Some(raw) = raw else {
            return Ok((log, LoadOutcome::Empty));
        };

        match decode(&raw) {
            Ok(messages) => {
                let count = messages.len();
                log.messages = messages;
                debug!(count, "restored chat history");
                Ok((log, LoadOutcome::Restored(count)))
            }
            Err(error) => {
                warn!(%error, "chat history slot is unreadable; starting empty");
                let backed_up = match log.store.set(CORRUPT_HISTORY_KEY, &raw) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(%err, "could not back up unreadable chat history");
                        false
                    }
                };
                Ok((log, LoadOutcome::Corrupt { error, backed_up }))
            }
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append(&mut self, message: Message) -> Result<(), HistoryError> {
        self.messages.push(message);
        if let Err(err) = self.persist() {
            self.messages.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Drop every message and remove the slot entirely.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.store.remove(HISTORY_KEY)?;
        self.messages.clear();
        Ok(())
    }

    /// Replace memory with whatever the store currently holds.
    pub fn reload(&mut self) -> Result<(), HistoryError> {
        let messages = match self.store.get(HISTORY_KEY)? {
            Some(raw) => decode(&raw)?,
            None => Vec::new(),
        };
        self.messages = messages;
        Ok(())
    }

    fn persist(&self) -> Result<(), HistoryError> {
        let encoded = serde_json::to_string(&self.messages).map_err(HistoryError::Encode)?;
        self.store.set(HISTORY_KEY, &encoded)?;
        Ok(())
    }
}

fn decode(raw: &str) -> Result<Vec<Message>, HistoryError> {
    serde_json::from_str(raw).map_err(HistoryError::Decode)
}

/// Write a plain-text transcript: user lines prefixed with `You:`, bot text
/// as-is, one blank line after every message.
pub fn write_transcript<W: Write>(messages: &[Message], writer: &mut W) -> io::Result<()> {
    for msg in messages {
        if msg.is_user() {
            for line in format!("You: {}", msg.text).lines() {
                writeln!(writer, "{line}")?;
            }
        } else {
            for line in msg.text.lines() {
                writeln!(writer, "{line}")?;
            }
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// `parley-log-YYYY-MM-DD.txt` for the given day.
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("parley-log-{}.txt", date.format("%Y-%m-%d"))
}

/// Write the transcript to a new file at `path`. An existing file is left
/// alone and reported as `AlreadyExists`.
pub fn export_transcript(messages: &[Message], path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().write(true).create_new(true).open(path)?;
    let mut writer = BufWriter::new(file);
    write_transcript(messages, &mut writer)?;
    debug!(path = %path.display(), count = messages.len(), "exported transcript");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageKind;
    use crate::core::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                path: key.into(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn persisted(store: &dyn KeyValueStore) -> Vec<Message> {
        let raw = store.get(HISTORY_KEY).unwrap().expect("slot should exist");
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn every_append_mirrors_the_whole_log() {
        let store = Arc::new(MemoryStore::new());
        let mut log = ChatLog::empty(store.clone());

        let sequence = vec![
            Message::user("one"),
            Message::bot("two"),
            Message::bot_status("three"),
            Message::user_status("four"),
        ];
        for (n, msg) in sequence.iter().enumerate() {
            log.append(msg.clone()).unwrap();
            assert_eq!(persisted(store.as_ref()), sequence[..=n].to_vec());
        }
        assert_eq!(log.messages(), sequence.as_slice());
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let mut log = ChatLog::empty(Arc::new(ReadOnlyStore));
        assert!(log.append(Message::user("lost")).is_err());
        assert!(log.is_empty());
    }

    #[test]
    fn clear_removes_slot() {
        let store = Arc::new(MemoryStore::new());
        let mut log = ChatLog::empty(store.clone());
        log.append(Message::user("hello")).unwrap();

        log.clear().unwrap();

        assert!(log.is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn load_restores_previous_session() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(temp_dir.path()));
        {
            let mut log = ChatLog::empty(store.clone());
            log.append(Message::user("hello")).unwrap();
            log.append(Message::bot("hi there")).unwrap();
        }

        let (log, outcome) = ChatLog::load(store).unwrap();

        assert!(matches!(outcome, LoadOutcome::Restored(2)));
        assert_eq!(log.messages()[1].kind, MessageKind::Bot);
        assert_eq!(log.messages()[1].text, "hi there");
    }

    #[test]
    fn load_backs_up_unreadable_history() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, "{not json").unwrap();

        let (log, outcome) = ChatLog::load(store.clone()).unwrap();

        assert!(log.is_empty());
        assert!(matches!(
            outcome,
            LoadOutcome::Corrupt {
                error: HistoryError::Decode(_),
                backed_up: true
            }
        ));
        assert_eq!(
            store.get(CORRUPT_HISTORY_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn reload_replaces_memory_with_store_contents() {
        let store = Arc::new(MemoryStore::new());
        let mut log = ChatLog::empty(store.clone());
        log.append(Message::user("kept")).unwrap();

        let newer = vec![Message::user("a"), Message::bot("b")];
        store
            .set(HISTORY_KEY, &serde_json::to_string(&newer).unwrap())
            .unwrap();
        log.reload().unwrap();

        assert_eq!(log.messages(), newer.as_slice());
    }

    #[test]
    fn transcript_prefixes_user_lines() {
        let messages = vec![Message::user("hello"), Message::bot("hi\nthere")];
        let mut out = Vec::new();
        write_transcript(&messages, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "You: hello\n\nhi\nthere\n\n");
    }

    #[test]
    fn export_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("chat.txt");
        let messages = vec![Message::user("hello"), Message::bot("hi\nthere")];

        export_transcript(&messages, &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "You: hello\n\nhi\nthere\n\n"
        );

        let err = export_transcript(&messages, &path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }

    #[test]
    fn default_export_name_uses_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(default_export_filename(date), "parley-log-2024-03-09.txt");
    }
}
