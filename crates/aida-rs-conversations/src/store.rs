//! Conversation log interface and the JSONL file implementation.

use crate::error::ConversationError;
use aida_rs_protocol::{ChatExchange, SessionId};
use async_trait::async_trait;
use log::{debug, info};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[async_trait]
/// Sink for completed chat exchanges.
pub trait ConversationLog: Send + Sync {
    /// Persist one exchange.
    async fn log_exchange(&self, exchange: &ChatExchange) -> Result<(), ConversationError>;

    /// Exchanges for a session, oldest first.
    async fn history(&self, session_id: SessionId) -> Result<Vec<ChatExchange>, ConversationError>;
}

/// File-backed conversation log storing JSONL exchanges per session.
#[derive(Debug, Clone)]
pub struct FileConversationLog {
    /// Root directory for session files.
    root: PathBuf,
    /// Serialises appends so concurrent exchanges never share a line.
    append_lock: Arc<Mutex<()>>,
}

impl FileConversationLog {
    /// Create a log rooted at `root`, creating the directory if missing.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, ConversationError> {
        let root = root.as_ref().to_path_buf();
        if root.exists() && !root.is_dir() {
            return Err(ConversationError::InvalidRoot(root.display().to_string()));
        }
        std::fs::create_dir_all(&root)?;
        info!("initialized conversation log (root={})", root.display());
        Ok(Self {
            root,
            append_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Path to the session JSONL file.
    fn session_path(&self, session_id: SessionId) -> PathBuf {
        self.root.join(format!("{session_id}.jsonl"))
    }

    fn load_exchanges(&self, session_id: SessionId) -> Result<Vec<ChatExchange>, ConversationError> {
        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = OpenOptions::new().read(true).open(path)?;
        let reader = BufReader::new(file);
        let mut exchanges = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            exchanges.push(serde_json::from_str(&line)?);
        }
        Ok(exchanges)
    }
}

#[async_trait]
impl ConversationLog for FileConversationLog {
    async fn log_exchange(&self, exchange: &ChatExchange) -> Result<(), ConversationError> {
        let mut record = serde_json::to_string(exchange)?;
        record.push('\n');
        {
            let _guard = self.append_lock.lock();
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.session_path(exchange.session_id))?;
            file.write_all(record.as_bytes())?;
        }
        debug!(
            "logged exchange (session_id={}, fallback={}, response_len={})",
            exchange.session_id,
            exchange.fallback,
            exchange.ai_response.len()
        );
        Ok(())
    }

    async fn history(&self, session_id: SessionId) -> Result<Vec<ChatExchange>, ConversationError> {
        let mut exchanges = self.load_exchanges(session_id)?;
        exchanges.sort_by_key(|exchange| exchange.timestamp);
        debug!(
            "loaded history (session_id={session_id}, returned={})",
            exchanges.len()
        );
        Ok(exchanges)
    }
}

/// Log that discards every exchange; used when logging is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopConversationLog;

#[async_trait]
impl ConversationLog for NoopConversationLog {
    async fn log_exchange(&self, _exchange: &ChatExchange) -> Result<(), ConversationError> {
        Ok(())
    }

    async fn history(&self, _session_id: SessionId) -> Result<Vec<ChatExchange>, ConversationError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationLog, FileConversationLog, NoopConversationLog};
    use crate::error::ConversationError;
    use aida_rs_protocol::ChatExchange;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use uuid::Uuid;

    #[tokio::test]
    async fn missing_session_has_empty_history() {
        let temp = tempdir().expect("tempdir");
        let log = FileConversationLog::new(temp.path()).expect("log");
        let history = log.history(Uuid::new_v4()).await.expect("history");
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn sessions_are_stored_in_separate_files() {
        let temp = tempdir().expect("tempdir");
        let log = FileConversationLog::new(temp.path()).expect("log");
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        log.log_exchange(&ChatExchange::new(first, "hi", "hello"))
            .await
            .expect("log first");
        log.log_exchange(&ChatExchange::new(second, "yo", "hey"))
            .await
            .expect("log second");

        assert!(temp.path().join(format!("{first}.jsonl")).exists());
        let history = log.history(first).await.expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_message, "hi");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_keep_every_line_whole() {
        let temp = tempdir().expect("tempdir");
        let log = FileConversationLog::new(temp.path()).expect("log");
        let session_id = Uuid::new_v4();

        let mut tasks = Vec::new();
        for worker in 0..8 {
            let log = log.clone();
            tasks.push(tokio::spawn(async move {
                for turn in 0..25 {
                    let exchange = ChatExchange::new(
                        session_id,
                        format!("question {worker}-{turn}"),
                        "x".repeat(2048),
                    );
                    log.log_exchange(&exchange).await.expect("append");
                }
            }));
        }
        for task in tasks {
            task.await.expect("join");
        }

        let history = log.history(session_id).await.expect("every line parses");
        assert_eq!(history.len(), 200);
    }

    #[test]
    fn file_root_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("not-a-dir");
        std::fs::write(&file, "x").expect("write");
        let err = FileConversationLog::new(&file).expect_err("root");
        assert!(matches!(err, ConversationError::InvalidRoot(_)));
    }

    #[tokio::test]
    async fn noop_log_keeps_nothing() {
        let log = NoopConversationLog;
        let session_id = Uuid::new_v4();
        log.log_exchange(&ChatExchange::new(session_id, "hi", "hello"))
            .await
            .expect("log");
        assert!(log.history(session_id).await.expect("history").is_empty());
    }
}
