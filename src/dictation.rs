//! Dictation
//!
//! Speech engines deliver a stream of partial and final results and tend to
//! end sessions on their own after a pause. `Dictation` owns one background
//! task that folds those events into a `TranscriptBuffer` and restarts the
//! recognizer while it is still armed.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Interim hypothesis, replaced by the next partial or final
    Partial(String),
    /// Settled text, appended to the transcript
    Final(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictationError {
    #[error("التعرف على الصوت غير مدعوم على هذا الجهاز")]
    Unsupported,
    #[error("speech recognizer failed: {0}")]
    Recognizer(String),
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begin a recognition session. The receiver closes when the engine ends it.
    async fn start(&self) -> Result<mpsc::Receiver<SpeechEvent>, DictationError>;
}

/// Recognizer for platforms without a speech engine
pub struct UnsupportedRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    async fn start(&self) -> Result<mpsc::Receiver<SpeechEvent>, DictationError> {
        Err(DictationError::Unsupported)
    }
}

#[derive(Debug, Default)]
struct Transcript {
    committed: String,
    partial: String,
}

/// Shared text the dictation task writes into and the input field reads
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    inner: Arc<Mutex<Transcript>>,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from text the user already typed
    pub fn with_text(text: &str) -> Self {
        let buffer = Self::default();
        buffer.lock().committed = text.trim().to_string();
        buffer
    }

    fn lock(&self) -> MutexGuard<'_, Transcript> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn apply(&self, event: SpeechEvent) {
        let mut t = self.lock();
        match event {
            SpeechEvent::Partial(text) => t.partial = text.trim().to_string(),
            SpeechEvent::Final(text) => {
                t.partial.clear();
                let text = text.trim();
                if text.is_empty() {
                    return;
                }
                if !t.committed.is_empty() {
                    t.committed.push(' ');
                }
                t.committed.push_str(text);
            }
        }
    }

    /// Committed text followed by the current partial
    pub fn text(&self) -> String {
        let t = self.lock();
        match (t.committed.is_empty(), t.partial.is_empty()) {
            (_, true) => t.committed.clone(),
            (true, false) => t.partial.clone(),
            (false, false) => format!("{} {}", t.committed, t.partial),
        }
    }

    pub fn committed(&self) -> String {
        self.lock().committed.clone()
    }

    pub fn clear(&self) {
        let mut t = self.lock();
        t.committed.clear();
        t.partial.clear();
    }
}

pub struct Dictation {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Dictation {
    /// Arm dictation. The first session is started before returning so an
    /// unsupported platform is reported to the caller.
    pub async fn start(
        recognizer: Arc<dyn SpeechRecognizer>,
        buffer: TranscriptBuffer,
    ) -> Result<Self, DictationError> {
        let first = recognizer.start().await?;
        let (stop_tx, stop_rx) = watch::channel(false);
        let task = tokio::spawn(run(recognizer, buffer, first, stop_rx));
        log::debug!("dictation started");
        Ok(Self { stop_tx, task })
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Disarm and wait for the task to exit
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            log::warn!("dictation task ended abnormally: {}", e);
        }
        log::debug!("dictation stopped");
    }
}

async fn run(
    recognizer: Arc<dyn SpeechRecognizer>,
    buffer: TranscriptBuffer,
    mut stream: mpsc::Receiver<SpeechEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            event = stream.recv() => match event {
                Some(event) => buffer.apply(event),
                None => {
                    if *stop_rx.borrow() {
                        break;
                    }
                    let restarted = tokio::select! {
                        biased;
                        _ = stop_rx.changed() => None,
                        next = recognizer.start() => Some(next),
                    };
                    match restarted {
                        Some(Ok(next)) => {
                            log::debug!("recognizer session ended, restarting");
                            stream = next;
                        }
                        Some(Err(e)) => {
                            log::warn!("recognizer restart failed: {}", e);
                            break;
                        }
                        None => break,
                    }
                }
            },
        }
    }
}
