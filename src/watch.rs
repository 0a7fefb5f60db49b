//! File system watcher for a single deck.
//!
//! Watches the directory containing the deck rather than the file itself:
//! many editors save by writing a temporary file and renaming it over the
//! original, which would silently detach a watch on the file.

use crate::error::{Error, Result};
use log::{debug, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Changes to the watched deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    /// The deck was written, created or renamed into place
    Changed,
    /// The deck was deleted or moved away
    Removed,
    /// The watcher encountered an error
    Error(String),
}

/// Watches one markdown file for changes.
#[derive(Debug)]
pub struct DeckWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<DeckEvent>,
    path: PathBuf,
}

impl DeckWatcher {
    /// Start watching `path`. The file itself may not exist yet, but its
    /// directory must.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| Error::Watch(format!("Not a file path: {}", path.display())))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &file_name, &tx);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .map_err(|e| Error::Watch(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("Failed to watch {}: {}", dir.display(), e)))?;
        debug!("Watching {} for changes", path.display());

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path,
        })
    }

    fn handle_event(
        result: std::result::Result<Event, notify::Error>,
        file_name: &std::ffi::OsStr,
        tx: &Sender<DeckEvent>,
    ) {
        let event = match result {
            Ok(event) => classify(&event, file_name),
            Err(e) => {
                warn!("File watcher error: {}", e);
                Some(DeckEvent::Error(e.to_string()))
            }
        };
        if let Some(event) = event {
            let _ = tx.send(event);
        }
    }

    /// Block until the deck changes, then drain whatever arrives within
    /// `settle` and return the coalesced result.
    ///
    /// Returns `None` once the watcher thread has gone away.
    pub fn wait_for_change(&self, settle: Duration) -> Option<DeckEvent> {
        let first = self.receiver.recv().ok()?;
        let mut events = vec![first];
        loop {
            match self.receiver.recv_timeout(settle) {
                Ok(event) => events.push(event),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        coalesce(events)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Map a raw notify event to a deck event if it concerns `file_name`.
fn classify(event: &Event, file_name: &std::ffi::OsStr) -> Option<DeckEvent> {
    let touches_deck = event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name));
    if !touches_deck {
        return None;
    }

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(DeckEvent::Changed),
        EventKind::Remove(_) => Some(DeckEvent::Removed),
        // Access and Other events don't change content
        _ => None,
    }
}

/// Reduce a burst of events to the one that matters: errors first, then the
/// final state of the file.
pub fn coalesce(events: Vec<DeckEvent>) -> Option<DeckEvent> {
    if let Some(error) = events.iter().find(|e| matches!(e, DeckEvent::Error(_))) {
        return Some(error.clone());
    }
    events.into_iter().last()
}
