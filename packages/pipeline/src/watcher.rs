use crate::error::PipelineResult;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;

/// Window in which bursts of events for one path collapse into one
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Change(PathBuf),
    Add(PathBuf),
    Remove(PathBuf),
}

impl WatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Change(path) | WatchEvent::Add(path) | WatchEvent::Remove(path) => path,
        }
    }

    /// Map a raw notify event onto zero or more watch events
    pub fn from_notify(event: Event) -> Vec<WatchEvent> {
        let mut paths = event.paths.into_iter();
        match event.kind {
            EventKind::Create(_) => paths.map(WatchEvent::Add).collect(),
            EventKind::Remove(_) => paths.map(WatchEvent::Remove).collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => paths.map(WatchEvent::Remove).collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => paths.map(WatchEvent::Add).collect(),
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                let mut events = Vec::new();
                if let Some(from) = paths.next() {
                    events.push(WatchEvent::Remove(from));
                }
                events.extend(paths.map(WatchEvent::Add));
                events
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => vec![],
            EventKind::Modify(_) => paths.map(WatchEvent::Change).collect(),
            _ => vec![],
        }
    }
}

/// Coalesces events per path: the last kind wins, first-seen order is kept
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<WatchEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: WatchEvent) {
        match self.pending.iter_mut().find(|queued| queued.path() == event.path()) {
            Some(queued) => *queued = event,
            None => self.pending.push(event),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<WatchEvent> {
        std::mem::take(&mut self.pending)
    }
}

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
}

impl FileWatcher {
    pub fn new(path: &Path) -> PipelineResult<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        watcher.watch(path, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Block for the next burst of events, coalesced over `debounce`.
    ///
    /// Returns `None` once the watcher is gone.
    pub fn next_batch(&self, debounce: Duration) -> Option<PipelineResult<Vec<WatchEvent>>> {
        let mut queue = EventQueue::default();

        match self.receiver.recv() {
            Ok(Ok(event)) => WatchEvent::from_notify(event).into_iter().for_each(|e| queue.push(e)),
            Ok(Err(e)) => return Some(Err(e.into())),
            Err(_) => return None,
        }

        loop {
            match self.receiver.recv_timeout(debounce) {
                Ok(Ok(event)) => WatchEvent::from_notify(event).into_iter().for_each(|e| queue.push(e)),
                Ok(Err(e)) => return Some(Err(e.into())),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Some(Ok(queue.drain()))
    }
}
