// src/watch/event.rs

//! Filesystem events as seen by change handlers.

use std::path::PathBuf;

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::EventKind;

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Renamed,
    /// The backend could not tell.
    Other,
}

/// A single change to a single path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub path: PathBuf,
    pub is_directory: bool,
    pub kind: ChangeKind,
}

impl FsEvent {
    pub fn file(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
            kind,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
            kind,
        }
    }

    /// Split a `notify` event into one `FsEvent` per path, with no memory
    /// of earlier events. Watchers go through [`RenameCoalescer`] instead.
    ///
    /// Access notifications (open/read/close) are not changes and yield
    /// nothing.
    pub fn from_notify(event: &notify::Event) -> Vec<FsEvent> {
        let kind = match event.kind {
            EventKind::Access(_) => return Vec::new(),
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Renamed,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Any | EventKind::Other => ChangeKind::Other,
        };

        let folder_hint = match event.kind {
            EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => {
                Some(true)
            }
            EventKind::Create(CreateKind::File) | EventKind::Remove(RemoveKind::File) => {
                Some(false)
            }
            _ => None,
        };

        event
            .paths
            .iter()
            .map(|path| FsEvent {
                path: path.clone(),
                is_directory: folder_hint.unwrap_or_else(|| path.is_dir()),
                kind,
            })
            .collect()
    }
}


/// The source half of a rename, waiting for its destination.
#[derive(Debug, Clone)]
struct PendingRename {
    tracker: usize,
    path: PathBuf,
    is_directory: bool,
}

/// Turns one watcher's notifications into `FsEvent`s, one per rename.
///
/// inotify reports `mv a.lua b.lua` as `Name(From)`, `Name(To)` and
/// `Name(Both)`, all carrying the same tracker. The pair becomes a single
/// `Renamed` event on the source path; whether it is a directory is read
/// from the destination, which still exists. A `From` whose `To` never
/// comes (moved out of the watched tree) is held until
/// [`flush`](RenameCoalescer::flush) or the next unrelated notification.
#[derive(Debug, Default)]
pub struct RenameCoalescer {
    pending: Option<PendingRename>,
    /// Source of the last completed rename. A watched directory reports its
    /// own move afterwards as a tracker-less `From` on this path.
    last_source: Option<PathBuf>,
}

impl RenameCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn push(&mut self, event: &notify::Event) -> Vec<FsEvent> {
        let tracker = event.tracker();

        match (&event.kind, event.paths.as_slice()) {
            (EventKind::Modify(ModifyKind::Name(RenameMode::From)), [path]) => match tracker {
                Some(tracker) => {
                    let flushed = self.flush();
                    self.pending = Some(PendingRename {
                        tracker,
                        path: path.clone(),
                        is_directory: false,
                    });
                    return flushed.into_iter().collect();
                }
                None => {
                    if let Some(pending) = self.pending.as_mut().filter(|p| &p.path == path) {
                        pending.is_directory = true;
                        return Vec::new();
                    }
                    if self.last_source.as_ref() == Some(path) {
                        self.last_source = None;
                        return Vec::new();
                    }
                }
            },
            (EventKind::Modify(ModifyKind::Name(RenameMode::To)), _)
                if tracker.is_some() && self.pending_tracker() == tracker =>
            {
                return Vec::new();
            }
            (EventKind::Modify(ModifyKind::Name(RenameMode::Both)), [from, to]) => {
                if self.pending_tracker() == tracker {
                    self.pending = None;
                }
                let mut out: Vec<FsEvent> = self.flush().into_iter().collect();
                out.push(FsEvent {
                    path: from.clone(),
                    is_directory: to.is_dir(),
                    kind: ChangeKind::Renamed,
                });
                self.last_source = Some(from.clone());
                return out;
            }
            _ => {}
        }

        let mut out: Vec<FsEvent> = self.flush().into_iter().collect();
        out.extend(FsEvent::from_notify(event));
        out
    }

    /// Give up waiting for the destination of a pending rename.
    pub fn flush(&mut self) -> Option<FsEvent> {
        self.pending.take().map(|p| FsEvent {
            path: p.path,
            is_directory: p.is_directory,
            kind: ChangeKind::Renamed,
        })
    }

    fn pending_tracker(&self) -> Option<usize> {
        self.pending.as_ref().map(|p| p.tracker)
    }
}
