//! Pure debouncer: timing and event deduplication only.
//!
//! No rebuild logic, no global state access.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::config::WatchConfig;
use crate::utils::path::normalize_path;

/// What happened to a watched path within one debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Collects raw notify events and releases them as one batch once the
/// debounce window has passed since the last event and the cooldown since
/// the last release.
pub struct Debouncer {
    /// Path → ChangeKind (dedup is free via map key uniqueness)
    changes: FxHashMap<PathBuf, ChangeKind>,
    last_event: Option<Instant>,
    last_release: Option<Instant>,
    debounce: Duration,
    cooldown: Duration,
}

impl Debouncer {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            changes: FxHashMap::default(),
            last_event: None,
            last_release: None,
            debounce: Duration::from_millis(config.debounce_ms),
            cooldown: Duration::from_millis(config.cooldown_ms),
        }
    }

    /// Add a notify event, applying dedup rules:
    /// - Removed + Created/Modified → restored, use the new event
    /// - Modified + Removed → deleted, upgrade to Removed
    /// - Created + Removed → appeared then vanished, discard
    /// - otherwise the first event wins
    pub fn add_event(&mut self, event: &notify::Event) {
        use notify::EventKind;

        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Remove(_) => ChangeKind::Removed,
            EventKind::Modify(modify) => {
                // Ignore metadata-only changes (mtime/atime/chmod noise)
                if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                    return;
                }
                ChangeKind::Modified
            }
            _ => return,
        };

        for path in &event.paths {
            if is_temp_file(path) {
                continue;
            }
            let path = normalize_path(path);
            self.record(path, kind);
        }
    }

    fn record(&mut self, path: PathBuf, kind: ChangeKind) {
        if let Some(&existing) = self.changes.get(&path) {
            match (existing, kind) {
                (ChangeKind::Removed, ChangeKind::Created | ChangeKind::Modified) => {
                    crate::debug!("watch"; "restore {}: {}", kind.label(), path.display());
                    self.changes.insert(path, kind);
                }
                (ChangeKind::Modified, ChangeKind::Removed) => {
                    crate::debug!("watch"; "upgrade modified->removed: {}", path.display());
                    self.changes.insert(path, ChangeKind::Removed);
                }
                (ChangeKind::Created, ChangeKind::Removed) => {
                    crate::debug!("watch"; "discard created+removed: {}", path.display());
                    self.changes.remove(&path);
                }
                _ => return, // first event wins, do not refresh the window
            }
        } else {
            crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
            self.changes.insert(path, kind);
        }
        self.last_event = Some(Instant::now());
    }

    /// Take the batch if debounce + cooldown have elapsed.
    pub fn take_if_ready(&mut self) -> Option<FxHashMap<PathBuf, ChangeKind>> {
        if !self.is_ready() {
            return None;
        }

        let changes = std::mem::take(&mut self.changes);
        self.last_event = None;

        if changes.is_empty() {
            return None;
        }

        self.last_release = Some(Instant::now());
        Some(changes)
    }

    pub fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };

        if last_event.elapsed() < self.debounce {
            return false;
        }

        if let Some(last_release) = self.last_release
            && last_release.elapsed() < self.cooldown
        {
            return false;
        }

        !self.changes.is_empty()
    }

    /// Precise sleep duration until the next possible ready time.
    pub fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };

        let debounce_remaining = self.debounce.saturating_sub(last_event.elapsed());
        let cooldown_remaining = self
            .last_release
            .map(|t| self.cooldown.saturating_sub(t.elapsed()))
            .unwrap_or(Duration::ZERO);

        debounce_remaining
            .max(cooldown_remaining)
            .max(Duration::from_millis(1))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

// =============================================================================
// Tests
// =============================================================================
