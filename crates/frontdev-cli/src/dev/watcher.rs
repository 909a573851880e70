//! File system watcher with debouncing for watch mode.
//!
//! Watches the whole project directory and filters changes down to the files
//! that can affect the bundle, ignoring `node_modules`, the output directory,
//! hidden files and the configured patterns.

use crate::error::{CliError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 100;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_kind(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Decides which paths are worth a rebuild.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    roots: Vec<PathBuf>,
    patterns: Vec<String>,
}

impl IgnoreRules {
    /// `patterns` are directory names (`node_modules`), relative directory
    /// paths (`public/build`) or extension globs (`*.log`).
    pub fn new(root: &Path, patterns: Vec<String>) -> Self {
        let mut roots = vec![root.to_path_buf()];
        // Backends may report canonical paths (e.g. /private/var on macOS).
        if let Ok(canonical) = root.canonicalize() {
            if canonical != root {
                roots.push(canonical);
            }
        }
        Self { roots, patterns }
    }

    pub fn should_ignore(&self, path: &Path) -> bool {
        // Only files within the project root count.
        let Some(rel) = self
            .roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
        else {
            return true;
        };

        if rel.as_os_str().is_empty() {
            return true;
        }

        let rel_str = rel.to_string_lossy().replace('\\', "/");

        for pattern in &self.patterns {
            if let Some(ext) = pattern.strip_prefix('*') {
                if rel_str.ends_with(ext) {
                    return true;
                }
            } else if pattern.contains('/') {
                if rel.starts_with(pattern.trim_end_matches('/')) {
                    return true;
                }
            } else if rel.components().any(|c| c.as_os_str() == pattern.as_str()) {
                return true;
            }
        }

        // Hidden files and directories
        rel.components().any(|c| {
            c.as_os_str()
                .to_str()
                .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
        })
    }
}

/// Drops repeat events for the same path inside the debounce window.
#[derive(Debug)]
struct Debouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    fn admit(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.last_seen.get(path) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }
        self.last_seen
            .retain(|_, seen| now.duration_since(*seen) < self.window);
        self.last_seen.insert(path.to_path_buf(), now);
        true
    }
}

/// Recursive file watcher with debouncing and filtering.
///
/// Events arrive on the receiver returned by [`FileWatcher::new`]; dropping
/// the watcher stops them.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root` recursively.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or the platform watcher
    /// cannot be created.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let rules = IgnoreRules::new(&root, ignore_patterns);
        let mut debouncer = Debouncer::new(Duration::from_millis(debounce_ms));

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                    return;
                }
            };

            for path in event.paths {
                if rules.should_ignore(&path) || !debouncer.admit(&path, Instant::now()) {
                    continue;
                }
                let Some(change) = FileChange::from_kind(&event.kind, path) else {
                    continue;
                };
                tracing::debug!(path = %change.path().display(), "file changed");
                // Receiver gone means watch mode is shutting down.
                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
