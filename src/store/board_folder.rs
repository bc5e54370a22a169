// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::model::{Board, BoardId, Comment, CommentId, IdError, Timestamp};
use crate::render::render_board_text;

const BOARD_FILENAME: &str = "galatea-board.json";
const TRANSCRIPT_FILENAME: &str = "galatea-board.txt";
const BOARD_FILE_VERSION: u64 = 1;

#[derive(Debug)]
struct TranscriptExportTask {
    board_dir: PathBuf,
    board_path: PathBuf,
    text_path: PathBuf,
    durability: WriteDurability,
    board: Board,
}

#[derive(Debug, Default)]
struct TranscriptExportState {
    pending: HashMap<PathBuf, TranscriptExportTask>,
    queue: VecDeque<PathBuf>,
    in_flight_board_dir: Option<PathBuf>,
}

#[derive(Debug)]
struct TranscriptExportInner {
    state: Mutex<TranscriptExportState>,
    cv: Condvar,
}

#[derive(Debug)]
struct TranscriptExportManager {
    inner: Arc<TranscriptExportInner>,
}

impl TranscriptExportManager {
    fn new() -> Self {
        let inner = Arc::new(TranscriptExportInner {
            state: Mutex::new(TranscriptExportState::default()),
            cv: Condvar::new(),
        });

        std::thread::Builder::new()
            .name("galatea-transcript-export".to_owned())
            .spawn({
                let inner = inner.clone();
                move || Self::run_worker(inner)
            })
            .expect("spawn transcript export worker thread");

        Self { inner }
    }

    fn schedule(&self, task: TranscriptExportTask) {
        let text_path = task.text_path.clone();

        let mut state = self.inner.state.lock().expect("transcript export lock poisoned");
        if state.pending.contains_key(&text_path) {
            // Coalesce: the latest scheduled board wins.
            state.pending.insert(text_path, task);
            return;
        }

        state.pending.insert(text_path.clone(), task);
        state.queue.push_back(text_path);
        self.inner.cv.notify_one();
    }

    fn flush_board_dir(&self, board_dir: &Path) {
        let mut state = self.inner.state.lock().expect("transcript export lock poisoned");
        while state
            .in_flight_board_dir
            .as_deref()
            .is_some_and(|active| active == board_dir)
            || state
                .pending
                .values()
                .any(|task| task.board_dir == board_dir)
        {
            state = self
                .inner
                .cv
                .wait(state)
                .expect("transcript export cv poisoned");
        }
    }

    fn run_worker(inner: Arc<TranscriptExportInner>) {
        loop {
            let task = {
                let mut state = inner.state.lock().expect("transcript export lock poisoned");

                loop {
                    if let Some(text_path) = state.queue.pop_front() {
                        if let Some(task) = state.pending.remove(&text_path) {
                            state.in_flight_board_dir = Some(task.board_dir.clone());
                            break task;
                        }
                    }

                    state = inner.cv.wait(state).expect("transcript export cv poisoned");
                }
            };

            if task.board_path.is_file() {
                let text = render_board_text(&task.board);
                let _ = write_atomic_in_board_if_board_dir_exists(
                    &task.board_dir,
                    &task.text_path,
                    text.as_bytes(),
                    task.durability,
                );
            }
            // A missing board file means the folder was removed or never
            // initialized; skip instead of resurrecting it.

            let mut state = inner.state.lock().expect("transcript export lock poisoned");
            state.in_flight_board_dir = None;
            inner.cv.notify_all();
        }
    }
}

static TRANSCRIPT_EXPORTS: OnceLock<TranscriptExportManager> = OnceLock::new();

fn transcript_exports() -> &'static TranscriptExportManager {
    TRANSCRIPT_EXPORTS.get_or_init(TranscriptExportManager::new)
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    UnsupportedVersion {
        path: PathBuf,
        version: u64,
    },
    DuplicateCommentId {
        path: PathBuf,
        comment_id: CommentId,
    },
    DanglingReply {
        path: PathBuf,
        reply_id: CommentId,
        parent_id: CommentId,
    },
    InvalidRelativePath {
        field: &'static str,
        value: PathBuf,
    },
    PathOutsideBoard {
        board_dir: PathBuf,
        path: PathBuf,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
            Self::UnsupportedVersion { path, version } => {
                write!(
                    f,
                    "unsupported board file version {version} at {path:?} (expected {BOARD_FILE_VERSION})"
                )
            }
            Self::DuplicateCommentId { path, comment_id } => {
                write!(f, "duplicate comment id {comment_id} in {path:?}")
            }
            Self::DanglingReply {
                path,
                reply_id,
                parent_id,
            } => write!(
                f,
                "reply {reply_id} in {path:?} references missing comment {parent_id}"
            ),
            Self::InvalidRelativePath { field, value } => {
                write!(f, "invalid relative path for {field}: {value:?}")
            }
            Self::PathOutsideBoard { board_dir, path } => write!(
                f,
                "path is outside board dir: board_dir={board_dir:?} path={path:?}"
            ),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::UnsupportedVersion { .. } => None,
            Self::DuplicateCommentId { .. } => None,
            Self::DanglingReply { .. } => None,
            Self::InvalidRelativePath { .. } => None,
            Self::PathOutsideBoard { .. } => None,
            Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to
    /// stable storage where possible. Exact guarantees are
    /// platform/filesystem-dependent.
    Durable,
}

/// On-disk home of a single board: one normalized JSON file plus an
/// asynchronously exported plain-text transcript.
#[derive(Debug, Clone)]
pub struct BoardFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl BoardFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn board_path(&self) -> PathBuf {
        self.root.join(BOARD_FILENAME)
    }

    /// Returns the path of the rendered transcript export.
    ///
    /// The file is generated asynchronously as a best-effort export; it may
    /// lag behind the board file during rapid edits.
    pub fn transcript_path(&self) -> PathBuf {
        self.root.join(TRANSCRIPT_FILENAME)
    }

    pub fn flush_transcript_exports(&self) {
        transcript_exports().flush_board_dir(self.root());
    }

    fn initial_board_id(&self) -> BoardId {
        let candidate = self
            .root
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .map(|name| format!("b:{name}"))
            .unwrap_or_else(|| "b:board".to_owned());

        BoardId::new(candidate).unwrap_or_else(|_| {
            BoardId::new("b:board").expect("hard-coded fallback board id is valid")
        })
    }

    fn initial_board(&self) -> Board {
        Board::new(self.initial_board_id())
    }

    pub fn load_or_init_board(&self) -> Result<Board, StoreError> {
        match self.load_board() {
            Ok(board) => Ok(board),
            Err(StoreError::Io { path, source })
                if source.kind() == io::ErrorKind::NotFound && path == self.board_path() =>
            {
                let board = self.initial_board();
                self.save_board(&board)?;
                Ok(board)
            }
            Err(err) => Err(err),
        }
    }

    pub fn load_board(&self) -> Result<Board, StoreError> {
        let path = self.board_path();
        let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let json: BoardFileJson =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        board_from_json(&path, json)
    }

    pub fn save_board(&self, board: &Board) -> Result<(), StoreError> {
        let path = self.board_path();
        let json = board_to_json(board);
        let mut raw = serde_json::to_string_pretty(&json).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        raw.push('\n');

        write_atomic_in_board(self.root(), &path, raw.as_bytes(), self.durability)?;
        self.schedule_transcript_export(board);
        Ok(())
    }

    fn schedule_transcript_export(&self, board: &Board) {
        transcript_exports().schedule(TranscriptExportTask {
            board_dir: self.root.clone(),
            board_path: self.board_path(),
            text_path: self.transcript_path(),
            durability: self.durability,
            board: board.clone(),
        });
    }
}

// Extracted persistence helpers: json conversion and safe filesystem writes.
include!("board_folder/helpers.rs");
