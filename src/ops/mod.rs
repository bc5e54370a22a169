// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for boards.
//!
//! Operations are applied in batches with optimistic concurrency (revision
//! checks) and produce a minimal delta the UI can use to refresh derived
//! state. A failed batch leaves the board untouched.

use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Board, Comment, CommentId, Timestamp};

pub const MAX_AUTHOR_LEN: usize = 40;
pub const MAX_BODY_LEN: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Post {
        comment_id: CommentId,
        author: String,
        body: String,
        time: Timestamp,
        parent_id: Option<CommentId>,
    },
    Edit {
        comment_id: CommentId,
        body: String,
        time: Timestamp,
    },
    Delete {
        comment_id: CommentId,
    },
    SortByTime {
        order: SortOrder,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which comments changed as the result of applying
/// ops.
///
/// This is intentionally coarse: sorting reorders the board without touching
/// any comment, so it reports nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    pub added: Vec<CommentId>,
    pub removed: Vec<CommentId>,
    pub updated: Vec<CommentId>,
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<CommentId>,
    removed: HashSet<CommentId>,
    updated: HashSet<CommentId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, comment_id: CommentId) {
        self.removed.remove(&comment_id);
        self.updated.remove(&comment_id);
        self.added.insert(comment_id);
    }

    fn record_removed(&mut self, comment_id: CommentId) {
        self.added.remove(&comment_id);
        self.updated.remove(&comment_id);
        self.removed.insert(comment_id);
    }

    fn record_updated(&mut self, comment_id: CommentId) {
        if self.added.contains(&comment_id) || self.removed.contains(&comment_id) {
            return;
        }
        self.updated.insert(comment_id);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta {
            added,
            removed,
            updated,
        }
    }
}

pub fn apply_ops(board: &mut Board, base_rev: u64, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
    let current_rev = board.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict {
            base_rev,
            current_rev,
        });
    }

    if ops.is_empty() {
        return Ok(ApplyResult {
            new_rev: current_rev,
            applied: 0,
            delta: Delta::default(),
        });
    }

    // Ops mutate a working copy so a mid-batch failure never leaks.
    let mut comments = board.comments().to_vec();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        match op {
            Op::Post {
                comment_id,
                author,
                body,
                time,
                parent_id,
            } => apply_post(
                &mut comments,
                *comment_id,
                author,
                body,
                *time,
                *parent_id,
                &mut delta,
            )?,
            Op::Edit {
                comment_id,
                body,
                time,
            } => apply_edit(&mut comments, *comment_id, body, *time, &mut delta)?,
            Op::Delete { comment_id } => apply_delete(&mut comments, *comment_id, &mut delta)?,
            Op::SortByTime { order } => apply_sort(&mut comments, *order),
        }
    }

    *board.comments_mut() = comments;
    board.bump_rev();

    Ok(ApplyResult {
        new_rev: board.rev(),
        applied: ops.len(),
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict {
        base_rev: u64,
        current_rev: u64,
    },
    AlreadyExists {
        comment_id: CommentId,
    },
    NotFound {
        comment_id: CommentId,
    },
    ParentNotFound {
        parent_id: CommentId,
    },
    /// The reply target is itself a reply; nesting is capped at one level.
    ParentIsReply {
        parent_id: CommentId,
    },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict {
                base_rev,
                current_rev,
            } => {
                write!(
                    f,
                    "stale base_rev (base_rev={base_rev}, current_rev={current_rev})"
                )
            }
            Self::AlreadyExists { comment_id } => {
                write!(f, "comment already exists (id={comment_id})")
            }
            Self::NotFound { comment_id } => write!(f, "comment not found (id={comment_id})"),
            Self::ParentNotFound { parent_id } => {
                write!(f, "reply target not found (id={parent_id})")
            }
            Self::ParentIsReply { parent_id } => {
                write!(
                    f,
                    "reply target is itself a reply (id={parent_id}); replies cannot be nested"
                )
            }
        }
    }
}

impl std::error::Error for ApplyError {}

/// A not-yet-committed submission from the compose form.
///
/// The UI validates drafts before turning them into [`Op::Post`] or
/// [`Op::Edit`]; invalid drafts never reach `apply_ops`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftComment {
    pub author: String,
    pub body: String,
}

impl DraftComment {
    pub fn validate(&self) -> Result<(), DraftError> {
        let author = self.author.trim();
        if author.is_empty() {
            return Err(DraftError::AuthorEmpty);
        }
        let author_len = author.chars().count();
        if author_len > MAX_AUTHOR_LEN {
            return Err(DraftError::AuthorTooLong { len: author_len });
        }
        if !author_pattern().is_match(author) {
            return Err(DraftError::AuthorNotAlphanumeric);
        }

        if self.body.trim().is_empty() {
            return Err(DraftError::BodyEmpty);
        }
        let body_len = self.body.chars().count();
        if body_len > MAX_BODY_LEN {
            return Err(DraftError::BodyTooLong { len: body_len });
        }

        Ok(())
    }
}

fn author_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").expect("hard-coded author pattern is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    AuthorEmpty,
    AuthorTooLong { len: usize },
    AuthorNotAlphanumeric,
    BodyEmpty,
    BodyTooLong { len: usize },
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorEmpty => f.write_str("name must not be empty"),
            Self::AuthorTooLong { len } => {
                write!(f, "name too long ({len} chars, max {MAX_AUTHOR_LEN})")
            }
            Self::AuthorNotAlphanumeric => {
                f.write_str("name must be alphanumeric (spaces allowed between words)")
            }
            Self::BodyEmpty => f.write_str("comment must not be empty"),
            Self::BodyTooLong { len } => {
                write!(f, "comment too long ({len} chars, max {MAX_BODY_LEN})")
            }
        }
    }
}

impl std::error::Error for DraftError {}

// Extracted op-application implementation over the working comment list.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
