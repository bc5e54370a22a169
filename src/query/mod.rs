// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-side helpers over the board tree.
//!
//! The TUI renders from the flattened [`ThreadRow`] view instead of walking
//! the tree during draw.

use crate::model::{Board, Comment, CommentId};

/// One visible row of the thread list: a top-level comment (depth 0) or a
/// reply (depth 1), in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadRow {
    pub comment_id: CommentId,
    pub depth: usize,
}

pub fn thread_rows(board: &Board) -> Vec<ThreadRow> {
    let mut rows = Vec::new();
    for comment in board.comments() {
        rows.push(ThreadRow {
            comment_id: comment.comment_id(),
            depth: 0,
        });
        for reply in comment.replies() {
            rows.push(ThreadRow {
                comment_id: reply.comment_id(),
                depth: 1,
            });
        }
    }
    rows
}

pub fn find_comment(board: &Board, comment_id: CommentId) -> Option<&Comment> {
    for comment in board.comments() {
        if comment.comment_id() == comment_id {
            return Some(comment);
        }
        if let Some(reply) = comment
            .replies()
            .iter()
            .find(|reply| reply.comment_id() == comment_id)
        {
            return Some(reply);
        }
    }
    None
}

/// Returns the top-level comment owning `comment_id` when it is a reply.
pub fn parent_of(board: &Board, comment_id: CommentId) -> Option<&Comment> {
    board.comments().iter().find(|comment| {
        comment
            .replies()
            .iter()
            .any(|reply| reply.comment_id() == comment_id)
    })
}

pub fn comment_count(board: &Board) -> usize {
    board.comments().len()
}

pub fn reply_count(board: &Board) -> usize {
    board
        .comments()
        .iter()
        .map(|comment| comment.replies().len())
        .sum()
}

pub fn total_count(board: &Board) -> usize {
    comment_count(board) + reply_count(board)
}
