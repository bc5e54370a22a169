// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::comment::Comment;
use super::ids::BoardId;

/// The top-level container the TUI runs against.
///
/// Holds the ordered list of top-level comments plus a revision counter used
/// for optimistic concurrency in `ops` and change detection in `store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    board_id: BoardId,
    comments: Vec<Comment>,
    rev: u64,
}

impl Board {
    pub fn new(board_id: BoardId) -> Self {
        Self {
            board_id,
            comments: Vec::new(),
            rev: 0,
        }
    }

    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.comments
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}
