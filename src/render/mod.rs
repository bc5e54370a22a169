// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Deterministic plain-text transcript of a board.
//!
//! Used by the asynchronous transcript export in `store`; the output is meant
//! to be diff-friendly, not pretty.

use std::fmt::Write as _;

use crate::model::{Board, Comment};
use crate::query;

pub fn render_board_text(board: &Board) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "board {} — {} comments, {} replies",
        board.board_id(),
        query::comment_count(board),
        query::reply_count(board),
    );

    for comment in board.comments() {
        out.push('\n');
        push_comment(&mut out, comment, 0);
        for reply in comment.replies() {
            push_comment(&mut out, reply, 1);
        }
    }

    out
}

fn push_comment(out: &mut String, comment: &Comment, depth: usize) {
    let indent = "    ".repeat(depth);
    let _ = writeln!(
        out,
        "{indent}[{}] {}",
        comment.time().format_utc(),
        comment.author()
    );
    for line in comment.body().lines() {
        let _ = writeln!(out, "{indent}  {line}");
    }
}
