// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::board::Board;
use super::comment::Comment;
use super::ids::{BoardId, CommentId};
use super::time::Timestamp;

fn cid(millis: u64) -> CommentId {
    CommentId::from_millis(millis)
}

fn ts(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

/// Deterministic demo board used by `--demo` and by tests.
pub(crate) fn demo_board() -> Board {
    let mut board = Board::new(BoardId::new("b:demo").expect("hard-coded board id is valid"));

    let mut first = Comment::new(
        cid(1_756_000_000_000),
        "Ada",
        "Threaded comment boards in the terminal. Who knew?",
        ts(1_756_000_000_000),
    );
    first.replies_mut().push(Comment::new(
        cid(1_756_000_060_000),
        "Grace",
        "Welcome aboard. Press r on a comment to reply.",
        ts(1_756_000_060_000),
    ));
    first.replies_mut().push(Comment::new(
        cid(1_756_000_120_000),
        "Linus",
        "And d deletes a whole subtree, so mind the cursor.",
        ts(1_756_000_120_000),
    ));
    board.comments_mut().push(first);

    board.comments_mut().push(Comment::new(
        cid(1_756_000_180_000),
        "Barbara",
        "Sort with s to bring the newest thread up top.",
        ts(1_756_000_180_000),
    ));

    board
}
