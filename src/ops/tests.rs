// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Board, BoardId, CommentId, Timestamp};

use super::{apply_ops, ApplyError, DraftComment, DraftError, Op, SortOrder};

fn cid(millis: u64) -> CommentId {
    CommentId::from_millis(millis)
}

fn ts(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn empty_board() -> Board {
    Board::new(BoardId::new("b:test").expect("board id"))
}

fn post(comment_id: u64, author: &str, parent_id: Option<u64>) -> Op {
    Op::Post {
        comment_id: cid(comment_id),
        author: author.to_owned(),
        body: format!("body of {comment_id}"),
        time: ts(comment_id),
        parent_id: parent_id.map(cid),
    }
}

#[test]
fn post_appends_top_level_comment_and_bumps_rev() {
    let mut board = empty_board();

    let result = apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("apply");

    assert_eq!(result.new_rev, 1);
    assert_eq!(board.rev(), 1);
    assert_eq!(result.applied, 1);
    assert_eq!(result.delta.added, vec![cid(1)]);
    assert!(result.delta.removed.is_empty());
    assert!(result.delta.updated.is_empty());

    assert_eq!(board.comments().len(), 1);
    let comment = &board.comments()[0];
    assert_eq!(comment.comment_id(), cid(1));
    assert_eq!(comment.author(), "Ada");
    assert_eq!(comment.body(), "body of 1");
    assert_eq!(comment.time(), ts(1));
    assert!(comment.replies().is_empty());
}

#[test]
fn post_preserves_existing_comments() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("first");
    let before = board.comments()[0].clone();

    apply_ops(&mut board, 1, &[post(2, "Grace", None)]).expect("second");

    assert_eq!(board.comments().len(), 2);
    assert_eq!(board.comments()[0], before);
    assert_eq!(board.comments()[1].comment_id(), cid(2));
}

#[test]
fn post_reply_appends_to_parent_only() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None), post(2, "Grace", None)]).expect("setup");
    let other_before = board.comments()[1].clone();

    let result = apply_ops(&mut board, 1, &[post(3, "Linus", Some(1))]).expect("reply");

    assert_eq!(result.delta.added, vec![cid(3)]);
    assert_eq!(result.delta.updated, vec![cid(1)]);

    let parent = &board.comments()[0];
    assert_eq!(parent.replies().len(), 1);
    assert_eq!(parent.replies()[0].comment_id(), cid(3));
    assert_eq!(parent.replies()[0].author(), "Linus");
    assert_eq!(parent.replies()[0].body(), "body of 3");
    assert_eq!(board.comments()[1], other_before);
}

#[test]
fn post_rejects_duplicate_comment_id() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("setup");

    let err = apply_ops(&mut board, 1, &[post(1, "Grace", None)]).unwrap_err();
    assert_eq!(err, ApplyError::AlreadyExists { comment_id: cid(1) });
    assert_eq!(board.rev(), 1);
}

#[test]
fn post_rejects_missing_parent() {
    let mut board = empty_board();

    let err = apply_ops(&mut board, 0, &[post(1, "Ada", Some(99))]).unwrap_err();
    assert_eq!(err, ApplyError::ParentNotFound { parent_id: cid(99) });
    assert!(board.comments().is_empty());
    assert_eq!(board.rev(), 0);
}

#[test]
fn post_rejects_reply_to_a_reply() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None), post(2, "Grace", Some(1))]).expect("setup");

    let err = apply_ops(&mut board, 1, &[post(3, "Linus", Some(2))]).unwrap_err();
    assert_eq!(err, ApplyError::ParentIsReply { parent_id: cid(2) });
    assert_eq!(board.comments()[0].replies().len(), 1);
}

#[test]
fn edit_replaces_body_and_time_only() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("setup");

    let result = apply_ops(
        &mut board,
        1,
        &[Op::Edit {
            comment_id: cid(1),
            body: "revised".to_owned(),
            time: ts(50),
        }],
    )
    .expect("edit");

    assert_eq!(result.delta.updated, vec![cid(1)]);
    let comment = &board.comments()[0];
    assert_eq!(comment.comment_id(), cid(1));
    assert_eq!(comment.author(), "Ada");
    assert_eq!(comment.body(), "revised");
    assert_eq!(comment.time(), ts(50));
}

#[test]
fn edit_reaches_nested_reply() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None), post(2, "Grace", Some(1))]).expect("setup");

    apply_ops(
        &mut board,
        1,
        &[Op::Edit {
            comment_id: cid(2),
            body: "revised reply".to_owned(),
            time: ts(60),
        }],
    )
    .expect("edit");

    let reply = &board.comments()[0].replies()[0];
    assert_eq!(reply.author(), "Grace");
    assert_eq!(reply.body(), "revised reply");
    assert_eq!(reply.time(), ts(60));
}

#[test]
fn edit_rejects_missing_id() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("setup");
    let before = board.clone();

    let err = apply_ops(
        &mut board,
        1,
        &[Op::Edit {
            comment_id: cid(42),
            body: "nope".to_owned(),
            time: ts(60),
        }],
    )
    .unwrap_err();

    assert_eq!(err, ApplyError::NotFound { comment_id: cid(42) });
    assert_eq!(board, before);
}

#[test]
fn delete_removes_comment_with_reply_subtree() {
    let mut board = empty_board();
    apply_ops(
        &mut board,
        0,
        &[
            post(1, "Ada", None),
            post(2, "Grace", None),
            post(3, "Linus", Some(1)),
            post(4, "Barbara", Some(1)),
        ],
    )
    .expect("setup");

    let result = apply_ops(&mut board, 1, &[Op::Delete { comment_id: cid(1) }]).expect("delete");

    assert_eq!(result.delta.removed, vec![cid(1), cid(3), cid(4)]);
    assert_eq!(board.comments().len(), 1);
    assert_eq!(board.comments()[0].comment_id(), cid(2));
}

#[test]
fn delete_removes_single_reply_and_keeps_parent() {
    let mut board = empty_board();
    apply_ops(
        &mut board,
        0,
        &[
            post(1, "Ada", None),
            post(2, "Grace", Some(1)),
            post(3, "Linus", Some(1)),
        ],
    )
    .expect("setup");

    let result = apply_ops(&mut board, 1, &[Op::Delete { comment_id: cid(2) }]).expect("delete");

    assert_eq!(result.delta.removed, vec![cid(2)]);
    assert_eq!(result.delta.updated, vec![cid(1)]);
    let parent = &board.comments()[0];
    assert_eq!(parent.replies().len(), 1);
    assert_eq!(parent.replies()[0].comment_id(), cid(3));
}

#[test]
fn delete_rejects_missing_id() {
    let mut board = empty_board();

    let err = apply_ops(&mut board, 0, &[Op::Delete { comment_id: cid(9) }]).unwrap_err();
    assert_eq!(err, ApplyError::NotFound { comment_id: cid(9) });
}

#[test]
fn sort_orders_top_level_newest_first() {
    let mut board = empty_board();
    apply_ops(
        &mut board,
        0,
        &[
            post(1, "Ada", None),
            post(2, "Grace", None),
            post(3, "Linus", Some(1)),
        ],
    )
    .expect("setup");

    apply_ops(
        &mut board,
        1,
        &[Op::SortByTime {
            order: SortOrder::NewestFirst,
        }],
    )
    .expect("sort");

    let order = board
        .comments()
        .iter()
        .map(|comment| comment.comment_id())
        .collect::<Vec<_>>();
    assert_eq!(order, vec![cid(2), cid(1)]);
    // Replies retain insertion order under their parent.
    assert_eq!(board.comments()[1].replies()[0].comment_id(), cid(3));
}

#[test]
fn sort_is_stable_and_idempotent() {
    let mut board = empty_board();
    let same_time = [
        Op::Post {
            comment_id: cid(1),
            author: "Ada".to_owned(),
            body: "first".to_owned(),
            time: ts(100),
            parent_id: None,
        },
        Op::Post {
            comment_id: cid(2),
            author: "Grace".to_owned(),
            body: "second".to_owned(),
            time: ts(100),
            parent_id: None,
        },
        Op::Post {
            comment_id: cid(3),
            author: "Linus".to_owned(),
            body: "third".to_owned(),
            time: ts(200),
            parent_id: None,
        },
    ];
    apply_ops(&mut board, 0, &same_time).expect("setup");

    let sort = Op::SortByTime {
        order: SortOrder::NewestFirst,
    };
    apply_ops(&mut board, 1, std::slice::from_ref(&sort)).expect("first sort");
    let once = board.comments().to_vec();
    apply_ops(&mut board, 2, std::slice::from_ref(&sort)).expect("second sort");

    assert_eq!(board.comments(), once.as_slice());
    let order = once
        .iter()
        .map(|comment| comment.comment_id())
        .collect::<Vec<_>>();
    // Stable: the two equal-time comments keep posting order behind the newest.
    assert_eq!(order, vec![cid(3), cid(1), cid(2)]);
}

#[test]
fn sort_supports_oldest_first() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(2, "Grace", None), post(1, "Ada", None)]).expect("setup");

    apply_ops(
        &mut board,
        1,
        &[Op::SortByTime {
            order: SortOrder::OldestFirst,
        }],
    )
    .expect("sort");

    let order = board
        .comments()
        .iter()
        .map(|comment| comment.comment_id())
        .collect::<Vec<_>>();
    assert_eq!(order, vec![cid(1), cid(2)]);
}

#[test]
fn apply_conflicts_on_stale_base_rev() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("first apply");

    let err = apply_ops(&mut board, 0, &[post(2, "Grace", None)]).unwrap_err();
    assert_eq!(
        err,
        ApplyError::Conflict {
            base_rev: 0,
            current_rev: 1,
        }
    );
}

#[test]
fn empty_batch_keeps_rev() {
    let mut board = empty_board();

    let result = apply_ops(&mut board, 0, &[]).expect("empty batch");
    assert_eq!(result.new_rev, 0);
    assert_eq!(result.applied, 0);
    assert_eq!(board.rev(), 0);
}

#[test]
fn failed_batch_leaves_board_untouched() {
    let mut board = empty_board();
    apply_ops(&mut board, 0, &[post(1, "Ada", None)]).expect("setup");
    let before = board.clone();

    let err = apply_ops(
        &mut board,
        1,
        &[post(2, "Grace", None), Op::Delete { comment_id: cid(77) }],
    )
    .unwrap_err();

    assert_eq!(err, ApplyError::NotFound { comment_id: cid(77) });
    assert_eq!(board, before);
}

#[test]
fn draft_accepts_bounded_alphanumeric_author() {
    let draft = DraftComment {
        author: "Ada Lovelace 42".to_owned(),
        body: "A perfectly fine comment.".to_owned(),
    };
    draft.validate().expect("valid draft");
}

#[test]
fn draft_trims_author_before_validation() {
    let draft = DraftComment {
        author: "  Ada  ".to_owned(),
        body: "ok".to_owned(),
    };
    draft.validate().expect("valid draft");
}

#[test]
fn draft_rejects_empty_author() {
    let draft = DraftComment {
        author: "   ".to_owned(),
        body: "ok".to_owned(),
    };
    assert_eq!(draft.validate(), Err(DraftError::AuthorEmpty));
}

#[test]
fn draft_rejects_overlong_author() {
    let draft = DraftComment {
        author: "A".repeat(super::MAX_AUTHOR_LEN + 1),
        body: "ok".to_owned(),
    };
    assert_eq!(
        draft.validate(),
        Err(DraftError::AuthorTooLong {
            len: super::MAX_AUTHOR_LEN + 1,
        })
    );
}

#[test]
fn draft_rejects_non_alphanumeric_author() {
    let draft = DraftComment {
        author: "ada@example".to_owned(),
        body: "ok".to_owned(),
    };
    assert_eq!(draft.validate(), Err(DraftError::AuthorNotAlphanumeric));
}

#[test]
fn draft_rejects_blank_body() {
    let draft = DraftComment {
        author: "Ada".to_owned(),
        body: " \n\t ".to_owned(),
    };
    assert_eq!(draft.validate(), Err(DraftError::BodyEmpty));
}

#[test]
fn draft_rejects_overlong_body() {
    let draft = DraftComment {
        author: "Ada".to_owned(),
        body: "x".repeat(super::MAX_BODY_LEN + 1),
    };
    assert_eq!(
        draft.validate(),
        Err(DraftError::BodyTooLong {
            len: super::MAX_BODY_LEN + 1,
        })
    );
}
