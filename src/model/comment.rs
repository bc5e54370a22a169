// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::CommentId;
use super::time::Timestamp;

/// A single user-submitted entry.
///
/// Replies nest exactly one level deep; `ops` enforces the cap, so a reply
/// carried inside `replies` never owns replies of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    comment_id: CommentId,
    author: String,
    body: String,
    time: Timestamp,
    replies: Vec<Comment>,
}

impl Comment {
    pub fn new(
        comment_id: CommentId,
        author: impl Into<String>,
        body: impl Into<String>,
        time: Timestamp,
    ) -> Self {
        Self {
            comment_id,
            author: author.into(),
            body: body.into(),
            time,
            replies: Vec::new(),
        }
    }

    pub fn comment_id(&self) -> CommentId {
        self.comment_id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn time(&self) -> Timestamp {
        self.time
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn set_time(&mut self, time: Timestamp) {
        self.time = time;
    }

    pub fn replies(&self) -> &[Comment] {
        &self.replies
    }

    pub fn replies_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.replies
    }
}

#[cfg(test)]
mod tests {
    use super::Comment;
    use crate::model::{CommentId, Timestamp};

    #[test]
    fn edit_setters_preserve_id_and_author() {
        let mut comment = Comment::new(
            CommentId::from_millis(1),
            "Ada",
            "First",
            Timestamp::from_millis(1),
        );

        comment.set_body("Second thoughts");
        comment.set_time(Timestamp::from_millis(2));

        assert_eq!(comment.comment_id(), CommentId::from_millis(1));
        assert_eq!(comment.author(), "Ada");
        assert_eq!(comment.body(), "Second thoughts");
        assert_eq!(comment.time(), Timestamp::from_millis(2));
    }

    #[test]
    fn new_comment_starts_without_replies() {
        let comment = Comment::new(
            CommentId::from_millis(7),
            "Grace",
            "Hello",
            Timestamp::from_millis(7),
        );
        assert!(comment.replies().is_empty());
    }
}
