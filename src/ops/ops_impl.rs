// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Op-application over the working comment list.
fn apply_post(
    comments: &mut Vec<Comment>,
    comment_id: CommentId,
    author: &str,
    body: &str,
    time: Timestamp,
    parent_id: Option<CommentId>,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    if contains_comment_id(comments, comment_id) {
        return Err(ApplyError::AlreadyExists { comment_id });
    }

    let comment = Comment::new(comment_id, author, body, time);

    let Some(parent_id) = parent_id else {
        comments.push(comment);
        delta.record_added(comment_id);
        return Ok(());
    };

    // Only top-level comments accept replies; the scan below is what keeps
    // the nesting depth capped at one level.
    if let Some(parent) = comments
        .iter_mut()
        .find(|candidate| candidate.comment_id() == parent_id)
    {
        parent.replies_mut().push(comment);
        delta.record_added(comment_id);
        delta.record_updated(parent_id);
        return Ok(());
    }

    if comments
        .iter()
        .any(|candidate| reply_of(candidate, parent_id).is_some())
    {
        return Err(ApplyError::ParentIsReply { parent_id });
    }

    Err(ApplyError::ParentNotFound { parent_id })
}

fn apply_edit(
    comments: &mut [Comment],
    comment_id: CommentId,
    body: &str,
    time: Timestamp,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    let Some(comment) = find_comment_mut(comments, comment_id) else {
        return Err(ApplyError::NotFound { comment_id });
    };

    comment.set_body(body);
    comment.set_time(time);
    delta.record_updated(comment_id);
    Ok(())
}

fn apply_delete(
    comments: &mut Vec<Comment>,
    comment_id: CommentId,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    if let Some(idx) = comments
        .iter()
        .position(|candidate| candidate.comment_id() == comment_id)
    {
        let removed = comments.remove(idx);
        delta.record_removed(removed.comment_id());
        for reply in removed.replies() {
            delta.record_removed(reply.comment_id());
        }
        return Ok(());
    }

    for comment in comments.iter_mut() {
        let parent_id = comment.comment_id();
        if let Some(idx) = comment
            .replies()
            .iter()
            .position(|reply| reply.comment_id() == comment_id)
        {
            let removed = comment.replies_mut().remove(idx);
            delta.record_removed(removed.comment_id());
            delta.record_updated(parent_id);
            return Ok(());
        }
    }

    Err(ApplyError::NotFound { comment_id })
}

fn apply_sort(comments: &mut [Comment], order: SortOrder) {
    // `sort_by` is stable, so equal timestamps keep posting order. Replies
    // retain insertion order unconditionally.
    match order {
        SortOrder::NewestFirst => comments.sort_by(|a, b| b.time().cmp(&a.time())),
        SortOrder::OldestFirst => comments.sort_by(|a, b| a.time().cmp(&b.time())),
    }
}

fn contains_comment_id(comments: &[Comment], comment_id: CommentId) -> bool {
    comments.iter().any(|comment| {
        comment.comment_id() == comment_id || reply_of(comment, comment_id).is_some()
    })
}

fn reply_of(comment: &Comment, comment_id: CommentId) -> Option<&Comment> {
    comment
        .replies()
        .iter()
        .find(|reply| reply.comment_id() == comment_id)
}

fn find_comment_mut(comments: &mut [Comment], comment_id: CommentId) -> Option<&mut Comment> {
    for comment in comments.iter_mut() {
        if comment.comment_id() == comment_id {
            return Some(comment);
        }
        if let Some(reply) = comment
            .replies_mut()
            .iter_mut()
            .find(|reply| reply.comment_id() == comment_id)
        {
            return Some(reply);
        }
    }
    None
}
