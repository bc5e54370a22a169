// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A board holds top-level comments in posting order, each with one level of
//! replies. Comment ids double as creation timestamps (millisecond epoch).

pub mod board;
pub mod comment;
pub(crate) mod fixtures;
pub mod ids;
pub mod time;

pub use board::Board;
pub use comment::Comment;
pub use ids::{BoardId, CommentId, CommentIdSource, Id, IdError, ParseCommentIdError};
pub use time::Timestamp;
