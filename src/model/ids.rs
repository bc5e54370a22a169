// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A stable string identifier used across the model and persistence surfaces.
///
/// This is intentionally std-only; it only enforces that the id is a non-empty
/// *path segment* (i.e. contains no `/`), because board ids are derived from
/// folder names and appear in persisted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoardIdTag {}
pub type BoardId = Id<BoardIdTag>;

/// Numeric comment identifier: milliseconds since the Unix epoch at creation
/// time, made unique by [`CommentIdSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId(u64);

impl CommentId {
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = ParseCommentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| ParseCommentIdError {
                value: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommentIdError {
    value: String,
}

impl fmt::Display for ParseCommentIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid comment id {:?} (expected unsigned integer)",
            self.value
        )
    }
}

impl std::error::Error for ParseCommentIdError {}

/// Issues fresh comment ids from the system clock.
///
/// Ids are strictly monotonic even when the clock stalls or steps backwards:
/// a reading that is not past the previously issued id is bumped by one.
#[derive(Debug, Default, Clone)]
pub struct CommentIdSource {
    last_millis: u64,
}

impl CommentIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> CommentId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let issued = now.max(self.last_millis.saturating_add(1));
        self.last_millis = issued;
        CommentId::from_millis(issued)
    }

    /// Raises the monotonic floor past an already issued id, so that ids
    /// loaded from disk are never reissued.
    pub fn observe(&mut self, id: CommentId) {
        self.last_millis = self.last_millis.max(id.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::{CommentId, CommentIdSource, Id, IdError};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_slash() {
        let result: Result<Id<()>, _> = Id::new("a/b");
        assert_eq!(result, Err(IdError::ContainsSlash));
    }

    #[test]
    fn comment_id_parses_and_displays() {
        let id: CommentId = "1700000000000".parse().expect("comment id");
        assert_eq!(id, CommentId::from_millis(1_700_000_000_000));
        assert_eq!(id.to_string(), "1700000000000");
    }

    #[test]
    fn comment_id_rejects_non_numeric() {
        "c:abc".parse::<CommentId>().unwrap_err();
    }

    #[test]
    fn comment_id_source_is_strictly_monotonic() {
        let mut source = CommentIdSource::new();
        let mut last = source.next();
        for _ in 0..1000 {
            let next = source.next();
            assert!(next > last, "ids must be strictly increasing");
            last = next;
        }
    }

    #[test]
    fn comment_id_source_never_reissues_observed_ids() {
        let far_future = CommentId::from_millis(u64::MAX - 10);
        let mut source = CommentIdSource::new();
        source.observe(far_future);
        assert!(source.next() > far_future);
    }
}
