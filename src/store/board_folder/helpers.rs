// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Board folder persistence helpers: normalized json conversion and safe
/// filesystem writes.
///
/// The on-disk schema is the normalized layout: top-level comments in one
/// array, all replies in a flat array tagged with their parent `comment_id`,
/// both in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoardFileJson {
    #[serde(default = "default_board_file_version")]
    version: u64,
    board_id: String,
    #[serde(default)]
    rev: u64,
    #[serde(default)]
    comments: Vec<CommentJson>,
    #[serde(default)]
    replies: Vec<ReplyJson>,
}

fn default_board_file_version() -> u64 {
    BOARD_FILE_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CommentJson {
    id: u64,
    name: String,
    comment: String,
    time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReplyJson {
    id: u64,
    name: String,
    comment: String,
    time: u64,
    comment_id: u64,
}

fn board_to_json(board: &Board) -> BoardFileJson {
    let mut comments = Vec::with_capacity(board.comments().len());
    let mut replies = Vec::new();

    for comment in board.comments() {
        comments.push(CommentJson {
            id: comment.comment_id().as_millis(),
            name: comment.author().to_owned(),
            comment: comment.body().to_owned(),
            time: comment.time().as_millis(),
        });
        for reply in comment.replies() {
            replies.push(ReplyJson {
                id: reply.comment_id().as_millis(),
                name: reply.author().to_owned(),
                comment: reply.body().to_owned(),
                time: reply.time().as_millis(),
                comment_id: comment.comment_id().as_millis(),
            });
        }
    }

    BoardFileJson {
        version: BOARD_FILE_VERSION,
        board_id: board.board_id().to_string(),
        rev: board.rev(),
        comments,
        replies,
    }
}

fn board_from_json(path: &Path, json: BoardFileJson) -> Result<Board, StoreError> {
    if json.version != BOARD_FILE_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: json.version,
        });
    }

    let board_id = BoardId::new(json.board_id.clone()).map_err(|source| StoreError::InvalidId {
        field: "board_id",
        value: json.board_id.clone(),
        source: Box::new(source),
    })?;

    let mut board = Board::new(board_id);
    let mut seen = BTreeSet::<u64>::new();

    for entry in &json.comments {
        if !seen.insert(entry.id) {
            return Err(StoreError::DuplicateCommentId {
                path: path.to_path_buf(),
                comment_id: CommentId::from_millis(entry.id),
            });
        }
        board.comments_mut().push(Comment::new(
            CommentId::from_millis(entry.id),
            entry.name.clone(),
            entry.comment.clone(),
            Timestamp::from_millis(entry.time),
        ));
    }

    for entry in &json.replies {
        if !seen.insert(entry.id) {
            return Err(StoreError::DuplicateCommentId {
                path: path.to_path_buf(),
                comment_id: CommentId::from_millis(entry.id),
            });
        }
        let parent_id = CommentId::from_millis(entry.comment_id);
        let Some(parent) = board
            .comments_mut()
            .iter_mut()
            .find(|comment| comment.comment_id() == parent_id)
        else {
            return Err(StoreError::DanglingReply {
                path: path.to_path_buf(),
                reply_id: CommentId::from_millis(entry.id),
                parent_id,
            });
        };
        parent.replies_mut().push(Comment::new(
            CommentId::from_millis(entry.id),
            entry.name.clone(),
            entry.comment.clone(),
            Timestamp::from_millis(entry.time),
        ));
    }

    board.set_rev(json.rev);
    Ok(board)
}

fn to_relative_path<'a>(
    board_dir: &Path,
    path: &'a Path,
    field: &'static str,
) -> Result<&'a Path, StoreError> {
    let relative = path
        .strip_prefix(board_dir)
        .map_err(|_| StoreError::PathOutsideBoard {
            board_dir: board_dir.to_path_buf(),
            path: path.to_path_buf(),
        })?;

    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(StoreError::InvalidRelativePath {
                    field,
                    value: relative.to_path_buf(),
                })
            }
        }
    }

    Ok(relative)
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic_in_board(
    board_dir: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    write_atomic_in_board_inner(board_dir, path, contents, durability, true)
}

fn write_atomic_in_board_if_board_dir_exists(
    board_dir: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    write_atomic_in_board_inner(board_dir, path, contents, durability, false)
}

fn write_atomic_in_board_inner(
    board_dir: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
    create_root: bool,
) -> Result<(), StoreError> {
    if create_root {
        fs::create_dir_all(board_dir).map_err(|source| StoreError::Io {
            path: board_dir.to_path_buf(),
            source,
        })?;
    } else {
        match fs::metadata(board_dir) {
            Ok(md) if md.is_dir() => {}
            Ok(_) => return Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: board_dir.to_path_buf(),
                    source,
                })
            }
        }
    }

    to_relative_path(board_dir, path, "path")?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    fs::create_dir_all(parent).map_err(|source| StoreError::Io {
        path: parent.to_path_buf(),
        source,
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".galatea.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}
