// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for boards on disk.
//!
//! The store module reads/writes the board folder format (normalized board
//! file plus an asynchronously exported transcript) used by the TUI.

pub mod board_folder;

pub use board_folder::{BoardFolder, StoreError, WriteDurability};
