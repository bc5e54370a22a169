// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galatea, a threaded comment board for the terminal.
//!
//! Single-crate layout: `model` holds the board tree, `ops` applies mutations,
//! `store` persists board folders, `tui` is the interactive shell.

pub mod model;
pub mod ops;
pub mod query;
pub mod render;
pub mod store;
pub mod tui;

#[cfg(test)]
mod tests {
    #[test]
    fn sanity() {
        assert_eq!(2 + 2, 4);
    }
}
