// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Galatea CLI entrypoint.
//!
//! By default this opens the interactive board TUI on the board folder given
//! on the command line (or the current working directory).

use std::error::Error;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<board-dir>] [--durable-writes]\n  {program} [--board <dir>] [--durable-writes]\n  {program} --demo\n\nIf board-dir/--board is omitted, the current working directory is used.\n--demo uses a built-in demo board stored in a temporary folder and cannot be\ncombined with board-dir/--board.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    board_dir: Option<String>,
    durable_writes: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--board" => {
                if options.board_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.board_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.board_dir.is_some() {
                    return Err(());
                }
                options.board_dir = Some(arg);
            }
        }
    }

    if options.demo && options.board_dir.is_some() {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "galatea".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let (board, folder) = if options.demo {
            let now_millis = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0);
            let demo_dir = std::env::temp_dir()
                .join(format!("galatea-demo-board-{}-{now_millis}", std::process::id()));
            let folder = board_folder(demo_dir.to_string_lossy().into_owned(), &options);
            let board = galatea::tui::demo_board();
            folder.save_board(&board)?;
            (board, folder)
        } else {
            let dir = options.board_dir.clone().unwrap_or_else(|| ".".to_owned());
            let folder = board_folder(dir, &options);
            let board = folder.load_or_init_board()?;
            (board, folder)
        };

        galatea::tui::run_with_board(board, Some(folder))?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("galatea: {err}");
        std::process::exit(1);
    }
}

fn board_folder(dir: String, options: &CliOptions) -> galatea::store::BoardFolder {
    if options.durable_writes {
        galatea::store::BoardFolder::new(dir)
            .with_durability(galatea::store::WriteDurability::Durable)
    } else {
        galatea::store::BoardFolder::new(dir)
    }
}
