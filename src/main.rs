// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use monthbook::models::TransactionKind;
use monthbook::tracker::Tracker;
use monthbook::{cli, commands, db, utils};

fn main() -> Result<()> {
    setup_logging();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let path = match matches.get_one::<String>("db") {
        Some(p) => PathBuf::from(p),
        None => db::db_path()?,
    };
    let store = db::open_or_init(Some(&path))?;
    let scope = utils::get_archive_scope(store.connection())?;
    let mut tracker = Tracker::open(store).with_scope(scope);

    match matches.subcommand() {
        Some(("path", _)) => println!("{}", path.display()),
        Some(("income", sub)) => {
            commands::transactions::add(&mut tracker, TransactionKind::Income, sub)?;
        }
        Some(("expense", sub)) => {
            commands::transactions::add(&mut tracker, TransactionKind::Expense, sub)?;
        }
        Some(("list", sub)) => commands::transactions::list(&tracker, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&tracker, sub)?,
        Some(("history", sub)) => commands::history::handle(&tracker, sub)?,
        Some(("reset", sub)) => commands::reset::handle(&mut tracker, sub)?,
        Some(("categories", _)) => commands::categories::handle(),
        Some(("config", sub)) => commands::config::handle(tracker.backend().connection(), sub)?,
        Some(("export", sub)) => commands::exporter::handle(&tracker, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    if tracker.is_dirty() {
        eprintln!(
            "warning: changes could not be saved to {}",
            path.display()
        );
    }
    Ok(())
}

fn setup_logging() {
    let filter =
        EnvFilter::try_from_env("MONTHBOOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}
