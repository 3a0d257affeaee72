//! Content backend for the London Karaoke Club site.
//!
//! The library holds the content store and its persistence, the image
//! ingest pipeline, the AI background generator and the operator commands.
//! The `lkc-cms` binary is a thin command-line front end over [`commands`].

pub mod admin;
mod busy;
pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod context;
pub mod generator;
pub mod ingest;
pub mod logging;
pub mod persistence;

pub use config::Config;
pub use content::{ContentStore, SectionKind, SectionValue, Snapshot};
pub use context::AppContext;

/// Binary entry point: runs one CLI command on a multi-threaded runtime.
pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(cli::main_entry()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
