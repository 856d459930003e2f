//! # Folio CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/folioapp/`: UI-agnostic library: store, loader, viewer, carousel
//! - `crates/folio/`: this CLI, a host for the library's headless page
//!
//! The library never touches the terminal. The CLI drives a
//! `HeadlessPage`, feeds it actions the way a browser would, and prints what
//! ended up on the page: rendered lists, the viewer frame, the ring.
//!
//! ## Testing Approach
//!
//! Logic is tested in `folioapp`. Here, `tests/cli_e2e.rs` runs the binary
//! against a temporary data directory and checks its output.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
