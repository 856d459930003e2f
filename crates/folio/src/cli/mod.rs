//! # CLI Behavior
//!
//! This is **one possible host** for folio. It is the only place that knows
//! about terminal I/O, exit codes, prompts and output formatting.
//!
//! ## Commands
//!
//! - `folio` / `folio list [SECTION]`: rows per section
//! - `folio sections`: section keys with document and image counts
//! - `folio upload SECTION [--images] FILES...`: media types are sniffed
//!   from content, so a renamed text file is still rejected as a PDF
//! - `folio delete ID [--yes]`: confirms on the terminal unless `--yes`
//! - `folio view SECTION INDEX [--output PATH]`: opens the document viewer
//!   and optionally writes the document out
//! - `folio carousel SECTION ...`: opens the ring and runs frames, steps
//!   and hover the way a browser session would
//!
//! ## Module Structure
//!
//! - `commands`: context wiring, logging setup and per-command handlers
//! - `print`: terminal output
//! - `setup`: argument parsing via clap
//! - `sniff`: media type detection for files read from disk

mod commands;
mod print;
pub mod setup;
mod sniff;

pub use commands::run;
