use clap::{Parser, Subcommand};
use folioapp::model::SectionKey;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

fn parse_section(s: &str) -> Result<SectionKey, String> {
    s.parse::<SectionKey>().map_err(|e| e.to_string())
}

/// Positions on the command line are 1-based, like the printed lists.
fn parse_position(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{}' is not a position (1, 2, ...)", s)),
    }
}

#[derive(Parser, Debug)]
#[command(name = "folio", bin_name = "folio", version = get_version())]
#[command(about = "Manage portfolio documents and image carousels", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $FOLIO_DATA, then the OS data directory)
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stored files, per section
    #[command(alias = "ls")]
    List {
        /// Only this section (e.g. 1-2)
        #[arg(value_parser = parse_section)]
        section: Option<SectionKey>,
    },

    /// Show every section with its document and image counts
    Sections,

    /// Upload files into a section
    Upload {
        #[arg(value_parser = parse_section)]
        section: SectionKey,

        /// Upload into the image collection instead of documents
        #[arg(short, long)]
        images: bool,

        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete a stored file by id
    #[command(alias = "rm")]
    Delete {
        id: u64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Open a document of a section in the viewer
    View {
        #[arg(value_parser = parse_section)]
        section: SectionKey,

        #[arg(value_parser = parse_position)]
        index: usize,

        /// Write the document to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the image carousel of a section
    Carousel {
        #[arg(value_parser = parse_section)]
        section: SectionKey,

        /// Image to face first
        #[arg(long, default_value = "1", value_parser = parse_position)]
        index: usize,

        /// Animation frames to run
        #[arg(long, default_value_t = 0)]
        frames: usize,

        /// Steps forward
        #[arg(long, default_value_t = 0)]
        next: usize,

        /// Steps back
        #[arg(long, default_value_t = 0)]
        prev: usize,

        /// Keep the pointer over the ring while frames run
        #[arg(long)]
        hover: bool,
    },
}
