pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "relayfs")]
#[command(
    about = "Use a remote messaging channel like a file system.\n\n> Every mutating command prints a new root ID; pass it to the next command with --root.",
    long_about = None
)]
pub struct Args {
    /// Path to the object store directory (defaults to the user data dir)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
