//! ragdex CLI - index local directories and query them from the shell
//!
//! # Examples
//!
//! ```bash
//! # Index a directory (collection defaults to the directory name)
//! ragdex index ~/notes
//!
//! # Search it
//! ragdex search "borrow checker" -c notes
//!
//! # Inspect and clean up
//! ragdex list-collections
//! ragdex stats notes
//! ragdex delete notes -y
//! ```

use clap::Parser;
use ragdex::cli::{run, Cli};
use ragdex::core::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, false);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
