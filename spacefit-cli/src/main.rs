//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::{Builder, Env};

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    Builder::from_env(Env::default().default_filter_or("warn")).init();
    if let Err(err) = spacefit_cli::run() {
        eprintln!("spacefit: {err}");
        std::process::exit(1);
    }
}
