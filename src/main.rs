use clap::Parser;
use payoffkit::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
