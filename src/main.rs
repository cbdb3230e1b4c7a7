use clap::Parser;
use phasewatch::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
