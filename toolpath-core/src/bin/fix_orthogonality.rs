use std::process::ExitCode;

use toolpath_core::cli;

fn main() -> ExitCode {
    cli::init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::exit_code(cli::run_orthogonality(&args))
}
