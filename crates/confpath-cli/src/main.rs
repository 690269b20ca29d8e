use std::process::ExitCode;

fn main() -> ExitCode {
    confpath_cli::run()
}
