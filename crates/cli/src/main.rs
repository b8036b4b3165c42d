use std::process::ExitCode;

fn main() -> ExitCode {
    fleetdesk_cli::run()
}
