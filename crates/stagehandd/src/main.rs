use std::process::ExitCode;

fn main() -> ExitCode {
    match stagehandd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("stagehandd: {error}");
            ExitCode::FAILURE
        }
    }
}
