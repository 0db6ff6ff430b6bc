use std::process::ExitCode;

fn main() -> ExitCode {
    detaug::logger::init();

    match detaug::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
