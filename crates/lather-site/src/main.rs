#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = lather_site::run_from_env() {
        eprintln!("lather: {error}");
        std::process::exit(error.exit_code());
    }
}
