//! Wordlens CLI binary entrypoint.

fn main() {
    if let Err(err) = wordlens_cli::app::run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
