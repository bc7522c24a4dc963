// src/bin/cli.rs
use review_scrape::cli;

fn main() {
    let _ = color_eyre::install();
    if let Err(e) = cli::run() {
        let code = e.exit_code();
        eprintln!("Error: {:?}", color_eyre::eyre::Report::new(e));
        std::process::exit(code);
    }
}
