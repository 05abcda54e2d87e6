use clap::Parser;
use tasker::cli::commands::Cli;
use tasker::cli::handlers;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = handlers::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
