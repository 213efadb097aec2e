use clap::Parser;
use scitable::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    match cli::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
