use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    process::exit(garrison::cli::run_with_args(&args));
}
