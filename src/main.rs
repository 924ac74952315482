mod args;
mod runoff;

use clap::Parser;
use log::debug;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    if args.verbose {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }
    debug!("arguments: {:?}", args);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    if let Err(e) = runoff::run_app(&args, &mut input, &mut output) {
        println!("{}", e);
        std::process::exit(e.exit_code());
    }
}
