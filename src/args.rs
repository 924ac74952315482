use clap::Parser;

use instant_runoff::ElectionLimits;

/// This is an interactive instant-runoff election program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The declared candidates, in ballot order. At least one is required.
    #[clap(value_parser)]
    pub candidates: Vec<String>,

    /// The maximum number of candidates accepted on the command line.
    #[clap(long, value_parser, default_value_t = ElectionLimits::DEFAULT.max_candidates)]
    pub max_candidates: usize,

    /// The maximum number of voters accepted at the prompt.
    #[clap(long, value_parser, default_value_t = ElectionLimits::DEFAULT.max_voters)]
    pub max_voters: usize,

    /// If specified, a JSON summary of all the rounds is printed to the
    /// standard output after the winner names.
    #[clap(long, takes_value = false)]
    pub json: bool,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
