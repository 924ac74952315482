use log::{debug, info};

use instant_runoff::*;
use snafu::{prelude::*, Snafu};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use std::io::{BufRead, Write};

use crate::args::Args;

pub mod prompt;

#[derive(Debug, Snafu)]
pub enum RunoffError {
    #[snafu(display("Usage: runoff [candidate ...]"))]
    Usage {},
    #[snafu(display("Maximum number of candidates is {max}"))]
    TooManyCandidates { max: usize },
    #[snafu(display("Maximum number of voters is {max}"))]
    TooManyVoters { max: usize },
    #[snafu(display("Invalid vote."))]
    InvalidVote {},
    #[snafu(display("Duplicate candidate name: {name}"))]
    DuplicateCandidate { name: String },
    #[snafu(display("Failed to read the input"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("Failed to write to the output"))]
    WritingOutput { source: std::io::Error },
    #[snafu(display("Failed to render the JSON summary"))]
    RenderingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RunoffResult<T> = Result<T, RunoffError>;

impl RunoffError {
    /// The documented process exit status for this failure.
    ///
    /// Usage-stage problems exit 1, the two capacity stages exit 2 and 3, a
    /// rank naming no registered candidate exits 4. Anything else (I/O
    /// failures, internal errors) folds into the usage status.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunoffError::TooManyCandidates { .. } => 2,
            RunoffError::TooManyVoters { .. } => 3,
            RunoffError::InvalidVote { .. } => 4,
            _ => 1,
        }
    }
}

fn result_stats_to_json(result: &ElectionResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in result.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (name, count) in round_stat.tally.iter() {
            tally.insert(name.clone(), json!(count));
        }

        let mut tally_results: Vec<JSValue> = Vec::new();
        for name in round_stat.eliminated.iter() {
            tally_results.push(json!({ "eliminated": name }));
        }

        let js = json!({
            "round": round_stat.round,
            "tally": tally,
            "tallyResults": tally_results,
            "exhausted": round_stat.exhausted,
        });
        l.push(js);
    }
    l
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub threshold: u64,
    pub winners: Vec<String>,
}

fn build_summary_js(result: &ElectionResult) -> JSValue {
    let c = OutputConfig {
        threshold: result.threshold,
        winners: result.outcome.winners().to_vec(),
    };
    json!({
        "config": c,
        "results": result_stats_to_json(result) })
}

/// Runs one whole election session against the given input and output.
///
/// The control flow follows the documented state machine: register the
/// candidates, prompt for the voter count, collect every ballot, then play
/// rounds until a majority winner or a full tie emerges. Every winner name is
/// written on its own line. Any failure aborts the session; the caller maps
/// it to the process exit status with [`RunoffError::exit_code`].
pub fn run_app<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> RunoffResult<()> {
    ensure!(!args.candidates.is_empty(), UsageSnafu);

    let limits = ElectionLimits {
        max_candidates: args.max_candidates,
        max_voters: args.max_voters,
    };
    debug!("limits: {:?}", limits);

    let mut election = match Election::new(&args.candidates, &limits) {
        Ok(e) => e,
        Err(VotingError::TooManyCandidates { max, .. }) => {
            return TooManyCandidatesSnafu { max }.fail()
        }
        Err(VotingError::DuplicateCandidate(name)) => {
            return DuplicateCandidateSnafu { name }.fail()
        }
        Err(e) => whatever!("Unexpected error while registering candidates: {}", e),
    };

    let voter_count = prompt::read_voter_count(input, output)?;
    match election.register_voters(voter_count) {
        Ok(()) => {}
        Err(VotingError::TooManyVoters { max, .. }) => return TooManyVotersSnafu { max }.fail(),
        Err(e) => whatever!("Unexpected error while registering voters: {}", e),
    }

    prompt::collect_ballots(&mut election, input, output)?;

    let result = match election.run() {
        Ok(r) => r,
        Err(e) => whatever!("Voting error: {}", e),
    };
    info!("result: {:?}", result);

    for name in result.outcome.winners() {
        writeln!(output, "{}", name).context(WritingOutputSnafu {})?;
    }

    if args.json {
        let result_js = build_summary_js(&result);
        let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(RenderingJsonSnafu {})?;
        writeln!(output, "{}", pretty_js_stats).context(WritingOutputSnafu {})?;
    }
    output.flush().context(WritingOutputSnafu {})?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn test_args(candidates: &[&str]) -> Args {
        Args {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            max_candidates: ElectionLimits::DEFAULT.max_candidates,
            max_voters: ElectionLimits::DEFAULT.max_voters,
            json: false,
            verbose: false,
        }
    }

    fn run_session(args: &Args, script: &str) -> (RunoffResult<()>, String) {
        let mut input = Cursor::new(script.as_bytes());
        let mut output: Vec<u8> = Vec::new();
        let res = run_app(args, &mut input, &mut output);
        (res, String::from_utf8(output).unwrap())
    }

    #[test]
    fn exit_codes_follow_the_documented_taxonomy() {
        assert_eq!(RunoffError::Usage {}.exit_code(), 1);
        assert_eq!(RunoffError::TooManyCandidates { max: 9 }.exit_code(), 2);
        assert_eq!(RunoffError::TooManyVoters { max: 100 }.exit_code(), 3);
        assert_eq!(RunoffError::InvalidVote {}.exit_code(), 4);
        assert_eq!(
            RunoffError::DuplicateCandidate {
                name: "Alice".to_string()
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn error_messages_match_the_cli_contract() {
        assert_eq!(
            RunoffError::Usage {}.to_string(),
            "Usage: runoff [candidate ...]"
        );
        assert_eq!(
            RunoffError::TooManyCandidates { max: 9 }.to_string(),
            "Maximum number of candidates is 9"
        );
        assert_eq!(
            RunoffError::TooManyVoters { max: 100 }.to_string(),
            "Maximum number of voters is 100"
        );
        assert_eq!(RunoffError::InvalidVote {}.to_string(), "Invalid vote.");
    }

    #[test]
    fn no_candidate_is_a_usage_error() {
        let args = test_args(&[]);
        let (res, _) = run_session(&args, "");
        assert!(matches!(res.unwrap_err(), RunoffError::Usage {}));
    }

    #[test]
    fn candidate_capacity_is_enforced_before_prompting() {
        let mut args = test_args(&["Alice", "Bob", "Charlie"]);
        args.max_candidates = 2;
        let (res, printed) = run_session(&args, "");
        assert!(matches!(
            res.unwrap_err(),
            RunoffError::TooManyCandidates { max: 2 }
        ));
        // No prompt was issued.
        assert_eq!(printed, "");
    }

    #[test]
    fn voter_capacity_is_enforced_after_the_prompt() {
        let mut args = test_args(&["Alice", "Bob"]);
        args.max_voters = 2;
        let (res, printed) = run_session(&args, "3\n");
        assert!(matches!(
            res.unwrap_err(),
            RunoffError::TooManyVoters { max: 2 }
        ));
        assert_eq!(printed, "Number of voters: ");
    }

    #[test]
    fn scripted_session_elects_a_majority_winner() {
        let args = test_args(&["Alice", "Bob", "Charlie"]);
        let script = "3\nAlice\nBob\nCharlie\nAlice\nBob\nCharlie\nBob\nAlice\nCharlie\n";
        let (res, printed) = run_session(&args, script);
        res.unwrap();
        assert!(printed.starts_with("Number of voters: "), "{}", printed);
        assert!(printed.ends_with("\nAlice\n"), "{}", printed);
    }

    #[test]
    fn scripted_session_prints_every_tied_winner() {
        let args = test_args(&["Alice", "Bob"]);
        let script = "2\nAlice\nBob\nBob\nAlice\n";
        let (res, printed) = run_session(&args, script);
        res.unwrap();
        assert!(printed.ends_with("\nAlice\nBob\n"), "{}", printed);
    }

    #[test]
    fn invalid_vote_aborts_the_session() {
        let args = test_args(&["Alice", "Bob"]);
        let (res, printed) = run_session(&args, "1\nZed\n");
        assert!(matches!(res.unwrap_err(), RunoffError::InvalidVote {}));
        assert_eq!(printed, "Number of voters: Rank 1: ");
    }

    #[test]
    fn json_summary_follows_the_winners() {
        let mut args = test_args(&["Alice"]);
        args.json = true;
        let (res, printed) = run_session(&args, "1\nAlice\n");
        res.unwrap();
        assert!(printed.contains("\nAlice\n"), "{}", printed);
        assert!(printed.contains("\"results\""), "{}", printed);
        assert!(printed.contains("\"threshold\": 1"), "{}", printed);
    }

    #[test]
    fn summary_json_carries_rounds_and_winners() {
        let result = ElectionResult {
            outcome: ElectionOutcome::Majority("Bob".to_string()),
            threshold: 3,
            round_stats: vec![
                RoundStats {
                    round: 1,
                    tally: vec![
                        ("Alice".to_string(), 2),
                        ("Bob".to_string(), 2),
                        ("Charlie".to_string(), 1),
                    ],
                    eliminated: vec!["Charlie".to_string()],
                    exhausted: 0,
                },
                RoundStats {
                    round: 2,
                    tally: vec![("Alice".to_string(), 2), ("Bob".to_string(), 3)],
                    eliminated: Vec::new(),
                    exhausted: 0,
                },
            ],
        };
        let js = build_summary_js(&result);
        assert_eq!(js["config"]["threshold"], json!(3));
        assert_eq!(js["config"]["winners"], json!(["Bob"]));
        assert_eq!(js["results"][0]["round"], json!(1));
        assert_eq!(js["results"][0]["tally"]["Charlie"], json!(1));
        assert_eq!(
            js["results"][0]["tallyResults"][0]["eliminated"],
            json!("Charlie")
        );
        assert_eq!(js["results"][1]["exhausted"], json!(0));
    }
}
