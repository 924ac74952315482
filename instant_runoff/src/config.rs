// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Capacity bounds applied when an election is set up.
///
/// The bounds are validated in two stages: the candidate list when the
/// election is created, the voter count when the ballot store is allocated.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct ElectionLimits {
    pub max_candidates: usize,
    pub max_voters: usize,
}

impl ElectionLimits {
    pub const DEFAULT: ElectionLimits = ElectionLimits {
        max_candidates: 9,
        max_voters: 100,
    };
}

// ******** Output data structures *********

/// Statistics for one round
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    /// Tallies of the still-running candidates, in registration order.
    pub tally: Vec<(String, u64)>,
    /// Names eliminated at the end of this round. Empty for a terminal round.
    pub eliminated: Vec<String>,
    /// Ballots whose every ranked candidate was already eliminated.
    pub exhausted: u64,
}

/// How the election ended.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ElectionOutcome {
    /// A single candidate reached the majority threshold.
    Majority(String),
    /// Every remaining candidate held the same tally; all of them win.
    FullTie(Vec<String>),
}

impl ElectionOutcome {
    /// The winning names, in registration order.
    pub fn winners(&self) -> &[String] {
        match self {
            ElectionOutcome::Majority(name) => std::slice::from_ref(name),
            ElectionOutcome::FullTie(names) => names,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub outcome: ElectionOutcome,
    /// Majority threshold: floor(voter_count / 2) + 1.
    pub threshold: u64,
    pub round_stats: Vec<RoundStats>,
}

/// Errors that prevent an election from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingError {
    EmptyElection,
    TooManyCandidates { count: usize, max: usize },
    TooManyVoters { count: usize, max: usize },
    DuplicateCandidate(String),
    UnknownCandidate(String),
    /// A ballot slot that does not exist or was not filled in rank order.
    BallotSlot { voter: usize, rank: usize },
    NoConvergence,
}

impl Error for VotingError {}

impl Display for VotingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingError::EmptyElection => write!(f, "no candidate was registered"),
            VotingError::TooManyCandidates { count, max } => {
                write!(f, "{} candidates exceed the maximum of {}", count, max)
            }
            VotingError::TooManyVoters { count, max } => {
                write!(f, "{} voters exceed the maximum of {}", count, max)
            }
            VotingError::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} was registered twice", name)
            }
            VotingError::UnknownCandidate(name) => {
                write!(f, "{:?} does not name a registered candidate", name)
            }
            VotingError::BallotSlot { voter, rank } => {
                write!(f, "no ballot slot for voter {} at rank {}", voter, rank)
            }
            VotingError::NoConvergence => write!(f, "the election rounds did not converge"),
        }
    }
}
