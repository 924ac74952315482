mod config;
pub mod manual;

use log::{debug, info};

use std::{collections::HashMap, iter::Sum, ops::AddAssign};

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(usize);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

// Invariant: eliminated is monotonic within one election run. The tally is
// derived state, recomputed from the ballots every round.
#[derive(Eq, PartialEq, Debug, Clone)]
struct Candidate {
    name: String,
    tally: VoteCount,
    eliminated: bool,
}

/// An instant-runoff election over a registered set of candidates.
///
/// The structure owns all the election state: the candidates in registration
/// order, the ballot matrix, and the capacity limits it was created with.
/// Ballots are collected once through [`Election::record_vote`] and are
/// immutable afterwards; [`Election::run`] then plays the rounds until a
/// majority winner emerges or every remaining candidate ties.
#[derive(Debug)]
pub struct Election {
    candidates: Vec<Candidate>,
    by_name: HashMap<String, CandidateId>,
    // ballots[voter][rank], most preferred first.
    ballots: Vec<Vec<CandidateId>>,
    limits: ElectionLimits,
}

impl Election {
    /// Registers the candidates for this election, in ballot order.
    ///
    /// Fails if the list exceeds `limits.max_candidates` or repeats a name.
    /// Name comparison is exact.
    pub fn new(names: &[String], limits: &ElectionLimits) -> Result<Election, VotingError> {
        if names.len() > limits.max_candidates {
            return Err(VotingError::TooManyCandidates {
                count: names.len(),
                max: limits.max_candidates,
            });
        }
        let mut by_name: HashMap<String, CandidateId> = HashMap::new();
        let mut candidates: Vec<Candidate> = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if by_name.insert(name.clone(), CandidateId(idx)).is_some() {
                return Err(VotingError::DuplicateCandidate(name.clone()));
            }
            candidates.push(Candidate {
                name: name.clone(),
                tally: VoteCount::EMPTY,
                eliminated: false,
            });
        }
        debug!("new: registered {} candidates", candidates.len());
        Ok(Election {
            candidates,
            by_name,
            ballots: Vec::new(),
            limits: *limits,
        })
    }

    /// Allocates the ballot store for `voter_count` voters.
    ///
    /// This is the second capacity stage: the candidate list is bounded by
    /// [`Election::new`], the voter count here.
    pub fn register_voters(&mut self, voter_count: usize) -> Result<(), VotingError> {
        if voter_count > self.limits.max_voters {
            return Err(VotingError::TooManyVoters {
                count: voter_count,
                max: self.limits.max_voters,
            });
        }
        self.ballots = vec![Vec::with_capacity(self.candidates.len()); voter_count];
        Ok(())
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn voter_count(&self) -> usize {
        self.ballots.len()
    }

    /// Records that `voter` ranked the candidate called `name` at `rank`
    /// (rank 0 is the most preferred).
    ///
    /// The name must match a registered candidate exactly, and the ranks of
    /// one voter must arrive in increasing order with no gap. A name that
    /// matches no candidate invalidates the whole ballot collection.
    pub fn record_vote(&mut self, voter: usize, rank: usize, name: &str) -> Result<(), VotingError> {
        let cid = *self
            .by_name
            .get(name)
            .ok_or_else(|| VotingError::UnknownCandidate(name.to_string()))?;
        if rank >= self.candidates.len() {
            return Err(VotingError::BallotSlot { voter, rank });
        }
        let ballot = self
            .ballots
            .get_mut(voter)
            .ok_or(VotingError::BallotSlot { voter, rank })?;
        if rank != ballot.len() {
            return Err(VotingError::BallotSlot { voter, rank });
        }
        debug!("record_vote: voter {} rank {}: {:?}", voter, rank, cid);
        ballot.push(cid);
        Ok(())
    }

    /// Records a full ballot for one voter, most preferred first.
    pub fn record_ballot(&mut self, voter: usize, names: &[&str]) -> Result<(), VotingError> {
        for (rank, name) in names.iter().enumerate() {
            self.record_vote(voter, rank, name)?;
        }
        Ok(())
    }

    /// Plays rounds until one candidate holds a strict majority or every
    /// remaining candidate ties, and reports the outcome with per-round
    /// statistics.
    pub fn run(&mut self) -> Result<ElectionResult, VotingError> {
        if self.candidates.is_empty() {
            return Err(VotingError::EmptyElection);
        }
        let threshold = self.majority_threshold();
        info!(
            "run: {} candidates, {} voters, winning threshold: {}",
            self.candidates.len(),
            self.ballots.len(),
            threshold.0
        );
        for c in self.candidates.iter() {
            info!("Candidate: {}", c.name);
        }

        let mut round_stats: Vec<RoundStats> = Vec::new();
        // Every round that neither elects nor ties eliminates at least one
        // candidate, so the loop is bounded by the candidate count.
        for round in 1..=(self.candidates.len() as u32) {
            self.reset_tallies();
            self.tabulate();

            let credited: VoteCount = self.candidates.iter().map(|c| c.tally).sum();
            let mut stats = RoundStats {
                round,
                tally: self.running_tally(),
                eliminated: Vec::new(),
                exhausted: self.ballots.len() as u64 - credited.0,
            };
            info!(
                "round {}: tally: {:?}, {} exhausted",
                round, stats.tally, stats.exhausted
            );

            if let Some(cid) = self.find_winner() {
                let name = self.candidates[cid.0].name.clone();
                info!("round {}: {} reaches the threshold", round, name);
                round_stats.push(stats);
                return Ok(ElectionResult {
                    outcome: ElectionOutcome::Majority(name),
                    threshold: threshold.0,
                    round_stats,
                });
            }

            let min = self.find_min();
            if self.is_tie(min) {
                let names = self.running_names();
                info!("round {}: full tie between {:?}", round, names);
                round_stats.push(stats);
                return Ok(ElectionResult {
                    outcome: ElectionOutcome::FullTie(names),
                    threshold: threshold.0,
                    round_stats,
                });
            }

            for cid in self.eliminate(min) {
                let name = self.candidates[cid.0].name.clone();
                info!("round {}: {} eliminated", round, name);
                stats.eliminated.push(name);
            }
            round_stats.push(stats);
        }
        Err(VotingError::NoConvergence)
    }

    fn majority_threshold(&self) -> VoteCount {
        VoteCount(self.ballots.len() as u64 / 2 + 1)
    }

    // Credits each ballot's first non-eliminated candidate with one vote.
    // Ballots whose every ranked candidate is eliminated are exhausted and
    // contribute nothing. Tallies must have been reset beforehand.
    fn tabulate(&mut self) {
        for ballot in self.ballots.iter() {
            let first_running = ballot
                .iter()
                .copied()
                .find(|cid| !self.candidates[cid.0].eliminated);
            if let Some(cid) = first_running {
                self.candidates[cid.0].tally += VoteCount(1);
            }
        }
    }

    // The first candidate in registration order whose tally reaches the
    // majority threshold. The scan covers the candidate set; eliminated
    // candidates hold an empty tally and cannot qualify.
    fn find_winner(&self) -> Option<CandidateId> {
        let threshold = self.majority_threshold();
        self.candidates
            .iter()
            .enumerate()
            .find(|(_, c)| c.tally >= threshold)
            .map(|(idx, _)| CandidateId(idx))
    }

    // Minimum tally among the non-eliminated candidates. The fallback is
    // larger than any real tally and only surfaces with no candidate left.
    fn find_min(&self) -> VoteCount {
        self.candidates
            .iter()
            .filter(|c| !c.eliminated)
            .map(|c| c.tally)
            .min()
            .unwrap_or(VoteCount(self.ballots.len() as u64))
    }

    // True iff every non-eliminated candidate holds exactly `min` votes.
    // With a single candidate left this is trivially true, which the round
    // loop treats as that candidate winning.
    fn is_tie(&self, min: VoteCount) -> bool {
        self.candidates
            .iter()
            .filter(|c| !c.eliminated)
            .all(|c| c.tally == min)
    }

    // Eliminates every non-eliminated candidate holding exactly `min` votes.
    // The whole last-place group goes at once.
    fn eliminate(&mut self, min: VoteCount) -> Vec<CandidateId> {
        let mut dropped: Vec<CandidateId> = Vec::new();
        for (idx, c) in self.candidates.iter_mut().enumerate() {
            if !c.eliminated && c.tally == min {
                c.eliminated = true;
                dropped.push(CandidateId(idx));
            }
        }
        dropped
    }

    fn reset_tallies(&mut self) {
        for c in self.candidates.iter_mut() {
            c.tally = VoteCount::EMPTY;
        }
    }

    fn running_tally(&self) -> Vec<(String, u64)> {
        self.candidates
            .iter()
            .filter(|c| !c.eliminated)
            .map(|c| (c.name.clone(), c.tally.0))
            .collect()
    }

    fn running_names(&self) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|c| !c.eliminated)
            .map(|c| c.name.clone())
            .collect()
    }
}
