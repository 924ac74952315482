// Interactive collection of the election input, one line per answer.

use std::io::{BufRead, Write};

use instant_runoff::{Election, VotingError};
use log::debug;

use crate::runoff::*;

/// Prompts for the number of voters until an integer is entered.
pub fn read_voter_count<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> RunoffResult<usize> {
    loop {
        write!(output, "Number of voters: ").context(WritingOutputSnafu {})?;
        output.flush().context(WritingOutputSnafu {})?;
        let line = match read_prompt_line(input)? {
            Some(line) => line,
            None => whatever!("End of input while reading the number of voters"),
        };
        match line.trim().parse::<usize>() {
            Ok(count) => return Ok(count),
            Err(_) => debug!("read_voter_count: not an integer: {:?}", line),
        }
    }
}

/// Collects every voter's full ranked ballot, one candidate name per rank.
///
/// The first name that matches no registered candidate aborts the whole
/// collection. There is no partial acceptance and no retry.
pub fn collect_ballots<R: BufRead, W: Write>(
    election: &mut Election,
    input: &mut R,
    output: &mut W,
) -> RunoffResult<()> {
    for voter in 0..election.voter_count() {
        for rank in 0..election.candidate_count() {
            write!(output, "Rank {}: ", rank + 1).context(WritingOutputSnafu {})?;
            output.flush().context(WritingOutputSnafu {})?;
            let name = match read_prompt_line(input)? {
                Some(line) => line,
                None => whatever!("End of input while reading a ballot"),
            };
            match election.record_vote(voter, rank, &name) {
                Ok(()) => {}
                Err(VotingError::UnknownCandidate(_)) => return InvalidVoteSnafu {}.fail(),
                Err(e) => whatever!("Unexpected error while recording a vote: {}", e),
            }
        }
        writeln!(output).context(WritingOutputSnafu {})?;
    }
    Ok(())
}

// A line with its end-of-line marker stripped, or None at end of input.
// Candidate names are matched byte for byte, so nothing else is trimmed.
fn read_prompt_line<R: BufRead>(input: &mut R) -> RunoffResult<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context(ReadingInputSnafu {})?;
    if read == 0 {
        return Ok(None);
    }
    let stripped = line.strip_suffix('\n').unwrap_or(&line);
    let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);
    Ok(Some(stripped.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::runoff::RunoffError;
    use instant_runoff::ElectionLimits;

    fn election(names: &[&str]) -> Election {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        Election::new(&names, &ElectionLimits::DEFAULT).unwrap()
    }

    #[test]
    fn voter_count_reprompts_until_an_integer_arrives() {
        let mut input = Cursor::new(&b"twenty\n\n3\n"[..]);
        let mut output: Vec<u8> = Vec::new();
        let count = read_voter_count(&mut input, &mut output).unwrap();
        assert_eq!(count, 3);
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(
            printed,
            "Number of voters: Number of voters: Number of voters: "
        );
    }

    #[test]
    fn voter_count_fails_at_end_of_input() {
        let mut input = Cursor::new(&b"twenty\n"[..]);
        let mut output: Vec<u8> = Vec::new();
        let err = read_voter_count(&mut input, &mut output).unwrap_err();
        assert!(matches!(err, RunoffError::Whatever { .. }));
    }

    #[test]
    fn ballots_are_prompted_rank_by_rank() {
        let mut e = election(&["Alice", "Bob"]);
        e.register_voters(2).unwrap();
        let mut input = Cursor::new(&b"Alice\nBob\nBob\nAlice\n"[..]);
        let mut output: Vec<u8> = Vec::new();
        collect_ballots(&mut e, &mut input, &mut output).unwrap();
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed, "Rank 1: Rank 2: \nRank 1: Rank 2: \n");
    }

    #[test]
    fn an_unknown_name_is_an_invalid_vote() {
        let mut e = election(&["Alice", "Bob"]);
        e.register_voters(1).unwrap();
        let mut input = Cursor::new(&b"Alice\nMallory\n"[..]);
        let mut output: Vec<u8> = Vec::new();
        let err = collect_ballots(&mut e, &mut input, &mut output).unwrap_err();
        assert!(matches!(err, RunoffError::InvalidVote {}));
    }

    #[test]
    fn names_match_byte_for_byte() {
        let mut e = election(&[" Alice"]);
        e.register_voters(1).unwrap();
        let mut input = Cursor::new(&b" Alice\r\n"[..]);
        let mut output: Vec<u8> = Vec::new();
        collect_ballots(&mut e, &mut input, &mut output).unwrap();
    }
}
