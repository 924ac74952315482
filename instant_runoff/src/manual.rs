/*!

This is the long-form manual for `instant_runoff` and the `runoff` command.

## Running an election

The candidates are declared on the command line, in ballot order:

```bash
runoff Alice Bob Charlie
```

The program then prompts for the number of voters and, for each voter, for one
candidate name per rank, most preferred first:

```text
Number of voters: 3
Rank 1: Alice
Rank 2: Bob
Rank 3: Charlie

Rank 1: Alice
Rank 2: Charlie
Rank 3: Bob

Rank 1: Bob
Rank 2: Alice
Rank 3: Charlie

Alice
```

Votes are tabulated in rounds. Each round, every ballot credits one vote to
its highest-ranked candidate that is still running. A candidate holding a
strict majority (more than half of the voters) wins and the program prints
their name. Otherwise the candidates sharing the lowest tally are all
eliminated and the ballots are recounted. If at some round every remaining
candidate holds the same tally, they are all declared winners and each name is
printed on its own line.

A ballot whose every ranked candidate has been eliminated is exhausted: it
simply contributes no vote from that round on.

## Limits

The candidate list and the voter count are bounded. The defaults (9
candidates, 100 voters) can be raised or lowered with `--max-candidates` and
`--max-voters`; both are validated before any ballot is collected.

## Exit codes

| code | meaning |
|------|---------|
| 0    | the election completed and the winners were printed |
| 1    | usage error: no candidate was given |
| 2    | more candidates than the maximum |
| 3    | more voters than the maximum |
| 4    | a rank named no registered candidate |

Any name that does not exactly match a registered candidate aborts the whole
run with `Invalid vote.` — there is no partial acceptance and no retry.

## Summary output

With `--json`, a summary of every round (tallies, eliminations, exhausted
ballots) is printed to the standard output after the winner names, in JSON.
Verbose per-round logging is available with `--verbose` or through the
conventional `RUST_LOG` environment variable.

*/
