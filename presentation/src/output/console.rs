//! Console output formatter for councils and elections

use crate::output::formatter::OutputFormatter;
use crate::output::labels::{majority_label, vote_hint};
use colored::Colorize;
use votum_domain::{
    ConfigIssue, Council, CouncilStats, Election, ElectionPhase, ElectionResults, Motion,
    MotionResolution, Timestamp, VoteState, WeightTable,
};

/// Formats council and election state for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a council with all of its motions and its statistics
    pub fn format_council(council: &Council, now: Timestamp) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Council: {}", council.name())));
        output.push('\n');

        let weights = council.weights();
        output.push_str(&format!(
            "{} {} eligible, total weight {}\n",
            "Members:".cyan().bold(),
            weights.len(),
            weights.total()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Default majority:".cyan().bold(),
            majority_label(council.config().majority_default)
        ));

        if council.motions().is_empty() {
            output.push_str(&format!("\n{}\n", "No motions.".dimmed()));
        }

        let expiration = council.config().motion_expiration;
        for motion in council.motions() {
            output.push('\n');
            output.push_str(&Self::format_motion(
                motion,
                &weights,
                motion.is_expired(now, expiration),
            ));
        }

        output.push_str(&Self::section_header("Statistics"));
        output.push_str(&Self::format_stats(&council.stats()));
        output.push_str(&Self::footer());

        output
    }

    /// Format one motion: title, text, counts, voters and the progress hint
    pub fn format_motion(motion: &Motion, weights: &WeightTable, expired: bool) -> String {
        let mut output = String::new();
        let tally = motion.tally(weights);

        let unanimous = if motion.required_majority().is_unanimous() {
            " (unanimous)"
        } else {
            ""
        };
        let title = format!("#{} | ", motion.number());
        let title = match motion.resolution() {
            MotionResolution::Unresolved => {
                format!("{}Motion currently active{}", title, unanimous).blue()
            }
            MotionResolution::Passed => format!("{}Motion Passed{}", title, unanimous).green(),
            MotionResolution::Failed => format!("{}Motion Failed{}", title, unanimous).red(),
            MotionResolution::Killed => format!("{}Motion Killed", title).dimmed(),
        };
        output.push_str(&format!("{}\n", title.bold()));

        output.push_str(&format!(
            "{} {} ({})\n",
            "by".dimmed(),
            motion.author_name(),
            majority_label(motion.required_majority())
        ));
        output.push_str(&format!("{}\n\n", motion.text()));

        output.push_str(&format!(
            "  {} {}   {} {}   {} {}\n",
            "For".green().bold(),
            tally.yes,
            "Against".red().bold(),
            tally.no,
            "Abstain".bold(),
            tally.abs
        ));

        for vote in motion.votes() {
            let weight = weights.weight_of(&vote.author_id);
            let author = if weight > 1.0 {
                format!("{} [{}]", vote.author_name, weight)
            } else {
                vote.author_name.clone()
            };
            let name = match vote.state {
                VoteState::For => vote.name.green(),
                VoteState::Against => vote.name.red(),
                VoteState::Abstain => vote.name.normal(),
            };
            output.push_str(&format!("  {} {}", "*".dimmed(), author));
            output.push_str(&format!(": {}", name.bold()));
            if !vote.reason.is_empty() {
                output.push_str(&format!("  {}", vote.reason));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "{}\n",
            vote_hint(motion, &tally, expired).dimmed()
        ));
        output
    }

    /// Format an election in progress
    pub fn format_election(election: &Election) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            format!("Election {}", election.id()).yellow().bold(),
            format!("[{}]", election.phase()).dimmed()
        ));
        output.push_str(&format!("{} {}\n", "Reason:".cyan().bold(), election.reason()));
        output.push_str(&format!("{} {}\n", "Channel:".cyan().bold(), election.channel_id()));

        match election.phase() {
            ElectionPhase::Candidacy => output.push_str(&format!(
                "{} {}\n",
                "Candidacy ends:".cyan().bold(),
                format_time(election.ends_candidacy_at())
            )),
            ElectionPhase::Voting => {
                if let Some(ends_at) = election.ends_voting_at() {
                    output.push_str(&format!(
                        "{} {}\n",
                        "Voting ends:".cyan().bold(),
                        format_time(ends_at)
                    ));
                }
            }
            ElectionPhase::Finished => {}
        }

        if election.candidates().is_empty() {
            output.push_str(&format!("{}\n", "No candidates yet.".dimmed()));
            return output;
        }

        let standings = election.standings();
        for (marker, standing) in standings.iter().enumerate() {
            let candidate = &standing.candidate;
            output.push_str(&format!("  [{}] {}", marker + 1, candidate.name.bold()));
            if election.phase() != ElectionPhase::Candidacy {
                output.push_str(&format!(" {}", votes(standing.votes).dimmed()));
            }
            if !candidate.reason.is_empty() {
                output.push_str(&format!("  {}", candidate.reason));
            }
            output.push('\n');
        }
        output
    }

    /// Format the ranking of a finished election
    pub fn format_results(results: &ElectionResults) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header(&format!(
            "Results of {}: {}",
            results.election, results.reason
        )));

        if results.is_empty() {
            output.push_str(&format!("{}\n", "Nobody ran.".dimmed()));
            return output;
        }

        let winners = results.winners();
        for (rank, standing) in results.standings.iter().enumerate() {
            let line = format!(
                "  {}. {} ({})",
                rank + 1,
                standing.candidate.name,
                votes(standing.votes)
            );
            if winners.contains(&&standing.candidate) {
                output.push_str(&format!("{}\n", line.green().bold()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }

        match winners.len() {
            0 => output.push_str(&format!("{}\n", "No ballots were cast.".dimmed())),
            1 => {}
            _ => output.push_str(&format!("{}\n", "Tie for first place.".yellow())),
        }
        output.push_str(&format!(
            "{} {}\n",
            "Ballots:".dimmed(),
            results.ballots
        ));
        output
    }

    /// Format council statistics
    pub fn format_stats(stats: &CouncilStats) -> String {
        let mut output = format!(
            "{} {}\n",
            "Total motions:".cyan().bold(),
            stats.total_motions
        );

        output.push_str(&format!("\n{}\n", "Most motions:".bold()));
        for member in stats.most_motions() {
            output.push_str(&format!(
                "  {} {} ({} passed)\n",
                member.name, member.motions, member.passed
            ));
        }

        output.push_str(&format!("\n{}\n", "Last vote:".bold()));
        for member in stats.by_last_vote() {
            output.push_str(&format!(
                "  {} {}\n",
                member.name,
                member.last_vote.map(format_time).unwrap_or_else(|| "never".to_string())
            ));
        }
        output
    }

    /// Format configuration issues, errors first
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<&ConfigIssue> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());

        sorted
            .into_iter()
            .map(|issue| {
                if issue.is_error() {
                    format!("{} {}", "x".red(), issue.to_string().red())
                } else {
                    format!("{} {}", "!".yellow(), issue.to_string().yellow())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

/// Format a timestamp for display, in UTC
pub fn format_time(at: Timestamp) -> String {
    i64::try_from(at)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| at.to_string())
}

fn votes(count: usize) -> String {
    if count == 1 {
        "1 vote".to_string()
    } else {
        format!("{} votes", count)
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_council(&self, council: &Council, now: Timestamp) -> String {
        Self::format_council(council, now)
    }

    fn format_election(&self, election: &Election) -> String {
        Self::format_election(election)
    }

    fn format_results(&self, results: &ElectionResults) -> String {
        Self::format_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votum_domain::{Ballot, Candidate, CouncilConfig, ElectionId, Member};

    fn plain() {
        colored::control::set_override(false);
    }

    fn council() -> Council {
        let mut council = Council::new("general", "General", CouncilConfig::default())
            .with_roster(vec![
                Member::new("1", "Alice"),
                Member::new("2", "Bob"),
                Member::new("3", "Carol"),
            ]);
        council.set_weight("3", 2.0).unwrap();
        council
    }

    #[test]
    fn test_format_active_motion() {
        plain();
        let mut council = council();
        council
            .propose(&"1".into(), "Adopt the charter", 0)
            .unwrap();
        council
            .cast_vote(
                None,
                Ballot::new("3", "Carol", VoteState::For).with_reason("Long overdue"),
                0,
            )
            .unwrap();

        let output = ConsoleFormatter::format_motion(&council.motions()[0], &council.weights(), false);
        assert!(output.contains("#1 | Motion currently active"));
        assert!(output.contains("by Alice (Simple majority)"));
        assert!(output.contains("Carol [2]: For  Long overdue"));
        assert!(output.contains("With 1 more vote in favor"));
    }

    #[test]
    fn test_format_council_lists_stats() {
        plain();
        let mut council = council();
        council.propose(&"2".into(), "-u Rename the council", 0).unwrap();
        council.kill(None, 0).unwrap();

        let output = ConsoleFormatter::format_council(&council, 0);
        assert!(output.contains("Council: General"));
        assert!(output.contains("total weight 4"));
        assert!(output.contains("#1 | Motion Killed"));
        assert!(output.contains("Total motions: 1"));
        assert!(output.contains("Bob 1 (0 passed)"));
    }

    #[test]
    fn test_format_election_and_results() {
        plain();
        let mut election = Election::new(ElectionId::from("election-1"), "Chair", "elections", 0);
        election
            .add_candidate(Candidate::new("1", "Alice", "Experience"))
            .unwrap();
        election.add_candidate(Candidate::new("2", "Bob", "")).unwrap();

        let output = ConsoleFormatter::format_election(&election);
        assert!(output.contains("Election election-1 [Candidacy]"));
        assert!(output.contains("[1] Alice  Experience"));

        election.start_voting(60_000);
        election.cast_vote(&"3".into(), 2);
        let results = election.announce_results().unwrap();

        let output = ConsoleFormatter::format_results(&results);
        assert!(output.contains("1. Bob (1 vote)"));
        assert!(output.contains("2. Alice (0 votes)"));
        assert!(output.contains("Ballots: 1"));
    }

    #[test]
    fn test_format_issues_puts_errors_first() {
        plain();
        let issues = vec![
            ConfigIssue::warning(
                votum_domain::ConfigIssueCode::UnheldDictatorRole,
                "nobody holds chair",
            ),
            ConfigIssue::error(votum_domain::ConfigIssueCode::NegativeWeight, "bad weight"),
        ];
        let output = ConsoleFormatter::format_issues(&issues);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "x error: bad weight");
        assert_eq!(lines[1], "! warning: nobody holds chair");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "1970-01-01 00:00 UTC");
    }
}
