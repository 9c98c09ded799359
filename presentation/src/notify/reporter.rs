//! Console rendering of governance events as they happen

use crate::output::console::format_time;
use crate::output::labels::majority_label;
use colored::Colorize;
use votum_application::ports::notification::{GovernanceEvent, GovernanceNotifier};
use votum_domain::{CastVoteStatus, MotionResolution, ResolutionEffect};

/// Prints one line per event to stdout
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Render an event as one or more lines
    pub fn render(event: &GovernanceEvent) -> String {
        match event {
            GovernanceEvent::MotionProposed {
                council,
                motion,
                author_name,
                text,
                majority,
                ..
            } => format!(
                "{} {} #{} by {} ({}): {}",
                "->".cyan(),
                council.to_string().bold(),
                motion,
                author_name,
                majority_label(*majority),
                text
            ),
            GovernanceEvent::VoteCast {
                motion,
                author_name,
                state,
                status,
                tally,
                ..
            } => {
                let verb = match status {
                    CastVoteStatus::Changed => "changed to",
                    _ => "voted",
                };
                format!(
                    "  {} {} {} {} on #{}  [{} / {} / {}, {} to pass]",
                    "*".dimmed(),
                    author_name,
                    verb,
                    state.to_string().bold(),
                    motion,
                    tally.yes,
                    tally.no,
                    tally.abs,
                    tally.to_pass
                )
            }
            GovernanceEvent::VoteRetracted { motion, author, .. } => format!(
                "  {} {} retracted their vote on #{}",
                "*".dimmed(),
                author,
                motion
            ),
            GovernanceEvent::MotionResolved { council, report } => {
                let motion = &report.motion;
                let resolution = match motion.resolution {
                    MotionResolution::Passed => "Passed".green(),
                    MotionResolution::Failed => "Failed".red(),
                    MotionResolution::Killed => "Killed".dimmed(),
                    MotionResolution::Unresolved => "Unresolved".normal(),
                };
                let mut line = format!(
                    "{} {} #{} {}",
                    "<-".cyan(),
                    council.to_string().bold(),
                    motion.motion,
                    resolution.bold()
                );
                if motion.did_expire {
                    line.push_str(&" (expired)".dimmed().to_string());
                }
                for effect in &report.effects {
                    let note = match effect {
                        ResolutionEffect::Announce { channel } => {
                            format!("announce in #{}", channel)
                        }
                        ResolutionEffect::CloseDeliberation { archive_transcript: true } => {
                            "close deliberation, archive transcript".to_string()
                        }
                        ResolutionEffect::CloseDeliberation { .. } => {
                            "close deliberation".to_string()
                        }
                    };
                    line.push_str(&format!("\n    {} {}", "-".dimmed(), note.dimmed()));
                }
                for action in &report.finish_actions {
                    line.push_str(&format!(
                        "\n    {} {}",
                        "-".dimmed(),
                        format!("forward to {}", action.to).dimmed()
                    ));
                }
                line
            }
            GovernanceEvent::ElectionOpened {
                election,
                reason,
                channel,
                ends_candidacy_at,
            } => format!(
                "{} {} opened in #{}: {} (candidacy until {})",
                "->".yellow(),
                election.to_string().bold(),
                channel,
                reason,
                format_time(*ends_candidacy_at)
            ),
            GovernanceEvent::CandidateRegistered {
                election,
                candidate,
            } => format!(
                "  {} {} runs in {}",
                "*".dimmed(),
                candidate.name,
                election
            ),
            GovernanceEvent::ElectionVotingOpened {
                election,
                candidates,
                ends_at,
            } => {
                let names: Vec<String> = candidates
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("[{}] {}", i + 1, c.name))
                    .collect();
                format!(
                    "{} {} voting open until {}: {}",
                    "->".yellow(),
                    election.to_string().bold(),
                    format_time(*ends_at),
                    names.join(", ")
                )
            }
            GovernanceEvent::BallotCast {
                election,
                author,
                status,
            } => {
                let verb = match status {
                    CastVoteStatus::Changed => "changed their ballot",
                    _ => "voted",
                };
                format!("  {} {} {} in {}", "*".dimmed(), author, verb, election)
            }
            GovernanceEvent::ElectionFinished { election, results } => match results {
                Some(results) => {
                    let winners: Vec<&str> =
                        results.winners().iter().map(|c| c.name.as_str()).collect();
                    let outcome = match winners.len() {
                        0 => "no winner".to_string(),
                        1 => format!("won by {}", winners[0]),
                        _ => format!("tie between {}", winners.join(", ")),
                    };
                    format!(
                        "{} {} finished, {}",
                        "<-".yellow(),
                        election.to_string().bold(),
                        outcome.green()
                    )
                }
                None => format!(
                    "{} {} {}",
                    "<-".yellow(),
                    election.to_string().bold(),
                    "cancelled".red()
                ),
            },
        }
    }
}

impl GovernanceNotifier for ConsoleNotifier {
    fn notify(&self, event: &GovernanceEvent) {
        println!("{}", Self::render(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votum_domain::{
        Candidate, CouncilId, ElectionId, ElectionResults, Majority, MemberId, Tally, VoteState,
    };

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_motion_proposed() {
        plain();
        let line = ConsoleNotifier::render(&GovernanceEvent::MotionProposed {
            council: CouncilId::from("general"),
            motion: 1,
            author: MemberId::from("1"),
            author_name: "Alice".to_string(),
            text: "Adopt the charter".to_string(),
            majority: Majority::UNANIMOUS,
        });
        assert_eq!(line, "-> general #1 by Alice (Unanimous): Adopt the charter");
    }

    #[test]
    fn test_render_vote_cast() {
        plain();
        let line = ConsoleNotifier::render(&GovernanceEvent::VoteCast {
            council: CouncilId::from("general"),
            motion: 2,
            author: MemberId::from("2"),
            author_name: "Bob".to_string(),
            state: VoteState::Against,
            status: CastVoteStatus::Changed,
            tally: Tally {
                no: 1.0,
                to_pass: 2.0,
                ..Tally::default()
            },
        });
        assert_eq!(line, "  * Bob changed to Against on #2  [0 / 1 / 0, 2 to pass]");
    }

    #[test]
    fn test_render_cancelled_election() {
        plain();
        let line = ConsoleNotifier::render(&GovernanceEvent::ElectionFinished {
            election: ElectionId::from("election-3"),
            results: None,
        });
        assert_eq!(line, "<- election-3 cancelled");
    }

    #[test]
    fn test_render_election_without_ballots() {
        plain();
        let mut election =
            votum_domain::Election::new(ElectionId::from("election-1"), "Chair", "elections", 0);
        election
            .add_candidate(Candidate::new("1", "Alice", ""))
            .unwrap();
        election.start_voting(0);
        let results: ElectionResults = election.announce_results().unwrap();

        let line = ConsoleNotifier::render(&GovernanceEvent::ElectionFinished {
            election: ElectionId::from("election-1"),
            results: Some(results),
        });
        assert_eq!(line, "<- election-1 finished, no winner");
    }
}
