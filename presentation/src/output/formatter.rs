//! Output formatter trait and the JSON formatter

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use votum_domain::{Council, Election, ElectionResults, Timestamp};

/// Trait for rendering final council and election state
pub trait OutputFormatter {
    /// Format a council with its motions and statistics
    fn format_council(&self, council: &Council, now: Timestamp) -> String;

    /// Format an election that has not finished
    fn format_election(&self, election: &Election) -> String;

    /// Format the ranking of a finished election
    fn format_results(&self, results: &ElectionResults) -> String;
}

/// Pick the formatter for an output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Formats state as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_council(&self, council: &Council, now: Timestamp) -> String {
        let expiration = council.config().motion_expiration;
        let weights = council.weights();
        let motions: Vec<_> = council
            .motions()
            .iter()
            .map(|motion| {
                serde_json::json!({
                    "motion": motion,
                    "tally": motion.tally(&weights),
                    "expired": motion.is_expired(now, expiration),
                })
            })
            .collect();

        let value = serde_json::json!({
            "id": council.id(),
            "name": council.name(),
            "weights": weights,
            "motions": motions,
            "stats": council.stats(),
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_election(&self, election: &Election) -> String {
        serde_json::to_string_pretty(election).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_results(&self, results: &ElectionResults) -> String {
        serde_json::to_string_pretty(results).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votum_domain::{CouncilConfig, Member};

    #[test]
    fn test_json_council_includes_motion_tally() {
        let mut council = Council::new("general", "General", CouncilConfig::default())
            .with_roster(vec![Member::new("1", "Alice"), Member::new("2", "Bob")]);
        council.propose(&"1".into(), "Adopt the charter", 0).unwrap();

        let json = JsonFormatter.format_council(&council, 0);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["id"], "general");
        assert_eq!(value["motions"][0]["motion"]["text"], "Adopt the charter");
        assert_eq!(value["motions"][0]["tally"]["to_pass"], 2.0);
        assert_eq!(value["motions"][0]["expired"], false);
        assert_eq!(value["stats"]["total_motions"], 1);
    }
}
