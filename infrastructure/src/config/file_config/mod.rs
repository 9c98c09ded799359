//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod council;
mod election;
mod log;

pub use council::FileCouncilConfig;
pub use election::FileElectionConfig;
pub use log::FileLogConfig;

use serde::{Deserialize, Serialize};
use votum_domain::{ConfigIssue, ConfigIssueCode, Council, Member};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Primary council, the target of steps that name none
    pub council: FileCouncilConfig,
    /// Further councils, e.g. targets of forward finish actions
    pub councils: Vec<FileCouncilConfig>,
    /// Members shared by every council
    pub roster: Vec<Member>,
    pub election: FileElectionConfig,
    pub log: FileLogConfig,
}

impl FileConfig {
    /// All configured councils, primary first
    pub fn all_councils(&self) -> impl Iterator<Item = &FileCouncilConfig> {
        std::iter::once(&self.council).chain(&self.councils)
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Covers unparsable majorities and durations, negative weights,
    /// forwards to the same council, defaults below the minimum majority,
    /// dictator roles nobody holds and unknown forward targets.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for council in self.all_councils() {
            let (config, conversion) = council.to_council_config();
            issues.extend(conversion);
            issues.extend(config.validate(&self.roster));

            for action in config.finish_actions.all() {
                if !self.all_councils().any(|c| c.id == action.to) {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::UnknownForwardTarget,
                        format!(
                            "councils.{}.finish_actions: unknown target council `{}`",
                            council.id, action.to
                        ),
                    ));
                }
            }
        }

        issues.extend(self.election.to_defaults().1);
        issues
    }

    /// Build every configured council with the shared roster
    ///
    /// Invalid entries fall back to defaults; see [`FileConfig::validate`].
    pub fn build_councils(&self) -> Vec<Council> {
        self.all_councils()
            .map(|file| {
                let (config, _) = file.to_council_config();
                Council::new(file.id.as_str(), file.name.clone(), config)
                    .with_roster(self.roster.clone())
            })
            .collect()
    }
}
