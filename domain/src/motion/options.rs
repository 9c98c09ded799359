//! Motion option parsing
//!
//! Options precede the motion text and parsing stops at the first token
//! that is not an option:
//!
//! ```text
//! -u | --unanimous              require unanimity
//! -m <m> | --majority <m>       require majority <m> ("66%", "2/3", "0.75")
//! --majority=<m>
//! --                            end of options
//! ```

use super::majority::Majority;
use crate::core::error::ValidationError;

/// Options attached to a motion at creation time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionOptions {
    pub majority: Option<Majority>,
}

/// Split leading options from the motion text
///
/// `--unanimous` wins over any `--majority` given alongside it.
pub fn parse_motion_input(input: &str) -> Result<(String, MotionOptions), ValidationError> {
    let mut options = MotionOptions::default();
    let mut unanimous = false;
    let mut rest = input;

    loop {
        let (token, tail) = next_token(rest);
        if !is_option(token) {
            break;
        }
        rest = tail;

        match token {
            "--" => break,
            "-u" | "--unanimous" => unanimous = true,
            "-m" | "--majority" => {
                let (value, tail) = next_token(rest);
                if value.is_empty() {
                    return Err(ValidationError::MissingOptionValue(token.to_string()));
                }
                options.majority = Some(value.parse()?);
                rest = tail;
            }
            t if t.starts_with("--majority=") => {
                let value = &t["--majority=".len()..];
                if value.is_empty() {
                    return Err(ValidationError::MissingOptionValue("--majority".to_string()));
                }
                options.majority = Some(value.parse()?);
            }
            other => return Err(ValidationError::UnknownOption(other.to_string())),
        }
    }

    if unanimous {
        options.majority = Some(Majority::UNANIMOUS);
    }

    Ok((rest.trim().to_string(), options))
}

fn is_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// First whitespace-delimited token and the untouched remainder
fn next_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}
