//! Human-readable labels for majorities and vote progress

use votum_domain::{Majority, Motion, Tally};

/// Display name of a required majority
///
/// `1` is "Unanimous", `0.5` is "Simple majority", anything else is shown
/// as the closest simple fraction.
pub fn majority_label(majority: Majority) -> String {
    if majority.is_unanimous() {
        return "Unanimous".to_string();
    }
    if majority.approx_eq(0.5) {
        return "Simple majority".to_string();
    }
    let (num, den) = closest_fraction(majority.value(), 100);
    format!("{}/{}", num, den)
}

/// Closest fraction to `value` with a denominator of at most `max_den`
///
/// The smallest denominator wins among equally close fractions.
pub fn closest_fraction(value: f64, max_den: u32) -> (u32, u32) {
    let mut best = (value.round().max(0.0) as u32, 1);
    let mut best_error = (value - best.0 as f64).abs();

    for den in 2..=max_den {
        let num = (value * den as f64).round().max(0.0) as u32;
        let error = (value - num as f64 / den as f64).abs();
        if error + f64::EPSILON < best_error {
            best = (num, den);
            best_error = error;
        }
    }

    best
}

/// Progress line shown under a motion
///
/// `expired` is whether the motion's window has elapsed at display time.
pub fn vote_hint(motion: &Motion, tally: &Tally, expired: bool) -> String {
    if !motion.is_active() {
        let mut hint = "Final results.".to_string();
        if motion.required_majority().is_unanimous() {
            hint.push_str(" (Unanimous vote required)");
        }
        if motion.did_expire() {
            hint.push_str(" (Motion expired)");
        }
        if tally.dictator_voted {
            hint.push_str(" (A dictator ended the vote immediately)");
        }
        return hint;
    }

    if tally.yes == tally.no && expired {
        return "This motion has expired, but the result is a tie. The next vote will resolve it."
            .to_string();
    }
    if tally.yes == 0.0 && tally.no == 0.0 {
        return format!(
            "This motion needs {} to pass or fail.",
            votes(tally.to_pass)
        );
    }
    if (tally.yes >= tally.no && tally.yes >= tally.to_pass)
        || (tally.no >= tally.yes && tally.no >= tally.to_pass)
    {
        return "This motion has reached the required majority, but is held until everyone has voted."
            .to_string();
    }
    if tally.yes >= tally.no {
        format!(
            "With {} in favor, this motion will pass.",
            more_votes(tally.to_pass - tally.yes)
        )
    } else {
        format!(
            "With {} against, this motion will fail.",
            more_votes(tally.to_pass - tally.no)
        )
    }
}

fn votes(count: f64) -> String {
    if count == 1.0 {
        "1 vote".to_string()
    } else {
        format!("{} votes", count)
    }
}

fn more_votes(count: f64) -> String {
    if count == 1.0 {
        "1 more vote".to_string()
    } else {
        format!("{} more votes", count)
    }
}
