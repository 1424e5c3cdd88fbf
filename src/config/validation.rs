//! Configuration validation.
//!
//! Rejects values that would make the scheduler misbehave (zero-length poll
//! intervals, offsets larger than a day's worth of switching, an empty
//! command) with a message naming the offending key.

use anyhow::Result;

use super::{ApplierKind, Config, ThemePairConfig};
use crate::common::constants::*;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.poll_interval
        && !(MINIMUM_POLL_INTERVAL..=MAXIMUM_POLL_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "poll_interval ({} minutes) must be between {} and {} minutes",
            interval,
            MINIMUM_POLL_INTERVAL,
            MAXIMUM_POLL_INTERVAL
        );
    }

    if let Some(offset) = config.transition_offset
        && !(MINIMUM_TRANSITION_OFFSET..=MAXIMUM_TRANSITION_OFFSET).contains(&offset)
    {
        anyhow::bail!(
            "transition_offset ({} minutes) must be between {} and {} minutes",
            offset,
            MINIMUM_TRANSITION_OFFSET,
            MAXIMUM_TRANSITION_OFFSET
        );
    }

    if let Some(timeout) = config.request_timeout
        && !(MINIMUM_REQUEST_TIMEOUT..=MAXIMUM_REQUEST_TIMEOUT).contains(&timeout)
    {
        anyhow::bail!(
            "request_timeout ({} seconds) must be between {} and {} seconds",
            timeout,
            MINIMUM_REQUEST_TIMEOUT,
            MAXIMUM_REQUEST_TIMEOUT
        );
    }

    if let Some(key) = &config.settings_key
        && key.split('.').any(|segment| segment.trim().is_empty())
    {
        anyhow::bail!("settings_key (\"{key}\") must be a dotted path like \"core.themes\"");
    }

    if config.applier() == ApplierKind::Command {
        let has_program = config
            .command
            .as_ref()
            .and_then(|c| c.first())
            .is_some_and(|program| !program.trim().is_empty());
        if !has_program {
            anyhow::bail!("applier = \"command\" requires a non-empty command list");
        }
    }

    validate_pair(config.day.as_ref(), "day")?;
    validate_pair(config.night.as_ref(), "night")?;

    Ok(())
}

/// Theme names may be omitted but not left blank.
fn validate_pair(pair: Option<&ThemePairConfig>, table: &str) -> Result<()> {
    let Some(pair) = pair else {
        return Ok(());
    };
    for (field, value) in [("ui", &pair.ui), ("syntax", &pair.syntax)] {
        if let Some(name) = value
            && name.trim().is_empty()
        {
            anyhow::bail!("[{table}] {field} must not be empty");
        }
    }
    Ok(())
}
