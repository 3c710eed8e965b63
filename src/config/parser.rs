use std::time::Duration;

use tracing::warn;

use super::*;
use crate::error::NavError;

/// Parse a config file
///
/// Lines that cannot be parsed are reported and skipped, so a typo never
/// costs the rest of the file.
pub fn parse_config(content: &str) -> NavResult<Config> {
    let mut config = Config::default();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Err(e) = parse_line(&mut config, line) {
            warn!("Skipping config line {} '{}': {}", line_num + 1, line, e);
        }
    }

    Ok(config)
}

fn parse_line(config: &mut Config, line: &str) -> NavResult<()> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let (first_part, rest) = parts.split_first().ok_or_else(|| invalid("Empty line"))?;

    if *first_part == "set" {
        return parse_set(config, rest);
    }

    let value = config.expand_variables(&rest.join(" "));
    if value.is_empty() {
        return Err(invalid(format!("{first_part} requires a value")));
    }

    match *first_part {
        "motion_threshold" => config.motion_threshold = parse_non_negative(&value)?,
        "padding" => config.padding = parse_non_negative(&value)?,
        "zoom_factor" => {
            let factor = parse_number(&value)?;
            if !ZOOM_FACTOR_RANGE.contains(&factor) {
                return Err(invalid(format!(
                    "zoom_factor {factor} outside {}..={}",
                    ZOOM_FACTOR_RANGE.start(),
                    ZOOM_FACTOR_RANGE.end()
                )));
            }
            config.zoom_factor = factor;
        }
        "memory" => {
            config.memory =
                parse_bool(&value).ok_or_else(|| invalid(format!("Not a boolean: {value}")))?
        }
        "boundary" => config.boundary = value.parse()?,
        "animation_time" => config.animation_time = parse_millis(&value)?,
        "settle_delay" => config.settle_delay = parse_millis(&value)?,
        other => return Err(invalid(format!("Unknown option: {other}"))),
    }

    Ok(())
}

fn parse_set(config: &mut Config, parts: &[&str]) -> NavResult<()> {
    if parts.len() < 2 {
        return Err(invalid("set requires variable name and value"));
    }

    let var_name = parts[0];
    let value = parts[1..].join(" ");

    // Remove leading $ from variable name if present
    let var_name = var_name.strip_prefix('$').unwrap_or(var_name);

    // Expand any variables in the value
    let expanded_value = config.expand_variables(&value);
    config
        .variables
        .insert(var_name.to_string(), expanded_value);

    Ok(())
}

/// Parse an i3/sway style boolean
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "yes" | "true" | "on" | "1" | "enabled" => Some(true),
        "no" | "false" | "off" | "0" | "disabled" => Some(false),
        _ => None,
    }
}

fn parse_number(value: &str) -> NavResult<f64> {
    let number: f64 = value
        .parse()
        .map_err(|_| invalid(format!("Not a number: {value}")))?;
    if !number.is_finite() {
        return Err(invalid(format!("Not a finite number: {value}")));
    }
    Ok(number)
}

fn parse_non_negative(value: &str) -> NavResult<f64> {
    let number = parse_number(value)?;
    if number < 0.0 {
        return Err(invalid(format!("Negative value: {value}")));
    }
    Ok(number)
}

/// Parse milliseconds, with or without an `ms` suffix
fn parse_millis(value: &str) -> NavResult<Duration> {
    let digits = value.strip_suffix("ms").unwrap_or(value).trim();
    let millis: u64 = digits
        .parse()
        .map_err(|_| invalid(format!("Not a duration in milliseconds: {value}")))?;
    Ok(Duration::from_millis(millis))
}

fn invalid(message: impl Into<String>) -> NavError {
    NavError::Config(message.into())
}
