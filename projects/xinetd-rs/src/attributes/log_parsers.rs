//! `log_type = FILE <path> [soft [hard]]` or `log_type = SYSLOG <facility> [level]`.

use std::path::PathBuf;

use super::value_parsers::{owned_string, parse_limit, wrong_count};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::config::ParserSettings;
use crate::nvlists::{SYSLOG_FACILITIES, SYSLOG_LEVELS, find_value};
use crate::service_config::{FileLog, LogDestination, ServiceConfig, SyslogLog};

pub fn log_type_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let Some(kind) = tokens.first() else {
        return Err(ParsingErrorReason::MissingValue("log_type".to_owned()));
    };
    let destination = match *kind {
        "FILE" => LogDestination::File(parse_filelog(tokens, &ctx.settings)?),
        "SYSLOG" => LogDestination::Syslog(parse_syslog(tokens, &ctx.settings)?),
        other => {
            return Err(ParsingErrorReason::UnknownValue(
                "log type".to_owned(),
                other.to_owned(),
            ));
        }
    };
    record.log = destination;
    Ok(())
}

/// Slack between the soft and the derived hard limit: 1% of the soft limit,
/// kept within the configured bounds.
fn derived_hard_limit(soft: u64, settings: &ParserSettings) -> u64 {
    let extra = soft / 100;
    let extra = if extra < settings.log_extra_min {
        settings.log_extra_min
    } else if extra > settings.log_extra_max {
        settings.log_extra_max
    } else {
        extra
    };
    soft.saturating_add(extra)
}

fn parse_filelog(tokens: &[&str], settings: &ParserSettings) -> Result<FileLog, ParsingErrorReason> {
    if !(2..=4).contains(&tokens.len()) {
        return Err(wrong_count("log_type FILE", "2 to 4", tokens));
    }
    let filename = PathBuf::from(owned_string(tokens[1], "log_type")?);

    let limits = match tokens[2..] {
        [] => None,
        [soft] => {
            let soft = parse_limit(soft).ok_or_else(|| {
                ParsingErrorReason::InvalidValue("soft limit".to_owned(), soft.to_owned())
            })?;
            Some((soft, derived_hard_limit(soft, settings)))
        }
        [soft_text, hard_text] => {
            let soft = parse_limit(soft_text).ok_or_else(|| {
                ParsingErrorReason::InvalidValue("soft limit".to_owned(), soft_text.to_owned())
            })?;
            let hard = parse_limit(hard_text).ok_or_else(|| {
                ParsingErrorReason::InvalidValue("hard limit".to_owned(), hard_text.to_owned())
            })?;
            if hard < soft {
                return Err(ParsingErrorReason::InvalidValue(
                    "hard limit".to_owned(),
                    format!("{hard} is less than soft limit {soft}"),
                ));
            }
            Some((soft, hard))
        }
        _ => return Err(wrong_count("log_type FILE", "2 to 4", tokens)),
    };

    Ok(FileLog { filename, limits })
}

fn parse_syslog(tokens: &[&str], settings: &ParserSettings) -> Result<SyslogLog, ParsingErrorReason> {
    let (facility, level) = match tokens {
        [_, facility] => (*facility, None),
        [_, facility, level] => (*facility, Some(*level)),
        _ => return Err(wrong_count("log_type SYSLOG", "2 or 3", tokens)),
    };

    let facility = find_value(SYSLOG_FACILITIES, facility).ok_or_else(|| {
        ParsingErrorReason::UnknownValue("syslog facility".to_owned(), facility.to_owned())
    })?;
    let level = match level {
        Some(name) => find_value(SYSLOG_LEVELS, name).ok_or_else(|| {
            ParsingErrorReason::UnknownValue("syslog level".to_owned(), name.to_owned())
        })?,
        None => settings.default_syslog_level(),
    };

    Ok(SyslogLog { facility, level })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_limit_slack_is_clamped() {
        let settings = ParserSettings::default();
        // 1% of 100 is below the minimum slack
        assert_eq!(derived_hard_limit(100, &settings), 100 + 5 * 1024);
        // 1% of 1 MiB sits between the bounds
        assert_eq!(derived_hard_limit(1024 * 1024, &settings), 1024 * 1024 + 10485);
        // 1% of 100 MiB is above the maximum slack
        assert_eq!(
            derived_hard_limit(100 * 1024 * 1024, &settings),
            100 * 1024 * 1024 + 20 * 1024
        );
    }
}
