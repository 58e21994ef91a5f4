//! Numeric limits: instance counts, the connection rate limiter, `nice`,
//! `umask`, the resource limits and the load gate.

use super::value_parsers::{parse_base10, parse_int, parse_limit, parse_unsigned, single_value, wrong_count};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::service_config::{ConnectionRate, DenyTime, InstanceLimit, RLimitValue, ServiceConfig};

const UNLIMITED: &str = "UNLIMITED";

fn parse_instance_limit(text: &str, what: &str) -> Result<InstanceLimit, ParsingErrorReason> {
    if text == UNLIMITED {
        return Ok(InstanceLimit::Unlimited);
    }
    parse_unsigned(text)
        .map(InstanceLimit::Count)
        .ok_or_else(|| ParsingErrorReason::InvalidValue(what.to_owned(), text.to_owned()))
}

pub fn instances_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "instances")?;
    record.instances = Some(parse_instance_limit(text, "Number of instances")?);
    Ok(())
}

pub fn per_source_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "per_source")?;
    record.per_source = Some(parse_instance_limit(
        text,
        "Number of per source instances",
    )?);
    Ok(())
}

/// `cps = <connections per second> <seconds to wait>`
///
/// A value that does not parse or is negative resets the limiter to zero
/// before the failure is reported.
pub fn cps_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let [conn_max, wait] = tokens else {
        return Err(wrong_count("cps", "2", tokens));
    };

    let parsed = parse_base10(conn_max)
        .zip(parse_base10(wait))
        .and_then(|(c, w)| Some((u32::try_from(c).ok()?, u32::try_from(w).ok()?)));
    match parsed {
        Some((max_connections, wait_secs)) => {
            record.connection_rate = ConnectionRate {
                max_connections,
                wait_secs,
            };
            Ok(())
        }
        None => {
            record.connection_rate = ConnectionRate::default();
            Err(ParsingErrorReason::InvalidValue(
                "cps arguments".to_owned(),
                format!("{conn_max} {wait}"),
            ))
        }
    }
}

pub fn nice_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "nice")?;
    let nice = parse_base10(text)
        .ok_or_else(|| ParsingErrorReason::InvalidValue("nice value".to_owned(), text.to_owned()))?;
    record.nice = Some(nice);
    Ok(())
}

pub fn umask_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "umask")?;
    let umask = parse_int(text, 8)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v <= 0o777)
        .ok_or_else(|| ParsingErrorReason::InvalidValue("umask argument".to_owned(), text.to_owned()))?;
    record.umask = Some(umask);
    Ok(())
}

/// Shared by the byte sized limits. A bad value leaves the limit at zero.
fn size_limit(
    tokens: &[&str],
    attribute: &str,
    what: &str,
    limit: &mut Option<RLimitValue>,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, attribute)?;
    if text == UNLIMITED {
        *limit = Some(RLimitValue::Infinity);
        return Ok(());
    }
    match parse_limit(text) {
        Some(value) => {
            *limit = Some(RLimitValue::Value(value));
            Ok(())
        }
        None => {
            *limit = Some(RLimitValue::Value(0));
            Err(ParsingErrorReason::InvalidValue(what.to_owned(), text.to_owned()))
        }
    }
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "dragonfly"
))]
pub fn rlim_as_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    size_limit(tokens, "rlimit_as", "Address space limit", &mut record.rlim_as)
}

/// CPU time in seconds, no size suffixes.
pub fn rlim_cpu_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "rlimit_cpu")?;
    if text == UNLIMITED {
        record.rlim_cpu = Some(RLimitValue::Infinity);
        return Ok(());
    }
    let secs = parse_unsigned(text)
        .ok_or_else(|| ParsingErrorReason::InvalidValue("CPU limit".to_owned(), text.to_owned()))?;
    record.rlim_cpu = Some(RLimitValue::Value(u64::from(secs)));
    Ok(())
}

pub fn rlim_data_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    size_limit(tokens, "rlimit_data", "Data limit", &mut record.rlim_data)
}

#[cfg(not(target_os = "solaris"))]
pub fn rlim_rss_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    size_limit(tokens, "rlimit_rss", "RSS limit", &mut record.rlim_rss)
}

pub fn rlim_stack_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    size_limit(tokens, "rlimit_stack", "Stack limit", &mut record.rlim_stack)
}

/// `FOREVER`, `NEVER` or a number of minutes. `0` is the same as `NEVER`.
pub fn deny_time_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "deny_time")?;
    let deny_time = match text {
        "FOREVER" => DenyTime::Forever,
        "NEVER" => DenyTime::Never,
        _ => match parse_unsigned(text) {
            Some(0) => DenyTime::Never,
            Some(minutes) => DenyTime::Minutes(minutes),
            None => {
                return Err(ParsingErrorReason::InvalidValue(
                    "deny_time".to_owned(),
                    text.to_owned(),
                ));
            }
        },
    };
    record.deny_time = Some(deny_time);
    Ok(())
}

/// The one-minute load average above which connections are refused.
#[cfg(feature = "loadavg")]
pub fn max_load_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "max_load")?;
    let load = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|l| l.is_finite() && *l > 0.0)
        .ok_or_else(|| ParsingErrorReason::InvalidValue("max_load argument".to_owned(), text.to_owned()))?;
    record.max_load = Some(load);
    Ok(())
}
