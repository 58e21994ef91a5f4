//! Access control lists: addresses, access times and the service lists of
//! the defaults block.

use super::value_parsers::{push_owned, require_values};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::addrlist::AddressList;
use crate::service_config::ServiceConfig;
use crate::timex::TimeInterval;

/// `=` starts from an empty list, then every token is added (`=`, `+=`) or
/// removed (`-=`). The list is only replaced once every token was accepted.
fn parse_inet_addresses(
    tokens: &[&str],
    op: AssignOp,
    list: &mut Option<AddressList>,
) -> Result<(), ParsingErrorReason> {
    let mut updated = match op {
        AssignOp::Set => AddressList::new(),
        AssignOp::Add | AssignOp::Remove => list.clone().unwrap_or_default(),
    };
    for token in tokens {
        let res = match op {
            AssignOp::Set | AssignOp::Add => updated.add(token),
            AssignOp::Remove => updated.remove(token),
        };
        res.map_err(|e| ParsingErrorReason::InvalidValue(format!("address {token}"), e))?;
    }
    *list = Some(updated);
    Ok(())
}

pub fn only_from_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    parse_inet_addresses(tokens, op, &mut record.only_from)
}

pub fn no_access_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    parse_inet_addresses(tokens, op, &mut record.no_access)
}

pub fn access_times_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    require_values(tokens, "access_times")?;

    let mut intervals = match op {
        AssignOp::Set => Vec::new(),
        AssignOp::Add | AssignOp::Remove => record.access_times.clone().unwrap_or_default(),
    };
    for token in tokens {
        let interval = TimeInterval::parse(token)
            .map_err(|e| ParsingErrorReason::InvalidValue("access time".to_owned(), e))?;
        match op {
            AssignOp::Set | AssignOp::Add => {
                intervals
                    .try_reserve(1)
                    .map_err(|_| ParsingErrorReason::OutOfMemory("access_times".to_owned()))?;
                intervals.push(interval);
            }
            AssignOp::Remove => intervals.retain(|i| *i != interval),
        }
    }
    record.access_times = Some(intervals);
    Ok(())
}

/// Service names are taken as they are. Whether they name real services is
/// only known once every block is read.
fn parse_service_names(
    tokens: &[&str],
    op: AssignOp,
    attribute: &str,
    names: &mut Option<Vec<String>>,
) -> Result<(), ParsingErrorReason> {
    let mut updated = match op {
        AssignOp::Set => Vec::new(),
        AssignOp::Add | AssignOp::Remove => names.clone().unwrap_or_default(),
    };
    for token in tokens {
        match op {
            AssignOp::Set | AssignOp::Add => push_owned(&mut updated, token, attribute)?,
            AssignOp::Remove => updated.retain(|n| n != token),
        }
    }
    *names = Some(updated);
    Ok(())
}

pub fn disabled_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    parse_service_names(tokens, op, "disabled", &mut record.disabled_services)
}

pub fn enabled_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    parse_service_names(tokens, op, "enabled", &mut record.enabled_services)
}
