use super::value_parsers::{apply_value_list, parse_yes_no, require_values, single_value};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::nvlists::{
    FAILURE_LOG_OPTIONS, SERVICE_FLAGS, SERVICE_TYPES, SOCKET_TYPES, SUCCESS_LOG_OPTIONS,
    find_value, service_flags,
};
use crate::service_config::ServiceConfig;

pub fn type_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    require_values(tokens, "type")?;
    apply_value_list(tokens, &mut record.service_type, SERVICE_TYPES, op, "service type")
}

pub fn flags_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    require_values(tokens, "flags")?;
    // DISABLE shares the mask but belongs to the `disable` attribute
    let disabled = record.is_disabled();
    apply_value_list(tokens, &mut record.flags, SERVICE_FLAGS, op, "service flag")?;
    if disabled {
        record.flags.set(service_flags::DISABLE);
    }
    Ok(())
}

// an empty list is fine here, `log_on_success =` switches all logging off
pub fn log_on_success_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    apply_value_list(
        tokens,
        &mut record.log_on_success,
        SUCCESS_LOG_OPTIONS,
        op,
        "log_on_success flag",
    )
}

pub fn log_on_failure_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    apply_value_list(
        tokens,
        &mut record.log_on_failure,
        FAILURE_LOG_OPTIONS,
        op,
        "log_on_failure flag",
    )
}

pub fn socket_type_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let name = single_value(tokens, "socket_type")?;
    let socket_type = find_value(SOCKET_TYPES, name).ok_or_else(|| {
        ParsingErrorReason::UnknownValue("socket type".to_owned(), name.to_owned())
    })?;
    record.socket_type = Some(socket_type);
    Ok(())
}

pub fn wait_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.wait = Some(parse_yes_no(tokens, "wait")?);
    Ok(())
}

/// `disable = yes` marks the service as disabled, `no` clears the mark.
pub fn svcdisable_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    if parse_yes_no(tokens, "disable")? {
        record.flags.set(service_flags::DISABLE);
    } else {
        record.flags.clear(service_flags::DISABLE);
    }
    Ok(())
}

pub fn groups_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.groups = Some(parse_yes_no(tokens, "groups")?);
    Ok(())
}

pub fn v6only_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.v6only = Some(parse_yes_no(tokens, "v6only")?);
    Ok(())
}
