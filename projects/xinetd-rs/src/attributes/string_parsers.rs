use super::value_parsers::{owned_string, single_value};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::service_config::ServiceConfig;

fn string_value(tokens: &[&str], attribute: &str) -> Result<String, ParsingErrorReason> {
    owned_string(single_value(tokens, attribute)?, attribute)
}

/// Unique identifier of the service, defaults to its name.
pub fn id_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.id = Some(string_value(tokens, "id")?);
    Ok(())
}

pub fn banner_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.banner = Some(string_value(tokens, "banner")?);
    Ok(())
}

pub fn banner_success_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.banner_success = Some(string_value(tokens, "banner_success")?);
    Ok(())
}

pub fn banner_fail_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    record.banner_fail = Some(string_value(tokens, "banner_fail")?);
    Ok(())
}
