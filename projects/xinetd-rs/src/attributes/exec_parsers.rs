//! `user`, `group`, `server` and `server_args`: who runs what.

use std::path::PathBuf;

use log::debug;

use super::value_parsers::{owned_string, single_value};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::service_config::{ServerArgv, ServiceConfig};

pub fn user_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let name = single_value(tokens, "user")?;
    let user = ctx
        .resolver
        .user_by_name(name)
        .map_err(|e| ParsingErrorReason::LookupFailed(format!("Unknown user: {name} ({e})")))?;
    record.uid = Some(user.uid);
    record.user_gid = Some(user.gid);
    Ok(())
}

pub fn group_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let name = single_value(tokens, "group")?;
    let gid = ctx
        .resolver
        .group_by_name(name)
        .map_err(|e| ParsingErrorReason::LookupFailed(format!("Unknown group: {name} ({e})")))?;
    record.gid = Some(gid);
    Ok(())
}

/// The server has to be executable for the real user id and must stat.
pub fn server_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let server = single_value(tokens, "server")?;
    let path = PathBuf::from(owned_string(server, "server")?);
    if !ctx.resolver.is_executable(&path) {
        return Err(ParsingErrorReason::LookupFailed(format!(
            "Server {server} is not executable"
        )));
    }
    ctx.resolver
        .stat(&path)
        .map_err(ParsingErrorReason::LookupFailed)?;
    record.server = Some(path);
    Ok(())
}

/// Build the argv for the later `execve`.
///
/// The vector has room for every token plus the program name and the
/// terminator. Without `NAMEINARGS` slot 0 stays empty so the spawner can put
/// the server path there; with it the first token is the program name.
pub fn server_args_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    if tokens.is_empty() {
        return Err(ParsingErrorReason::MissingValue("server_args".to_owned()));
    }

    let mut slots: Vec<Option<String>> = Vec::new();
    slots
        .try_reserve_exact(tokens.len() + 2)
        .map_err(|_| ParsingErrorReason::OutOfMemory("server_args".to_owned()))?;
    if !record.name_in_args() {
        slots.push(None);
    }
    for token in tokens {
        slots.push(Some(owned_string(token, "server_args")?));
    }
    slots.resize(tokens.len() + 2, None);

    debug!(
        "Service {}: server_args with {} argument(s), name in args: {}",
        record.name,
        tokens.len(),
        record.name_in_args()
    );
    record.server_argv = Some(ServerArgv { slots });
    Ok(())
}
