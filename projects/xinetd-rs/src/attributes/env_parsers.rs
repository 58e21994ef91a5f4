use log::{trace, warn};

use super::value_parsers::push_owned;
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::service_config::ServiceConfig;

/// `env = NAME=value ...`: variables defined for the server.
pub fn env_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let mut defs = match op {
        AssignOp::Remove => {
            return Err(ParsingErrorReason::UnsupportedOperator("env".to_owned(), op));
        }
        AssignOp::Set => Vec::new(),
        AssignOp::Add => record.env_var_defs.clone().unwrap_or_default(),
    };

    for token in tokens {
        if !token.contains('=') {
            return Err(ParsingErrorReason::InvalidValue(
                "environment definition without '='".to_owned(),
                (*token).to_owned(),
            ));
        }
        push_owned(&mut defs, token, "env")?;
    }

    record.env_var_defs = Some(defs);
    Ok(())
}

/// `passenv = NAME ...`: variables of the daemon's own environment that are
/// handed to the server. Names that are not defined there are skipped.
pub fn passenv_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let (mut vars, op) = match op {
        AssignOp::Set => (Vec::new(), AssignOp::Add),
        _ => (record.pass_env_vars.clone().unwrap_or_default(), op),
    };

    for name in tokens {
        let position = vars.iter().position(|v| v == name);
        match (op, position) {
            (AssignOp::Remove, Some(idx)) => {
                vars.remove(idx);
            }
            (AssignOp::Remove, None) | (_, Some(_)) => {
                trace!("passenv: nothing to do for {name}");
            }
            (_, None) => {
                if !ctx.environment.contains_key(*name) {
                    warn!(
                        "Service {}: undefined environment variable: {name}",
                        record.name
                    );
                    continue;
                }
                push_owned(&mut vars, name, "passenv")?;
            }
        }
    }

    record.pass_env_vars = Some(vars);
    Ok(())
}
