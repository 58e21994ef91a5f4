//! Protocol, ports, RPC data and the `redirect`/`bind` addresses.

use std::net::Ipv4Addr;

use log::debug;

use super::value_parsers::{owned_string, parse_base10, single_value, wrong_count};
use super::{AssignOp, ParseContext, ParsingErrorReason};
use crate::platform::{AddressFamily, AddressHint};
use crate::service_config::{BindAddress, Protocol, ServiceConfig};

const PORT_MAX: i32 = 1 << 16;

pub fn protocol_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let name = single_value(tokens, "protocol")?;
    let number = ctx.resolver.protocol_by_name(name).map_err(|e| {
        ParsingErrorReason::LookupFailed(format!("Protocol {name} not in /etc/protocols ({e})"))
    })?;
    record.protocol = Some(Protocol {
        name: owned_string(name, "protocol")?,
        number,
    });
    Ok(())
}

pub fn port_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "port")?;
    let port = parse_base10(text)
        .and_then(|p| u16::try_from(p).ok())
        .ok_or_else(|| ParsingErrorReason::InvalidValue("port number".to_owned(), text.to_owned()))?;
    record.port = Some(port);
    Ok(())
}

/// `N` or `N-M`.
///
/// A single version is stored as the empty range `N..N-1`, which tells the
/// daemon to ask the portmapper for the versions instead.
pub fn rpc_version_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "rpc_version")?;
    let bad_range =
        || ParsingErrorReason::InvalidValue("rpc version range".to_owned(), text.to_owned());

    let (min_version, max_version) = match text.split_once('-') {
        None => {
            let min = parse_base10(text).ok_or_else(bad_range)?;
            (min, min.checked_sub(1).ok_or_else(bad_range)?)
        }
        Some((min, max)) => {
            let min = parse_base10(min).ok_or_else(bad_range)?;
            let max = parse_base10(max).ok_or_else(bad_range)?;
            if min > max {
                return Err(bad_range());
            }
            (min, max)
        }
    };
    record.rpc.min_version = min_version;
    record.rpc.max_version = max_version;
    Ok(())
}

pub fn rpc_number_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    _ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "rpc_number")?;
    let number = parse_base10(text).ok_or_else(|| {
        ParsingErrorReason::InvalidValue("rpc program number".to_owned(), text.to_owned())
    })?;
    record.rpc.program_number = Some(number);
    Ok(())
}

/// `redirect = <host> <port or tcp service name>`
pub fn redir_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let [host, port_text] = tokens else {
        return Err(wrong_count("redirect", "2", tokens));
    };

    let port = match parse_base10(port_text).filter(|p| *p > 0) {
        Some(p) if p >= PORT_MAX => {
            return Err(ParsingErrorReason::InvalidValue(
                "redirect port number".to_owned(),
                (*port_text).to_owned(),
            ));
        }
        Some(p) => u16::try_from(p).map_err(|_| {
            ParsingErrorReason::InvalidValue("redirect port number".to_owned(), (*port_text).to_owned())
        })?,
        None => ctx.resolver.service_port(port_text, "tcp").map_err(|e| {
            ParsingErrorReason::LookupFailed(format!("redirect port {port_text} is invalid ({e})"))
        })?,
    };

    let hint = AddressHint {
        family: if host.contains(':') {
            AddressFamily::Inet6
        } else {
            AddressFamily::Inet
        },
        numeric_host: false,
    };
    let mut addr = ctx
        .resolver
        .resolve(host, hint)
        .map_err(|e| ParsingErrorReason::LookupFailed(format!("bad redirect address: {e}")))?
        .into_iter()
        .next()
        .ok_or_else(|| {
            ParsingErrorReason::LookupFailed(format!("no addresses returned for {host}"))
        })?;
    addr.set_port(port);

    debug!("Service {}: redirecting to {addr}", record.name);
    record.redirect = Some(addr);
    Ok(())
}

/// Bind to one local address.
///
/// Numeric addresses are resolved without asking DNS. When a name resolves
/// to more than one address the text is kept and the choice is made after
/// the whole service block has been read.
pub fn bind_parser(
    tokens: &[&str],
    record: &mut ServiceConfig,
    _op: AssignOp,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let text = single_value(tokens, "bind")?;

    let (host, hint) = if text.parse::<Ipv4Addr>().is_ok() {
        (
            text,
            AddressHint {
                family: AddressFamily::Inet,
                numeric_host: true,
            },
        )
    } else if text.contains(':') {
        let bare = text
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(text);
        (
            bare,
            AddressHint {
                family: AddressFamily::Inet6,
                numeric_host: true,
            },
        )
    } else {
        (
            text,
            AddressHint {
                family: AddressFamily::Unspecified,
                numeric_host: false,
            },
        )
    };

    let addrs = ctx
        .resolver
        .resolve(host, hint)
        .map_err(|e| ParsingErrorReason::LookupFailed(format!("bad bind address: {e}")))?;
    let bind = match addrs.as_slice() {
        [] => {
            return Err(ParsingErrorReason::LookupFailed(format!(
                "no addresses returned for {text}"
            )));
        }
        [addr] => BindAddress::Resolved(*addr),
        _ => {
            debug!(
                "Service {}: {text} has {} addresses, deferring the choice",
                record.name,
                addrs.len()
            );
            BindAddress::Deferred(owned_string(text, "bind")?)
        }
    };
    record.bind = Some(bind);
    Ok(())
}
