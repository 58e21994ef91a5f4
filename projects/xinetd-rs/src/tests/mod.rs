mod access;
mod network;
mod strings;

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;

use crate::attributes::{AssignOp, ParseContext, ParsingErrorReason, Section, apply_attribute_in};
use crate::config::ParserSettings;
use crate::platform::{AddressFamily, AddressHint, Resolver, SystemResolver, UserEntry};
use crate::service_config::ServiceConfig;

/// Fixed answers for the name services. File checks go to the real
/// filesystem so they can be tested with temporary files.
struct FakeResolver;

impl Resolver for FakeResolver {
    fn user_by_name(&self, name: &str) -> Result<UserEntry, String> {
        let (uid, gid) = match name {
            "root" => (0, 0),
            "nobody" => (65534, 65533),
            _ => return Err(format!("No entry found for username: {name}")),
        };
        Ok(UserEntry { uid, gid })
    }

    fn group_by_name(&self, name: &str) -> Result<libc::gid_t, String> {
        match name {
            "wheel" => Ok(10),
            "nogroup" => Ok(65534),
            _ => Err(format!("No entry found for groupname: {name}")),
        }
    }

    fn protocol_by_name(&self, name: &str) -> Result<i32, String> {
        match name {
            "tcp" => Ok(6),
            "udp" => Ok(17),
            _ => Err(format!("No entry found for protocol: {name}")),
        }
    }

    fn service_port(&self, name: &str, proto: &str) -> Result<u16, String> {
        match (name, proto) {
            ("telnet", "tcp") => Ok(23),
            ("http", "tcp") => Ok(80),
            _ => Err(format!("No entry found for service: {name}/{proto}")),
        }
    }

    fn resolve(&self, host: &str, hint: AddressHint) -> Result<Vec<SocketAddr>, String> {
        let candidates: Vec<IpAddr> = if let Ok(ip) = host.parse::<IpAddr>() {
            vec![ip]
        } else if hint.numeric_host {
            return Err(format!("Could not resolve {host}: not a numeric address"));
        } else {
            match host {
                "localhost" => vec![
                    IpAddr::V4(Ipv4Addr::LOCALHOST),
                    IpAddr::V6(Ipv6Addr::LOCALHOST),
                ],
                "single.example" => vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10))],
                _ => return Err(format!("Could not resolve {host}: unknown host")),
            }
        };
        Ok(candidates
            .into_iter()
            .filter(|ip| match hint.family {
                AddressFamily::Unspecified => true,
                AddressFamily::Inet => ip.is_ipv4(),
                AddressFamily::Inet6 => ip.is_ipv6(),
            })
            .map(|ip| SocketAddr::new(ip, 0))
            .collect())
    }

    fn is_executable(&self, path: &Path) -> bool {
        SystemResolver.is_executable(path)
    }

    fn stat(&self, path: &Path) -> Result<(), String> {
        SystemResolver.stat(path)
    }
}

/// A fresh service record plus a context backed by [`FakeResolver`] and a
/// small fixed environment.
struct Harness {
    ctx: ParseContext,
    record: ServiceConfig,
}

impl Harness {
    fn new() -> Self {
        let mut ctx =
            ParseContext::with_resolver(ParserSettings::default(), Box::new(FakeResolver));
        ctx.environment = HashMap::from([
            ("PATH".to_owned(), "/usr/bin:/bin".to_owned()),
            ("LANG".to_owned(), "C".to_owned()),
            ("TZ".to_owned(), "UTC".to_owned()),
        ]);
        Self {
            ctx,
            record: ServiceConfig::new("test-service"),
        }
    }

    fn apply_in(
        &mut self,
        section: Section,
        name: &str,
        op: AssignOp,
        tokens: &[&str],
    ) -> Result<(), ParsingErrorReason> {
        apply_attribute_in(section, name, op, tokens, &mut self.record, &self.ctx)
            .map_err(|e| e.reason)
    }

    fn apply(&mut self, name: &str, op: AssignOp, tokens: &[&str]) -> Result<(), ParsingErrorReason> {
        self.apply_in(Section::Service, name, op, tokens)
    }

    fn set(&mut self, name: &str, tokens: &[&str]) -> Result<(), ParsingErrorReason> {
        self.apply(name, AssignOp::Set, tokens)
    }

    fn add(&mut self, name: &str, tokens: &[&str]) -> Result<(), ParsingErrorReason> {
        self.apply(name, AssignOp::Add, tokens)
    }

    fn remove(&mut self, name: &str, tokens: &[&str]) -> Result<(), ParsingErrorReason> {
        self.apply(name, AssignOp::Remove, tokens)
    }
}
