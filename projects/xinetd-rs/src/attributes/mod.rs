//! Validators for the attributes of a service block.
//!
//! Every keyword has one parser with the same signature (see
//! [`AttributeParser`]). A parser either writes the typed value(s) for its
//! keyword into the [`ServiceConfig`] and returns `Ok`, or returns the reason
//! for the failure and leaves the record as it was. The only documented
//! exceptions are `cps` and the size based resource limits, which reset their
//! fields to zero when the value is bad.

mod access_parsers;
mod env_parsers;
mod exec_parsers;
mod flag_parsers;
mod limit_parsers;
mod log_parsers;
mod net_parsers;
mod string_parsers;
pub mod value_parsers;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::log;

use crate::config::ParserSettings;
use crate::platform::{Resolver, SystemResolver};
use crate::service_config::ServiceConfig;

use access_parsers::*;
use env_parsers::*;
use exec_parsers::*;
use flag_parsers::*;
use limit_parsers::*;
use log_parsers::*;
use net_parsers::*;
use string_parsers::*;

/// The assignment operator of an attribute line.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum AssignOp {
    /// `=`
    Set,
    /// `+=`
    Add,
    /// `-=`
    Remove,
}

impl FromStr for AssignOp {
    type Err = ParsingErrorReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Set),
            "+=" => Ok(Self::Add),
            "-=" => Ok(Self::Remove),
            other => Err(ParsingErrorReason::Generic(format!(
                "unknown assignment operator: {other}"
            ))),
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Set => "=",
            Self::Add => "+=",
            Self::Remove => "-=",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParsingErrorReason {
    #[error("attribute {0} expects at least 1 value and none were given")]
    MissingValue(String),
    #[error("attribute {attribute} expects {expected} value(s), got: {values:?}")]
    WrongValueCount {
        attribute: String,
        expected: String,
        values: Vec<String>,
    },
    /// A name in a flag list that is not in the table.
    #[error("Bad {0}: {1}")]
    UnknownFlag(String, String),
    /// A single enumerated value that is not one of the accepted names.
    #[error("Bad {0}: {1}")]
    UnknownValue(String, String),
    #[error("{0} is invalid: {1}")]
    InvalidValue(String, String),
    #[error("operator '{1}' not supported for {0} attribute")]
    UnsupportedOperator(String, AssignOp),
    #[error("{0}")]
    LookupFailed(String),
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("attribute {0} is not allowed in a {1} section")]
    WrongSection(String, Section),
    #[error("out of memory while parsing {0}")]
    OutOfMemory(String),
    #[error("{0}")]
    Generic(String),
}

impl ParsingErrorReason {
    /// The level a failure is logged at. Configuration mistakes are warnings
    /// or errors; running out of memory is the closest thing to critical that
    /// `log` has.
    #[must_use]
    pub fn level(&self) -> log::Level {
        match self {
            Self::MissingValue(_) | Self::UnknownFlag(..) | Self::UnsupportedOperator(..) => {
                log::Level::Warn
            }
            _ => log::Level::Error,
        }
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::OutOfMemory(_))
    }
}

/// A failed attribute line.
#[derive(Debug, thiserror::Error)]
#[error("{attribute}: {reason}")]
pub struct AttributeError {
    pub attribute: String,
    #[source]
    pub reason: ParsingErrorReason,
}

/// The block an attribute line appears in.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Section {
    Service,
    Defaults,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Service => "service",
            Self::Defaults => "defaults",
        })
    }
}

/// Which blocks accept an attribute.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Scope {
    Service,
    Defaults,
    Both,
}

impl Scope {
    #[must_use]
    pub fn allows(self, section: Section) -> bool {
        matches!(
            (self, section),
            (Self::Both, _) | (Self::Service, Section::Service) | (Self::Defaults, Section::Defaults)
        )
    }
}

/// Everything a parser may consult besides its own tokens.
pub struct ParseContext {
    pub settings: ParserSettings,
    pub resolver: Box<dyn Resolver>,
    /// The daemon's own environment, taken once when the context is built.
    /// `passenv` only accepts variables that are defined here.
    pub environment: HashMap<String, String>,
}

impl ParseContext {
    #[must_use]
    pub fn new(settings: ParserSettings) -> Self {
        Self::with_resolver(settings, Box::new(SystemResolver))
    }

    #[must_use]
    pub fn with_resolver(settings: ParserSettings, resolver: Box<dyn Resolver>) -> Self {
        let environment = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            settings,
            resolver,
            environment,
        }
    }
}

impl fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("settings", &self.settings)
            .field("environment", &self.environment.len())
            .finish_non_exhaustive()
    }
}

/// The contract every keyword handler implements: the value tokens of one
/// line, the record to update, the operator of the line, and the context.
pub type AttributeParser =
    fn(&[&str], &mut ServiceConfig, AssignOp, &ParseContext) -> Result<(), ParsingErrorReason>;

pub struct AttributeSpec {
    pub name: &'static str,
    /// Whether `+=` and `-=` are accepted.
    pub modifiable: bool,
    pub scope: Scope,
    pub parser: AttributeParser,
}

impl fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("name", &self.name)
            .field("modifiable", &self.modifiable)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

const fn attr(
    name: &'static str,
    modifiable: bool,
    scope: Scope,
    parser: AttributeParser,
) -> AttributeSpec {
    AttributeSpec {
        name,
        modifiable,
        scope,
        parser,
    }
}

pub static ATTRIBUTES: &[AttributeSpec] = &[
    attr("id", false, Scope::Service, id_parser),
    attr("type", true, Scope::Service, type_parser),
    attr("flags", true, Scope::Service, flags_parser),
    attr("socket_type", false, Scope::Service, socket_type_parser),
    attr("protocol", false, Scope::Service, protocol_parser),
    attr("wait", false, Scope::Service, wait_parser),
    attr("user", false, Scope::Service, user_parser),
    attr("group", false, Scope::Service, group_parser),
    attr("server", false, Scope::Service, server_parser),
    attr("server_args", false, Scope::Service, server_args_parser),
    attr("instances", false, Scope::Both, instances_parser),
    attr("per_source", false, Scope::Both, per_source_parser),
    attr("cps", false, Scope::Both, cps_parser),
    attr("log_on_success", true, Scope::Both, log_on_success_parser),
    attr("log_on_failure", true, Scope::Both, log_on_failure_parser),
    attr("log_type", false, Scope::Both, log_type_parser),
    attr("only_from", true, Scope::Both, only_from_parser),
    attr("no_access", true, Scope::Both, no_access_parser),
    attr("access_times", true, Scope::Service, access_times_parser),
    attr("port", false, Scope::Service, port_parser),
    attr("rpc_version", false, Scope::Service, rpc_version_parser),
    attr("rpc_number", false, Scope::Service, rpc_number_parser),
    attr("nice", false, Scope::Service, nice_parser),
    attr("env", true, Scope::Service, env_parser),
    attr("passenv", true, Scope::Both, passenv_parser),
    attr("disable", false, Scope::Service, svcdisable_parser),
    attr("banner", false, Scope::Both, banner_parser),
    attr("banner_success", false, Scope::Both, banner_success_parser),
    attr("banner_fail", false, Scope::Both, banner_fail_parser),
    attr("redirect", false, Scope::Service, redir_parser),
    attr("bind", false, Scope::Both, bind_parser),
    attr("interface", false, Scope::Both, bind_parser),
    attr("groups", false, Scope::Both, groups_parser),
    attr("umask", false, Scope::Both, umask_parser),
    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    attr("rlimit_as", false, Scope::Service, rlim_as_parser),
    attr("rlimit_cpu", false, Scope::Service, rlim_cpu_parser),
    attr("rlimit_data", false, Scope::Service, rlim_data_parser),
    #[cfg(not(target_os = "solaris"))]
    attr("rlimit_rss", false, Scope::Service, rlim_rss_parser),
    attr("rlimit_stack", false, Scope::Service, rlim_stack_parser),
    attr("deny_time", false, Scope::Service, deny_time_parser),
    #[cfg(feature = "loadavg")]
    attr("max_load", false, Scope::Both, max_load_parser),
    attr("v6only", false, Scope::Both, v6only_parser),
    attr("disabled", true, Scope::Defaults, disabled_parser),
    attr("enabled", true, Scope::Defaults, enabled_parser),
];

#[must_use]
pub fn lookup_attribute(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.name == name)
}

fn run_attribute(
    section: Section,
    name: &str,
    op: AssignOp,
    tokens: &[&str],
    record: &mut ServiceConfig,
    ctx: &ParseContext,
) -> Result<(), ParsingErrorReason> {
    let spec =
        lookup_attribute(name).ok_or_else(|| ParsingErrorReason::UnknownAttribute(name.to_owned()))?;
    if !spec.scope.allows(section) {
        return Err(ParsingErrorReason::WrongSection(name.to_owned(), section));
    }
    if op != AssignOp::Set && !spec.modifiable {
        return Err(ParsingErrorReason::UnsupportedOperator(name.to_owned(), op));
    }
    (spec.parser)(tokens, record, op, ctx)
}

/// Apply one line of a service block. See [`apply_attribute_in`].
pub fn apply_attribute(
    name: &str,
    op: AssignOp,
    tokens: &[&str],
    record: &mut ServiceConfig,
    ctx: &ParseContext,
) -> Result<(), AttributeError> {
    apply_attribute_in(Section::Service, name, op, tokens, record, ctx)
}

/// Look up the parser for `name` and run it. Failures are logged here, with
/// the attribute and the service name, before they are handed back.
pub fn apply_attribute_in(
    section: Section,
    name: &str,
    op: AssignOp,
    tokens: &[&str],
    record: &mut ServiceConfig,
    ctx: &ParseContext,
) -> Result<(), AttributeError> {
    run_attribute(section, name, op, tokens, record, ctx).map_err(|reason| {
        if reason.is_critical() {
            log!(
                reason.level(),
                "CRITICAL: service {}, attribute {name}: {reason}",
                record.name
            );
        } else {
            log!(
                reason.level(),
                "service {}, attribute {name}: {reason}",
                record.name
            );
        }
        AttributeError {
            attribute: name.to_owned(),
            reason,
        }
    })
}
