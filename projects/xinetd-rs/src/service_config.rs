//! The per-service configuration record that the attribute parsers fill in.
//!
//! A record is created empty when the parser enters a service block and is
//! mutated attribute by attribute. Fields that were never mentioned stay at
//! their `None`/empty value so that the daemon can apply its defaults later.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Serialize;

use crate::addrlist::AddressList;
use crate::timex::TimeInterval;

/// A small bit set, indexed by the constants in [`crate::nvlists`].
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash, Debug, Serialize)]
pub struct Mask(u32);

impl Mask {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn set(&mut self, bit: u32) {
        self.0 |= 1 << bit;
    }

    pub fn clear(&mut self, bit: u32) {
        self.0 &= !(1 << bit);
    }

    #[must_use]
    pub const fn contains(self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub enum SocketType {
    Stream,
    Dgram,
    Raw,
    SeqPacket,
}

/// A single rlimit value: either a numeric value or infinity
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub enum RLimitValue {
    /// A specific numeric value
    Value(u64),
    /// RLIM_INFINITY, no limit
    Infinity,
}

impl RLimitValue {
    #[must_use]
    pub fn as_raw(self) -> libc::rlim_t {
        match self {
            Self::Value(v) => v as libc::rlim_t,
            Self::Infinity => libc::RLIM_INFINITY,
        }
    }
}

/// Limit on concurrently running servers (`instances`, `per_source`).
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub enum InstanceLimit {
    Count(u32),
    Unlimited,
}

/// How long a client is banned after tripping a `SENSOR` service.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub enum DenyTime {
    Never,
    Forever,
    Minutes(u32),
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct Protocol {
    pub name: String,
    pub number: i32,
}

/// RPC program and version range.
///
/// A range with `min_version > max_version` is the "not set" marker: the
/// daemon then asks the portmapper for the defaults of the program.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Serialize)]
pub struct RpcData {
    pub program_number: Option<i32>,
    pub min_version: i32,
    pub max_version: i32,
}

/// The `cps` limiter: at most `max_connections` per second, after which the
/// service is turned off for `wait_secs` seconds.
#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Serialize)]
pub struct ConnectionRate {
    pub max_connections: u32,
    pub wait_secs: u32,
}

/// The argument vector handed to `execve` for the server.
///
/// The layout mirrors what the spawner expects: with `NAMEINARGS` the tokens
/// start at slot 0, otherwise slot 0 is left empty for the program name.
/// The trailing empty slots are the terminator.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize)]
pub struct ServerArgv {
    pub slots: Vec<Option<String>>,
}

impl ServerArgv {
    /// The arguments that were configured, without the reserved slots.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|s| s.as_deref())
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct FileLog {
    pub filename: PathBuf,
    /// `(soft, hard)` size limits in bytes, if any were configured.
    pub limits: Option<(u64, u64)>,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Serialize)]
pub struct SyslogLog {
    pub facility: libc::c_int,
    pub level: libc::c_int,
}

/// Where the service logs to (`log_type`).
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize)]
pub enum LogDestination {
    #[default]
    None,
    File(FileLog),
    Syslog(SyslogLog),
}

/// Result of the `bind` attribute.
///
/// When the host name resolves to more than one address the choice is put
/// off until the whole service block is read, since a later `flags = IPv4`
/// or `IPv6` decides which one is wanted.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub enum BindAddress {
    Resolved(SocketAddr),
    Deferred(String),
}

#[derive(Clone, Default, Debug, Serialize)]
pub struct ServiceConfig {
    pub name: String,
    pub id: Option<String>,

    pub service_type: Mask,
    pub flags: Mask,
    pub socket_type: Option<SocketType>,
    pub protocol: Option<Protocol>,
    pub wait: Option<bool>,
    pub groups: Option<bool>,
    pub v6only: Option<bool>,

    pub uid: Option<libc::uid_t>,
    /// Primary group of `user`, used when no `group` is configured.
    pub user_gid: Option<libc::gid_t>,
    pub gid: Option<libc::gid_t>,

    pub server: Option<PathBuf>,
    pub server_argv: Option<ServerArgv>,

    pub instances: Option<InstanceLimit>,
    pub per_source: Option<InstanceLimit>,
    pub connection_rate: ConnectionRate,
    pub port: Option<u16>,
    pub rpc: RpcData,
    pub nice: Option<i32>,
    pub umask: Option<u32>,
    pub deny_time: Option<DenyTime>,
    pub max_load: Option<f64>,

    pub log_on_success: Mask,
    pub log_on_failure: Mask,
    pub log: LogDestination,

    pub only_from: Option<AddressList>,
    pub no_access: Option<AddressList>,
    pub access_times: Option<Vec<TimeInterval>>,

    pub env_var_defs: Option<Vec<String>>,
    pub pass_env_vars: Option<Vec<String>>,

    pub disabled_services: Option<Vec<String>>,
    pub enabled_services: Option<Vec<String>>,

    pub banner: Option<String>,
    pub banner_success: Option<String>,
    pub banner_fail: Option<String>,

    pub redirect: Option<SocketAddr>,
    pub bind: Option<BindAddress>,

    pub rlim_as: Option<RLimitValue>,
    pub rlim_cpu: Option<RLimitValue>,
    pub rlim_data: Option<RLimitValue>,
    pub rlim_rss: Option<RLimitValue>,
    pub rlim_stack: Option<RLimitValue>,
}

impl ServiceConfig {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn name_in_args(&self) -> bool {
        self.flags.contains(crate::nvlists::service_flags::NAMEINARGS)
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(crate::nvlists::service_flags::DISABLE)
    }
}
