//! Name/value tables for the enumerated attribute values.
//!
//! Names are matched case-sensitively, exactly like they are written in the
//! configuration files (`REUSE`, `stream`, `local0`, ...).

use crate::service_config::SocketType;

/// A fixed table mapping configuration names to values.
pub type NameValueList<T> = [(&'static str, T)];

/// Bit positions of the service types (`type` attribute).
pub mod service_types {
    pub const RPC: u32 = 0;
    pub const INTERNAL: u32 = 1;
    pub const UNLISTED: u32 = 2;
    pub const SPECIAL: u32 = 3;
    pub const TCPMUX: u32 = 4;
    pub const TCPMUXPLUS: u32 = 5;
}

/// Bit positions of the service flags (`flags` attribute).
pub mod service_flags {
    pub const REUSE: u32 = 0;
    pub const INTERCEPT: u32 = 1;
    pub const NORETRY: u32 = 2;
    pub const IDONLY: u32 = 3;
    pub const NAMEINARGS: u32 = 4;
    pub const NODELAY: u32 = 5;
    pub const KEEPALIVE: u32 = 6;
    pub const NOLIBWRAP: u32 = 7;
    pub const SENSOR: u32 = 8;
    pub const IPV4: u32 = 9;
    pub const IPV6: u32 = 10;
    pub const LABELED: u32 = 11;
    /// Set through the `disable` attribute only, it has no name in
    /// [`SERVICE_FLAGS`](super::SERVICE_FLAGS).
    pub const DISABLE: u32 = 12;
}

/// Bit positions of the `log_on_success` / `log_on_failure` options.
pub mod log_options {
    pub const PID: u32 = 0;
    pub const HOST: u32 = 1;
    pub const USERID: u32 = 2;
    pub const EXIT: u32 = 3;
    pub const DURATION: u32 = 4;
    pub const TRAFFIC: u32 = 5;
    pub const ATTEMPT: u32 = 6;
}

pub static SERVICE_TYPES: &NameValueList<u32> = &[
    ("RPC", service_types::RPC),
    ("INTERNAL", service_types::INTERNAL),
    ("UNLISTED", service_types::UNLISTED),
    ("SPECIAL", service_types::SPECIAL),
    ("TCPMUX", service_types::TCPMUX),
    ("TCPMUXPLUS", service_types::TCPMUXPLUS),
];

pub static SERVICE_FLAGS: &NameValueList<u32> = &[
    ("REUSE", service_flags::REUSE),
    ("INTERCEPT", service_flags::INTERCEPT),
    ("NORETRY", service_flags::NORETRY),
    ("IDONLY", service_flags::IDONLY),
    ("NAMEINARGS", service_flags::NAMEINARGS),
    ("NODELAY", service_flags::NODELAY),
    ("KEEPALIVE", service_flags::KEEPALIVE),
    ("NOLIBWRAP", service_flags::NOLIBWRAP),
    ("SENSOR", service_flags::SENSOR),
    ("IPv4", service_flags::IPV4),
    ("IPv6", service_flags::IPV6),
    ("LABELED", service_flags::LABELED),
];

pub static SOCKET_TYPES: &NameValueList<SocketType> = &[
    ("stream", SocketType::Stream),
    ("dgram", SocketType::Dgram),
    ("raw", SocketType::Raw),
    ("seqpacket", SocketType::SeqPacket),
];

pub static SUCCESS_LOG_OPTIONS: &NameValueList<u32> = &[
    ("PID", log_options::PID),
    ("HOST", log_options::HOST),
    ("USERID", log_options::USERID),
    ("EXIT", log_options::EXIT),
    ("DURATION", log_options::DURATION),
    ("TRAFFIC", log_options::TRAFFIC),
];

pub static FAILURE_LOG_OPTIONS: &NameValueList<u32> = &[
    ("HOST", log_options::HOST),
    ("USERID", log_options::USERID),
    ("ATTEMPT", log_options::ATTEMPT),
];

pub static SYSLOG_FACILITIES: &NameValueList<libc::c_int> = &[
    ("daemon", libc::LOG_DAEMON),
    ("auth", libc::LOG_AUTH),
    ("authpriv", libc::LOG_AUTHPRIV),
    ("user", libc::LOG_USER),
    ("mail", libc::LOG_MAIL),
    ("lpr", libc::LOG_LPR),
    ("news", libc::LOG_NEWS),
    ("uucp", libc::LOG_UUCP),
    ("ftp", libc::LOG_FTP),
    ("local0", libc::LOG_LOCAL0),
    ("local1", libc::LOG_LOCAL1),
    ("local2", libc::LOG_LOCAL2),
    ("local3", libc::LOG_LOCAL3),
    ("local4", libc::LOG_LOCAL4),
    ("local5", libc::LOG_LOCAL5),
    ("local6", libc::LOG_LOCAL6),
    ("local7", libc::LOG_LOCAL7),
];

pub static SYSLOG_LEVELS: &NameValueList<libc::c_int> = &[
    ("emerg", libc::LOG_EMERG),
    ("alert", libc::LOG_ALERT),
    ("crit", libc::LOG_CRIT),
    ("err", libc::LOG_ERR),
    ("warning", libc::LOG_WARNING),
    ("notice", libc::LOG_NOTICE),
    ("info", libc::LOG_INFO),
    ("debug", libc::LOG_DEBUG),
];

/// Look up `name` in `list`. The comparison is case-sensitive.
pub fn find_value<T: Copy>(list: &NameValueList<T>, name: &str) -> Option<T> {
    list.iter()
        .find(|(entry, _)| *entry == name)
        .map(|(_, value)| *value)
}

/// Reverse lookup, used when rendering a value back into its name.
pub fn find_name<T: PartialEq>(list: &NameValueList<T>, value: &T) -> Option<&'static str> {
    list.iter()
        .find(|(_, entry)| entry == value)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(find_value(SERVICE_FLAGS, "IPv6"), Some(service_flags::IPV6));
        assert_eq!(find_value(SERVICE_FLAGS, "IPV6"), None);
        assert_eq!(find_value(SOCKET_TYPES, "stream"), Some(SocketType::Stream));
        assert_eq!(find_value(SOCKET_TYPES, "STREAM"), None);
    }

    #[test]
    fn disable_bit_has_no_name() {
        assert_eq!(find_name(SERVICE_FLAGS, &service_flags::DISABLE), None);
        assert_eq!(find_name(SYSLOG_LEVELS, &libc::LOG_INFO), Some("info"));
    }
}
