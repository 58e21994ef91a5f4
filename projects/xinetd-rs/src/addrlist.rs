//! Address lists for the `only_from` / `no_access` attributes.
//!
//! Accepted forms:
//! - numeric IPv4 addresses; trailing zero octets turn the address into a
//!   network (`10.0.0.0` is `10.0.0.0/8`, `0.0.0.0` matches everything)
//! - numeric IPv6 addresses, optionally in brackets
//! - `addr/len` in CIDR notation
//! - factorized addresses, e.g. `128.138.{193,194}`
//! - domains with a leading dot (`.example.org`)
//! - plain host names, resolved when a connection is checked

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::trace;
use serde::Serialize;

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub enum AddressEntry {
    Net { addr: IpAddr, prefix: u8 },
    Host(String),
    Domain(String),
}

impl AddressEntry {
    /// Whether the numeric address falls inside this entry. Host and domain
    /// entries need name resolution and never match here.
    #[must_use]
    pub fn matches_addr(&self, candidate: &IpAddr) -> bool {
        let Self::Net { addr, prefix } = self else {
            return false;
        };
        match (addr, candidate) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = prefix_mask_v4(*prefix);
                u32::from(*net) & mask == u32::from(*ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = prefix_mask_v6(*prefix);
                u128::from(*net) & mask == u128::from(*ip) & mask
            }
            (IpAddr::V4(net), IpAddr::V6(ip)) => match ip.to_ipv4_mapped() {
                Some(ip) => {
                    let mask = prefix_mask_v4(*prefix);
                    u32::from(*net) & mask == u32::from(ip) & mask
                }
                None => false,
            },
            (IpAddr::V6(_), IpAddr::V4(_)) => false,
        }
    }
}

fn prefix_mask_v4(prefix: u8) -> u32 {
    if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix.min(32)))
    }
}

fn prefix_mask_v6(prefix: u8) -> u128 {
    if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix.min(128)))
    }
}

#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize)]
pub struct AddressList {
    entries: Vec<AddressEntry>,
}

impl AddressList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse `spec` and append the resulting entries.
    pub fn add(&mut self, spec: &str) -> Result<(), String> {
        let parsed = parse_address_spec(spec)?;
        for entry in parsed {
            if !self.entries.contains(&entry) {
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Parse `spec` and drop every equal entry. Removing something that is
    /// not in the list is not an error.
    pub fn remove(&mut self, spec: &str) -> Result<(), String> {
        let parsed = parse_address_spec(spec)?;
        let before = self.entries.len();
        self.entries.retain(|e| !parsed.contains(e));
        if before == self.entries.len() {
            trace!("Address {spec} was not in the list, nothing removed");
        }
        Ok(())
    }

    #[must_use]
    pub fn matches_addr(&self, candidate: &IpAddr) -> bool {
        self.entries.iter().any(|e| e.matches_addr(candidate))
    }
}

fn parse_address_spec(spec: &str) -> Result<Vec<AddressEntry>, String> {
    if spec.is_empty() {
        return Err("empty address".to_owned());
    }

    if spec.contains('{') {
        return parse_factorized(spec);
    }

    if let Some((addr, len)) = spec.split_once('/') {
        let addr = parse_ip_literal(addr).ok_or_else(|| format!("bad network address: {spec}"))?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        let prefix = len
            .parse::<u8>()
            .ok()
            .filter(|p| *p <= max)
            .ok_or_else(|| format!("bad prefix length: {spec}"))?;
        return Ok(vec![AddressEntry::Net { addr, prefix }]);
    }

    if let Some(addr) = parse_ip_literal(spec) {
        let prefix = match addr {
            IpAddr::V4(v4) => implicit_prefix_v4(v4),
            IpAddr::V6(_) => 128,
        };
        return Ok(vec![AddressEntry::Net { addr, prefix }]);
    }

    if let Some(domain) = spec.strip_prefix('.') {
        if is_valid_hostname(domain) {
            return Ok(vec![AddressEntry::Domain(spec.to_owned())]);
        }
        return Err(format!("bad domain: {spec}"));
    }

    if is_valid_hostname(spec) {
        return Ok(vec![AddressEntry::Host(spec.to_owned())]);
    }

    Err(format!("bad address: {spec}"))
}

fn parse_ip_literal(text: &str) -> Option<IpAddr> {
    let text = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(text);
    if let Ok(v4) = text.parse::<Ipv4Addr>() {
        return Some(IpAddr::V4(v4));
    }
    text.parse::<Ipv6Addr>().ok().map(IpAddr::V6)
}

/// Trailing zero octets make an IPv4 address a network address.
fn implicit_prefix_v4(addr: Ipv4Addr) -> u8 {
    let zeros = addr.octets().iter().rev().take_while(|o| **o == 0).count();
    32 - 8 * zeros as u8
}

/// `128.138.{193,194}` becomes `128.138.193.0/24` and `128.138.194.0/24`.
fn parse_factorized(spec: &str) -> Result<Vec<AddressEntry>, String> {
    let bad = || format!("bad factorized address: {spec}");

    let (base, rest) = spec.split_once('{').ok_or_else(bad)?;
    let list = rest.strip_suffix('}').ok_or_else(bad)?;
    let mut octets: Vec<u8> = Vec::new();
    if !base.is_empty() {
        let leading = base.strip_suffix('.').ok_or_else(bad)?;
        for part in leading.split('.') {
            octets.push(part.parse::<u8>().map_err(|_| bad())?);
        }
    }
    if octets.len() >= 4 {
        return Err(bad());
    }

    let mut entries = Vec::new();
    for item in list.split(',') {
        let last = item.trim().parse::<u8>().map_err(|_| bad())?;
        let mut full = [0u8; 4];
        full[..octets.len()].copy_from_slice(&octets);
        full[octets.len()] = last;
        let prefix = 8 * (octets.len() as u8 + 1);
        entries.push(AddressEntry::Net {
            addr: IpAddr::V4(Ipv4Addr::from(full)),
            prefix,
        });
    }
    Ok(entries)
}

fn is_valid_hostname(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 253
        && name
            .split('.')
            .all(|label| {
                !label.is_empty()
                    && label
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            })
}
