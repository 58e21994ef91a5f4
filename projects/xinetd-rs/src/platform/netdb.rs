//! Thin wrappers around the libc network databases (`/etc/protocols`,
//! `/etc/services`) and `getaddrinfo`.

use std::ffi::{CStr, CString};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use super::{AddressFamily, AddressHint};

fn to_cstring(what: &str, value: &str) -> Result<CString, String> {
    CString::new(value).map_err(|_| format!("{what} contains a NUL byte: {value:?}"))
}

pub fn getprotobyname(name: &str) -> Result<i32, String> {
    let c_name = to_cstring("Protocol name", name)?;
    let entry = unsafe { libc::getprotobyname(c_name.as_ptr()) };
    if entry.is_null() {
        return Err(format!("No entry found for protocol: {name}"));
    }
    Ok(unsafe { (*entry).p_proto })
}

/// Port of `name` in host byte order.
pub fn getservbyname(name: &str, proto: &str) -> Result<u16, String> {
    let c_name = to_cstring("Service name", name)?;
    let c_proto = to_cstring("Protocol name", proto)?;
    let entry = unsafe { libc::getservbyname(c_name.as_ptr(), c_proto.as_ptr()) };
    if entry.is_null() {
        return Err(format!("No entry found for service: {name}/{proto}"));
    }
    // s_port holds the 16 bit port in network byte order
    let raw = unsafe { (*entry).s_port } as u16;
    Ok(u16::from_be(raw))
}

pub fn getaddrinfo(host: &str, hint: AddressHint) -> Result<Vec<SocketAddr>, String> {
    let c_host = to_cstring("Host name", host)?;

    let mut hints: libc::addrinfo = unsafe { std::mem::zeroed() };
    hints.ai_flags = libc::AI_CANONNAME;
    if hint.numeric_host {
        hints.ai_flags |= libc::AI_NUMERICHOST;
    }
    // restricting to stream sockets keeps getaddrinfo from returning one
    // record per socket type
    hints.ai_socktype = libc::SOCK_STREAM;
    hints.ai_family = match hint.family {
        AddressFamily::Unspecified => libc::AF_UNSPEC,
        AddressFamily::Inet => libc::AF_INET,
        AddressFamily::Inet6 => libc::AF_INET6,
    };

    let mut res: *mut libc::addrinfo = std::ptr::null_mut();
    let rc = unsafe { libc::getaddrinfo(c_host.as_ptr(), std::ptr::null(), &hints, &mut res) };
    if rc != 0 {
        let reason = unsafe { CStr::from_ptr(libc::gai_strerror(rc)) };
        return Err(format!(
            "Could not resolve {host}: {}",
            reason.to_string_lossy()
        ));
    }

    let mut addrs = Vec::new();
    let mut cur = res;
    while !cur.is_null() {
        let info = unsafe { &*cur };
        if !info.ai_addr.is_null() {
            if let Some(addr) = unsafe { sockaddr_to_std(info.ai_addr, info.ai_addrlen) } {
                addrs.push(addr);
            }
        }
        cur = info.ai_next;
    }
    unsafe { libc::freeaddrinfo(res) };

    Ok(addrs)
}

/// # Safety
/// `sa` must point to a socket address of at least `len` bytes.
unsafe fn sockaddr_to_std(sa: *const libc::sockaddr, len: libc::socklen_t) -> Option<SocketAddr> {
    let len = len as usize;
    let family = i32::from(unsafe { (*sa).sa_family });
    match family {
        libc::AF_INET if len >= std::mem::size_of::<libc::sockaddr_in>() => {
            let sin = unsafe { &*sa.cast::<libc::sockaddr_in>() };
            let ip = Ipv4Addr::from(u32::from_be(sin.sin_addr.s_addr));
            Some(SocketAddr::V4(SocketAddrV4::new(
                ip,
                u16::from_be(sin.sin_port),
            )))
        }
        libc::AF_INET6 if len >= std::mem::size_of::<libc::sockaddr_in6>() => {
            let sin6 = unsafe { &*sa.cast::<libc::sockaddr_in6>() };
            Some(SocketAddr::V6(SocketAddrV6::new(
                Ipv6Addr::from(sin6.sin6_addr.s6_addr),
                u16::from_be(sin6.sin6_port),
                sin6.sin6_flowinfo,
                sin6.sin6_scope_id,
            )))
        }
        _ => None,
    }
}
