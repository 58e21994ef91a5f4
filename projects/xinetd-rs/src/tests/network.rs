use std::net::SocketAddr;

use super::Harness;
use crate::attributes::ParsingErrorReason;
use crate::service_config::{BindAddress, Protocol, RpcData};

#[test]
fn port_range() {
    let mut h = Harness::new();
    h.set("port", &["0"]).unwrap();
    assert_eq!(h.record.port, Some(0));
    h.set("port", &["65535"]).unwrap();
    assert_eq!(h.record.port, Some(65535));
    assert!(matches!(
        h.set("port", &["65536"]),
        Err(ParsingErrorReason::InvalidValue(_, _))
    ));
    assert!(h.set("port", &["-1"]).is_err());
    assert!(h.set("port", &["telnet"]).is_err());
    assert_eq!(h.record.port, Some(65535));
}

#[test]
fn rpc_versions() {
    let mut h = Harness::new();
    h.set("rpc_version", &["3"]).unwrap();
    assert_eq!((h.record.rpc.min_version, h.record.rpc.max_version), (3, 2));

    h.set("rpc_version", &["3-5"]).unwrap();
    assert_eq!((h.record.rpc.min_version, h.record.rpc.max_version), (3, 5));

    assert!(h.set("rpc_version", &["5-3"]).is_err());
    assert!(h.set("rpc_version", &["x-3"]).is_err());
    assert!(h.set("rpc_version", &["v2"]).is_err());
    assert_eq!((h.record.rpc.min_version, h.record.rpc.max_version), (3, 5));

    h.set("rpc_number", &["100002"]).unwrap();
    assert_eq!(
        h.record.rpc,
        RpcData {
            program_number: Some(100_002),
            min_version: 3,
            max_version: 5,
        }
    );
    assert!(h.set("rpc_number", &["rusersd"]).is_err());
}

#[test]
fn protocol_lookup() {
    let mut h = Harness::new();
    h.set("protocol", &["udp"]).unwrap();
    assert_eq!(
        h.record.protocol,
        Some(Protocol {
            name: "udp".to_owned(),
            number: 17
        })
    );
    assert!(matches!(
        h.set("protocol", &["sctp"]),
        Err(ParsingErrorReason::LookupFailed(_))
    ));
    assert_eq!(h.record.protocol.as_ref().map(|p| p.number), Some(17));
}

#[test]
fn redirect_with_numeric_port() {
    let mut h = Harness::new();
    h.set("redirect", &["192.0.2.1", "2323"]).unwrap();
    assert_eq!(
        h.record.redirect,
        Some("192.0.2.1:2323".parse::<SocketAddr>().unwrap())
    );

    h.set("redirect", &["2001:db8::5", "80"]).unwrap();
    assert_eq!(
        h.record.redirect,
        Some("[2001:db8::5]:80".parse::<SocketAddr>().unwrap())
    );
}

#[test]
fn redirect_with_service_name() {
    let mut h = Harness::new();
    h.set("redirect", &["single.example", "telnet"]).unwrap();
    assert_eq!(
        h.record.redirect,
        Some("192.0.2.10:23".parse::<SocketAddr>().unwrap())
    );
    // 0 is not a usable port, so it is looked up as a service name
    assert!(h.set("redirect", &["192.0.2.1", "0"]).is_err());
}

#[test]
fn bad_redirects() {
    let mut h = Harness::new();
    assert!(h.set("redirect", &["192.0.2.1", "70000"]).is_err());
    assert!(h.set("redirect", &["192.0.2.1", "gopher"]).is_err());
    assert!(h.set("redirect", &["nowhere.invalid", "80"]).is_err());
    assert!(matches!(
        h.set("redirect", &["192.0.2.1"]),
        Err(ParsingErrorReason::WrongValueCount { .. })
    ));
    assert_eq!(h.record.redirect, None);
}

#[test]
fn bind_numeric_addresses() {
    let mut h = Harness::new();
    h.set("bind", &["127.0.0.1"]).unwrap();
    assert_eq!(
        h.record.bind,
        Some(BindAddress::Resolved("127.0.0.1:0".parse().unwrap()))
    );

    h.set("bind", &["[::1]"]).unwrap();
    assert_eq!(
        h.record.bind,
        Some(BindAddress::Resolved("[::1]:0".parse().unwrap()))
    );

    h.set("interface", &["10.1.2.3"]).unwrap();
    assert_eq!(
        h.record.bind,
        Some(BindAddress::Resolved("10.1.2.3:0".parse().unwrap()))
    );
}

#[test]
fn bind_defers_ambiguous_names() {
    let mut h = Harness::new();
    h.set("bind", &["single.example"]).unwrap();
    assert_eq!(
        h.record.bind,
        Some(BindAddress::Resolved("192.0.2.10:0".parse().unwrap()))
    );

    h.set("bind", &["localhost"]).unwrap();
    assert_eq!(
        h.record.bind,
        Some(BindAddress::Deferred("localhost".to_owned()))
    );

    assert!(matches!(
        h.set("bind", &["nowhere.invalid"]),
        Err(ParsingErrorReason::LookupFailed(_))
    ));
    assert_eq!(
        h.record.bind,
        Some(BindAddress::Deferred("localhost".to_owned()))
    );
}
