use crate::config::Config;
use crate::error::Result;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use tokio::net::UdpSocket;

/// Opens the UDP socket shared with every other responder on the host:
/// address reuse, multicast ttl and loopback, group membership on the
/// configured interface, bound to the mDNS port on all addresses.
pub fn open_multicast(config: &Config) -> Result<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_multicast_ttl_v4(config.multicast_ttl)?;
    socket.set_multicast_loop_v4(config.multicast_loop)?;
    if !config.interface.is_unspecified() {
        socket.set_multicast_if_v4(&config.interface)?;
    }
    socket.join_multicast_v4(&config.group, &config.interface)?;
    socket.set_nonblocking(true)?;

    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port));
    socket.bind(&SockAddr::from(addr))?;
    debug!("multicast socket bound to {}, joined {} on {}", addr, config.group, config.interface);

    let socket = UdpSocket::from_std(std::net::UdpSocket::from(socket))?;
    Ok(socket)
}

/// Where every response and query is sent.
pub fn group_addr(config: &Config) -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(config.group, config.port))
}
