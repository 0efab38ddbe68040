use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};

pub const IPV4_LEN: usize = 4;
pub const IPV6_LEN: usize = 16;

/// Rdata of an A or AAAA record.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Address {
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl Address {
    pub fn decode_v4(rdata: &[u8]) -> Result<Self> {
        let octets: [u8; IPV4_LEN] = fixed(rdata)?;
        Ok(Address::V4(Ipv4Addr::from(octets)))
    }

    pub fn decode_v6(rdata: &[u8]) -> Result<Self> {
        let octets: [u8; IPV6_LEN] = fixed(rdata)?;
        Ok(Address::V6(Ipv6Addr::from(octets)))
    }

    pub fn wire_len(&self) -> usize {
        match self {
            Address::V4(_) => IPV4_LEN,
            Address::V6(_) => IPV6_LEN,
        }
    }

    pub fn write(&self, vec: &mut Vec<u8>) {
        match self {
            Address::V4(ip) => vec.extend_from_slice(&ip.octets()),
            Address::V6(ip) => vec.extend_from_slice(&ip.octets()),
        }
    }
}

/// Longer rdata is rejected as well as shorter: an address never carries
/// trailing bytes, and accepting them would not survive a re-encode.
fn fixed<const N: usize>(rdata: &[u8]) -> Result<[u8; N]> {
    if rdata.len() != N {
        return Err(Error::MalformedPacket("address rdata has wrong length"));
    }
    let mut octets = [0u8; N];
    octets.copy_from_slice(rdata);
    Ok(octets)
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::V4(ip) => write!(f, "{}", ip),
            Address::V6(ip) => write!(f, "{}", ip),
        }
    }
}
