mod address;
mod service;
mod txt;

use crate::error::Result;
use crate::protocol::name::{decode_name, name_len, wrap_name, PointerMode};

pub use address::Address;
pub use service::Service;
pub use txt::{TxtData, TxtNode};

pub const TYPE_A: u16 = 1;
pub const TYPE_NULL: u16 = 10;
pub const TYPE_PTR: u16 = 12;
pub const TYPE_TXT: u16 = 16;
pub const TYPE_AAAA: u16 = 28;
pub const TYPE_SRV: u16 = 33;
pub const TYPE_ANY: u16 = 255;

pub const CLASS_IN: u16 = 0x0001;
/// IN with the cache-flush bit, used for records this host owns.
pub const CLASS_FLUSH_IN: u16 = 0x8001;

/// Type-specific payload of a resource record.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RData {
    Address(Address),
    /// NULL records and every type without a dedicated decoder.
    Opaque(Vec<u8>),
    /// Target of a PTR record.
    Name(String),
    Text(TxtData),
    Service(Service),
}

impl RData {
    /// Decodes the rdata of a `_type` record. `buf` is the datagram cut off at
    /// the end of the rdata so no field can read past its declared length, and
    /// `start` is the offset of the first rdata byte.
    pub fn decode(_type: u16, buf: &[u8], start: usize, mode: PointerMode) -> Result<Self> {
        let rdata = &buf[start..];
        Ok(match _type {
            TYPE_A => RData::Address(Address::decode_v4(rdata)?),
            TYPE_AAAA => RData::Address(Address::decode_v6(rdata)?),
            TYPE_PTR => RData::Name(decode_name(buf, start, mode)?.0),
            TYPE_TXT => RData::Text(TxtData::decode(rdata)?),
            TYPE_SRV => RData::Service(Service::decode(buf, start, mode)?),
            _ => RData::Opaque(rdata.to_vec()),
        })
    }

    /// The record type this payload is written as when none is given.
    pub fn default_type(&self) -> u16 {
        match self {
            RData::Address(Address::V4(_)) => TYPE_A,
            RData::Address(Address::V6(_)) => TYPE_AAAA,
            RData::Opaque(_) => TYPE_NULL,
            RData::Name(_) => TYPE_PTR,
            RData::Text(_) => TYPE_TXT,
            RData::Service(_) => TYPE_SRV,
        }
    }

    /// Whether a record of `_type` may carry this payload.
    pub fn fits(&self, _type: u16) -> bool {
        match self {
            RData::Opaque(_) => !matches!(_type, TYPE_A | TYPE_AAAA | TYPE_PTR | TYPE_TXT | TYPE_SRV),
            _ => self.default_type() == _type,
        }
    }

    pub fn wire_len(&self) -> Result<usize> {
        match self {
            RData::Address(address) => Ok(address.wire_len()),
            RData::Opaque(data) => Ok(data.len()),
            RData::Name(name) => name_len(name),
            RData::Text(txt) => txt.wire_len(),
            RData::Service(service) => service.wire_len(),
        }
    }

    pub fn write(&self, vec: &mut Vec<u8>) -> Result<()> {
        match self {
            RData::Address(address) => {
                address.write(vec);
                Ok(())
            }
            RData::Opaque(data) => {
                vec.extend_from_slice(data);
                Ok(())
            }
            RData::Name(name) => wrap_name(name, vec),
            RData::Text(txt) => txt.write(vec),
            RData::Service(service) => service.write(vec),
        }
    }
}
