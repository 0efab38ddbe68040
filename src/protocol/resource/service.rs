use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::protocol::name::{decode_name, name_len, wrap_name, PointerMode};

/// Priority, weight and port, plus at least the root byte of the target.
pub const SRV_MIN_LEN: usize = 7;
const SRV_FIXED_LEN: usize = 6;

/// Rdata of an SRV record. Priority and weight are not modelled and are
/// always written as zero.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Service {
    pub port: u16,
    pub target: String,
}

impl Service {
    pub fn new(port: u16, target: &str) -> Self {
        Service {
            port,
            target: target.to_string(),
        }
    }

    /// `buf` ends where the rdata ends; `start` is the first rdata byte.
    pub fn decode(buf: &[u8], start: usize, mode: PointerMode) -> Result<Self> {
        if buf.len().saturating_sub(start) < SRV_MIN_LEN {
            return Err(Error::MalformedPacket("srv rdata shorter than 7 bytes"));
        }
        let mut cursor = Cursor::form(buf);
        cursor.at(start);
        let _priority = cursor.take_u16()?;
        let _weight = cursor.take_u16()?;
        let port = cursor.take_u16()?;
        let (target, _) = decode_name(buf, cursor.get_current_index(), mode)?;
        Ok(Service {
            port,
            target,
        })
    }

    pub fn wire_len(&self) -> Result<usize> {
        Ok(SRV_FIXED_LEN + name_len(&self.target)?)
    }

    pub fn write(&self, vec: &mut Vec<u8>) -> Result<()> {
        vec.extend_from_slice(&0u16.to_be_bytes());
        vec.extend_from_slice(&0u16.to_be_bytes());
        vec.extend_from_slice(&self.port.to_be_bytes());
        wrap_name(&self.target, vec)
    }
}
