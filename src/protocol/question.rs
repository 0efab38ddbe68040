use crate::cursor::Cursor;
use crate::error::Result;
use crate::protocol::name::{decode_name, name_len, wrap_name, PointerMode};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Question {
    pub name: String,
    pub _type: u16,
    /// Raw class; the top bit is the unicast-response hint.
    pub class: u16,
}

impl Question {
    pub fn new(name: &str, _type: u16, class: u16) -> Self {
        Question {
            name: name.to_string(),
            _type,
            class,
        }
    }

    pub fn from(cursor: &mut Cursor, mode: PointerMode) -> Result<Self> {
        let (name, len) = decode_name(cursor.get_buf(), cursor.get_current_index(), mode)?;
        cursor.move_to(len)?;
        let _type = cursor.take_u16()?;
        let class = cursor.take_u16()?;
        Ok(Question {
            name,
            _type,
            class,
        })
    }

    pub fn wire_len(&self) -> Result<usize> {
        Ok(name_len(&self.name)? + 4)
    }

    pub fn write(&self, vec: &mut Vec<u8>) -> Result<()> {
        wrap_name(&self.name, vec)?;
        vec.extend_from_slice(&self._type.to_be_bytes());
        vec.extend_from_slice(&self.class.to_be_bytes());
        Ok(())
    }
}
