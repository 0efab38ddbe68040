use crate::cursor::Cursor;
use crate::error::{Error, Result};

pub const HEADER_LEN: usize = 12;

const QR_FLAG: u16 = 0x8000;
const OPCODE_MASK: u16 = 0x7800;
const AA_FLAG: u16 = 0x0400;
const TC_FLAG: u16 = 0x0200;
const RD_FLAG: u16 = 0x0100;
const RCODE_MASK: u16 = 0x000F;

/// Standard query.
pub const QUERY_FLAGS: u16 = 0x0000;
/// Response with the authoritative-answer bit set.
pub const RESPONSE_FLAGS: u16 = QR_FLAG | AA_FLAG;

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    pub fn new(id: u16, flags: u16) -> Self {
        Header {
            id,
            flags,
            ..Header::default()
        }
    }

    pub fn from(cursor: &mut Cursor) -> Result<Self> {
        let id = cursor.take_u16()?;
        let flags = cursor.take_u16()?;
        if flags & OPCODE_MASK != 0 {
            return Err(Error::MalformedPacket("unsupported opcode"));
        }
        Ok(Header {
            id,
            flags,
            question_count: cursor.take_u16()?,
            answer_count: cursor.take_u16()?,
            authority_count: cursor.take_u16()?,
            additional_count: cursor.take_u16()?,
        })
    }

    pub fn write(&self, vec: &mut Vec<u8>) {
        vec.extend_from_slice(&self.id.to_be_bytes());
        vec.extend_from_slice(&self.flags.to_be_bytes());
        vec.extend_from_slice(&self.question_count.to_be_bytes());
        vec.extend_from_slice(&self.answer_count.to_be_bytes());
        vec.extend_from_slice(&self.authority_count.to_be_bytes());
        vec.extend_from_slice(&self.additional_count.to_be_bytes());
    }

    pub fn is_response(&self) -> bool {
        self.flags & QR_FLAG != 0
    }

    pub fn opcode(&self) -> u8 {
        ((self.flags & OPCODE_MASK) >> 11) as u8
    }

    pub fn is_authoritative(&self) -> bool {
        self.flags & AA_FLAG != 0
    }

    pub fn is_truncated(&self) -> bool {
        self.flags & TC_FLAG != 0
    }

    pub fn is_recursion_desired(&self) -> bool {
        self.flags & RD_FLAG != 0
    }

    pub fn rcode(&self) -> u8 {
        (self.flags & RCODE_MASK) as u8
    }
}

#[cfg(test)]
mod tests {
    use crate::cursor::Cursor;
    use crate::protocol::header::{Header, HEADER_LEN, RESPONSE_FLAGS};

    #[test]
    fn should_return_header_when_from_given_valid_bytes() {
        let bytes = [0x12u8, 0x34, 0x84, 0x00, 0, 1, 0, 2, 0, 3, 0, 4];
        let mut cursor = Cursor::form(&bytes);

        let header = Header::from(&mut cursor).unwrap();

        assert_eq!(0x1234, header.id);
        assert!(header.is_response());
        assert!(header.is_authoritative());
        assert!(!header.is_truncated());
        assert_eq!((1, 2, 3, 4), (header.question_count, header.answer_count,
                                  header.authority_count, header.additional_count));
        assert_eq!(HEADER_LEN, cursor.get_current_index())
    }

    #[test]
    fn should_return_error_when_from_given_reserved_opcode_bit() {
        let bytes = [0u8, 0, 0x08, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut cursor = Cursor::form(&bytes);

        let result = Header::from(&mut cursor);

        assert!(result.is_err())
    }

    #[test]
    fn should_return_error_when_from_given_short_header() {
        let bytes = [0u8; 11];
        let mut cursor = Cursor::form(&bytes);

        assert!(Header::from(&mut cursor).is_err())
    }

    #[test]
    fn should_write_12_big_endian_bytes_when_write_given_header() {
        let mut header = Header::new(0, RESPONSE_FLAGS);
        header.answer_count = 1;
        let mut vec = Vec::new();

        header.write(&mut vec);

        assert_eq!(vec![0u8, 0, 0x84, 0, 0, 0, 0, 1, 0, 0, 0, 0], vec)
    }
}
