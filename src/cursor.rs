use crate::error::{Error, Result};

/// Read position over a received datagram. Every read is checked against the
/// datagram length and fails with `MalformedPacket` instead of panicking.
pub struct Cursor<'a> {
    buf: &'a [u8],
    current: usize,
}

impl<'a> Cursor<'a> {
    pub fn form(buf: &'a [u8]) -> Self {
        Cursor {
            buf,
            current: 0,
        }
    }

    pub fn at(&mut self, index: usize) {
        self.current = index;
    }

    pub fn take(&mut self) -> Result<u8> {
        let result = self.peek()?;
        self.current += 1;
        Ok(result)
    }

    pub fn take_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take_slice(N)?);
        Ok(bytes)
    }

    pub fn take_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.take_bytes()?))
    }

    pub fn take_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.take_bytes()?))
    }

    pub fn move_to(&mut self, step: usize) -> Result<()> {
        if step > self.remaining() {
            return Err(Error::MalformedPacket("skip past end of datagram"));
        }
        self.current += step;
        Ok(())
    }

    pub fn peek(&self) -> Result<u8> {
        self.buf
            .get(self.current)
            .copied()
            .ok_or(Error::MalformedPacket("read past end of datagram"))
    }

    pub fn get_current_index(&self) -> usize {
        self.current
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.current)
    }

    pub fn get_buf(&self) -> &'a [u8] {
        self.buf
    }

    pub fn take_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::MalformedPacket("read past end of datagram"));
        }
        let buf = self.buf;
        let result = &buf[self.current..self.current + len];
        self.current += len;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::cursor::Cursor;

    #[test]
    fn should_return_value_and_advance_when_call_take_given_data_left() {
        let bytes = [1u8, 2];
        let mut cursor = Cursor::form(&bytes);

        let result = cursor.take();

        assert_eq!(1, result.unwrap());
        assert_eq!(1, cursor.get_current_index())
    }

    #[test]
    fn should_return_error_when_call_take_given_end_of_buffer() {
        let bytes = [1u8];
        let mut cursor = Cursor::form(&bytes);
        cursor.at(1);

        let result = cursor.take();

        assert!(result.is_err())
    }

    #[test]
    fn should_not_move_when_call_take_slice_given_slice_longer_than_remaining() {
        let bytes = [1u8, 2, 3];
        let mut cursor = Cursor::form(&bytes);
        cursor.at(1);

        let result = cursor.take_slice(3);

        assert!(result.is_err());
        assert_eq!(1, cursor.get_current_index())
    }

    #[test]
    fn should_read_big_endian_when_call_take_u16_and_take_u32() {
        let bytes = [0x12u8, 0x34, 0x00, 0x00, 0x11, 0x94];
        let mut cursor = Cursor::form(&bytes);

        assert_eq!(0x1234, cursor.take_u16().unwrap());
        assert_eq!(4500, cursor.take_u32().unwrap());
        assert_eq!(0, cursor.remaining())
    }
}
