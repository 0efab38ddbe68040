/// Largest datagram accepted from the multicast group. mDNS caps a message at
/// 9000 bytes unless a jumbo interface is in use.
pub const MAX_DATAGRAM_SIZE: usize = 9000;

/// Receive buffer for a single datagram.
pub struct PacketBuffer {
    buf: Box<[u8; MAX_DATAGRAM_SIZE]>,
    len: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        PacketBuffer {
            buf: Box::new([0u8; MAX_DATAGRAM_SIZE]),
            len: 0,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(MAX_DATAGRAM_SIZE);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PacketBuffer {
    fn default() -> Self {
        PacketBuffer::new()
    }
}
