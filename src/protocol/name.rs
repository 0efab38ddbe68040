use crate::error::{Error, Result};

const C_FACTOR: u8 = 0xC0;
const DC_FACTOR: u16 = 0x3FFF;
pub const MAX_LABEL_LEN: usize = 63;
/// Upper bound of an expanded name on the wire, length bytes and root included.
pub const MAX_NAME_LEN: usize = 255;

/// How the offset of a compression pointer is read.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PointerMode {
    /// The low 14 bits of the two pointer bytes.
    Full,
    /// Only the second pointer byte, which limits targets to the first 256
    /// bytes of the datagram. Matches what older Rendezvous peers emit.
    Legacy,
}

impl Default for PointerMode {
    fn default() -> Self {
        PointerMode::Full
    }
}

/// Decodes the name starting at `offset`, following compression pointers.
///
/// Returns the dotted name and the number of bytes the name occupies at
/// `offset` itself, which is where parsing of the following fields resumes.
/// Every pointer must target an offset strictly before the label run it was
/// found in, so the jumps decrease monotonically and always terminate.
pub fn decode_name(buf: &[u8], offset: usize, mode: PointerMode) -> Result<(String, usize)> {
    let segment_len = name_segment_len(buf, offset)?;
    let mut name = String::new();
    let mut pos = offset;
    let mut run_start = offset;
    let mut wire_len = 0usize;
    loop {
        let seg_len = *buf.get(pos).ok_or(Error::MalformedPacket("name runs past end of datagram"))?;
        match seg_len & C_FACTOR {
            0x00 => {
                if seg_len == 0 {
                    break;
                }
                let start = pos + 1;
                let end = start + seg_len as usize;
                let label = buf
                    .get(start..end)
                    .ok_or(Error::MalformedPacket("label runs past end of datagram"))?;
                wire_len += 1 + label.len();
                if wire_len + 1 > MAX_NAME_LEN {
                    return Err(Error::MalformedPacket("name longer than 255 bytes"));
                }
                if !name.is_empty() {
                    name.push('.');
                }
                push_label(&mut name, label);
                pos = end;
            }
            C_FACTOR => {
                let low = *buf.get(pos + 1).ok_or(Error::MalformedPacket("truncated compression pointer"))?;
                let target = match mode {
                    PointerMode::Full => (u16::from_be_bytes([seg_len, low]) & DC_FACTOR) as usize,
                    PointerMode::Legacy => low as usize,
                };
                if target >= run_start {
                    return Err(Error::MalformedPacket("compression pointer does not point backwards"));
                }
                pos = target;
                run_start = target;
            }
            _ => return Err(Error::MalformedPacket("reserved label type")),
        }
    }
    Ok((name, segment_len))
}

/// Appends `label` in dotted form. `.` and `\` inside it are escaped with a
/// backslash, and a label that is not UTF-8 has every byte from 0x80 up
/// written as `\DDD`, so `labels` gets the exact wire bytes back.
fn push_label(name: &mut String, label: &[u8]) {
    match std::str::from_utf8(label) {
        Ok(text) => text.chars().for_each(|c| {
            if c == '.' || c == '\\' {
                name.push('\\');
            }
            name.push(c);
        }),
        Err(_) => label.iter().for_each(|b| match *b {
            b'.' | b'\\' => {
                name.push('\\');
                name.push(*b as char);
            }
            0x80..=0xFF => name.push_str(&format!("\\{:03}", b)),
            _ => name.push(*b as char),
        }),
    }
}

/// Bytes the name at `offset` occupies in place, without following pointers.
pub fn name_segment_len(buf: &[u8], offset: usize) -> Result<usize> {
    let mut pos = offset;
    loop {
        let seg_len = *buf.get(pos).ok_or(Error::MalformedPacket("name runs past end of datagram"))?;
        match seg_len & C_FACTOR {
            0x00 if seg_len == 0 => return Ok(pos + 1 - offset),
            0x00 => {
                pos += 1 + seg_len as usize;
                if pos > buf.len() {
                    return Err(Error::MalformedPacket("label runs past end of datagram"));
                }
            }
            C_FACTOR => {
                if pos + 2 > buf.len() {
                    return Err(Error::MalformedPacket("truncated compression pointer"));
                }
                return Ok(pos + 2 - offset);
            }
            _ => return Err(Error::MalformedPacket("reserved label type")),
        }
    }
}

/// Splits a dotted name into wire labels, undoing the escapes `push_label`
/// writes. A trailing dot is allowed; `""` and `"."` are the root.
fn labels(name: &str) -> Result<Vec<Vec<u8>>> {
    let invalid = || Error::InvalidName(name.to_string());
    if name == "." {
        return Ok(Vec::new());
    }
    let bytes = name.as_bytes();
    let mut labels = Vec::new();
    let mut label = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => {
                let digits = bytes
                    .get(index + 1..index + 4)
                    .filter(|d| d.iter().all(u8::is_ascii_digit));
                match digits {
                    Some(digits) => {
                        let value = digits.iter().fold(0u16, |acc, d| acc * 10 + (d - b'0') as u16);
                        if value > 0xFF {
                            return Err(invalid());
                        }
                        label.push(value as u8);
                        index += 4;
                    }
                    None => {
                        label.push(*bytes.get(index + 1).ok_or_else(invalid)?);
                        index += 2;
                    }
                }
            }
            b'.' => {
                if label.is_empty() {
                    return Err(invalid());
                }
                labels.push(std::mem::take(&mut label));
                index += 1;
            }
            b => {
                label.push(b);
                index += 1;
            }
        }
    }
    if !label.is_empty() {
        labels.push(label);
    }
    Ok(labels)
}

/// Wire length of `name` written uncompressed.
pub fn name_len(name: &str) -> Result<usize> {
    let mut len = 1;
    for label in labels(name)? {
        if label.len() > MAX_LABEL_LEN {
            return Err(Error::InvalidName(name.to_string()));
        }
        len += 1 + label.len();
    }
    if len > MAX_NAME_LEN {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(len)
}

/// Writes `name` as uncompressed length-prefixed labels.
pub fn wrap_name(name: &str, vec: &mut Vec<u8>) -> Result<()> {
    name_len(name)?;
    for label in labels(name)? {
        vec.push(label.len() as u8);
        vec.extend_from_slice(&label);
    }
    vec.push(0);
    Ok(())
}
