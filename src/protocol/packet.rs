use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::protocol::header::{Header, HEADER_LEN, QUERY_FLAGS, RESPONSE_FLAGS};
use crate::protocol::name::PointerMode;
use crate::protocol::question::Question;
use crate::protocol::record::ResourceRecord;
use crate::protocol::resource::CLASS_IN;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

/// A whole mDNS message. Decoding either yields every section the header
/// announces or fails; a partial packet is never produced.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DnsPacket {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl DnsPacket {
    pub fn new(id: u16, flags: u16) -> Self {
        DnsPacket {
            header: Header::new(id, flags),
            questions: Vec::new(),
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    /// One-question multicast query.
    pub fn query(name: &str, _type: u16) -> Self {
        let mut packet = DnsPacket::new(0, QUERY_FLAGS);
        packet.questions.push(Question::new(name, _type, CLASS_IN));
        packet.header.question_count = 1;
        packet
    }

    /// Authoritative response carrying `answers`.
    pub fn response(answers: Vec<ResourceRecord>) -> Self {
        let mut packet = DnsPacket::new(0, RESPONSE_FLAGS);
        packet.header.answer_count = answers.len() as u16;
        packet.answers = answers;
        packet
    }

    pub fn decode(buf: &[u8], mode: PointerMode) -> Result<Self> {
        let mut cursor = Cursor::form(buf);
        let header = Header::from(&mut cursor)?;
        let questions = take_all(&mut cursor, header.question_count, "question", |c| Question::from(c, mode))?;
        let answers = take_all(&mut cursor, header.answer_count, "answer", |c| ResourceRecord::from(c, mode))?;
        let authority = take_all(&mut cursor, header.authority_count, "authority", |c| ResourceRecord::from(c, mode))?;
        let additional = take_all(&mut cursor, header.additional_count, "additional", |c| ResourceRecord::from(c, mode))?;
        if cursor.get_current_index() != buf.len() {
            return Err(Error::MalformedPacket("trailing bytes after last record"));
        }
        Ok(DnsPacket {
            header,
            questions,
            answers,
            authority,
            additional,
        })
    }

    /// Answer, authority and additional records in that order.
    pub fn records(&self) -> impl Iterator<Item = &ResourceRecord> {
        self.answers.iter().chain(self.authority.iter()).chain(self.additional.iter())
    }

    pub fn wire_len(&self) -> Result<usize> {
        wire_len(&self.questions, &[&self.answers[..], &self.authority[..], &self.additional[..]])
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self.header.id, self.header.flags, &self.questions,
               [&self.answers[..], &self.authority[..], &self.additional[..]])
    }
}

/// Encodes a response holding only `answers`, without building a packet first.
pub fn encode_answers(flags: u16, answers: &[ResourceRecord]) -> Result<Vec<u8>> {
    let empty: &[ResourceRecord] = &[];
    encode(0, flags, &[], [answers, empty, empty])
}

fn take_all<T, F>(cursor: &mut Cursor<'_>, count: u16, section: &str, mut parse: F) -> Result<Vec<T>>
    where F: FnMut(&mut Cursor<'_>) -> Result<T> {
    let mut items = Vec::new();
    for index in 0..count {
        match parse(cursor) {
            Ok(item) => items.push(item),
            Err(e) => {
                debug!("{} {} of {} failed to parse at offset {}: {}",
                       section, index + 1, count, cursor.get_current_index(), e);
                return Err(e);
            }
        }
    }
    Ok(items)
}

fn wire_len(questions: &[Question], sections: &[&[ResourceRecord]]) -> Result<usize> {
    let mut len = HEADER_LEN;
    for question in questions {
        len += question.wire_len()?;
    }
    for record in sections.iter().flat_map(|s| s.iter()) {
        len += record.wire_len()?;
    }
    Ok(len)
}

fn count(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::InvalidRecord(format!("{} entries do not fit a section", len)))
}

fn encode(id: u16, flags: u16, questions: &[Question], sections: [&[ResourceRecord]; 3]) -> Result<Vec<u8>> {
    let len = wire_len(questions, &sections)?;
    let mut vec = Vec::new();
    vec.try_reserve_exact(len).map_err(|_| Error::Allocation)?;
    let header = Header {
        id,
        flags,
        question_count: count(questions.len())?,
        answer_count: count(sections[0].len())?,
        authority_count: count(sections[1].len())?,
        additional_count: count(sections[2].len())?,
    };
    header.write(&mut vec);
    for question in questions {
        question.write(&mut vec)?;
    }
    for record in sections.iter().flat_map(|s| s.iter()) {
        record.write(&mut vec)?;
    }
    debug_assert_eq!(len, vec.len());
    Ok(vec)
}

impl Display for DnsPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "(id {}, flags {:#06x}, {} questions, {} answers, {} authority, {} additional)",
               self.header.id, self.header.flags, self.questions.len(), self.answers.len(),
               self.authority.len(), self.additional.len())
    }
}
