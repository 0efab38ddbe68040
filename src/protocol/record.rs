use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::protocol::name::{decode_name, name_len, wrap_name, PointerMode};
use crate::protocol::resource::{Address, RData, Service, TxtData, CLASS_FLUSH_IN};
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// Name, type, class, ttl and rdlength.
const FIXED_LEN: usize = 10;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResourceRecord {
    pub name: String,
    _type: u16,
    /// Raw class; the top bit is the cache-flush bit.
    pub class: u16,
    /// Seconds; 0 withdraws the record.
    pub ttl: u32,
    rdata: RData,
}

impl ResourceRecord {
    /// A record whose type follows from its rdata.
    pub fn new(name: &str, class: u16, ttl: u32, rdata: RData) -> Self {
        ResourceRecord {
            name: name.to_string(),
            _type: rdata.default_type(),
            class,
            ttl,
            rdata,
        }
    }

    /// A record with an explicit type, e.g. opaque rdata under an unknown type.
    pub fn with_type(name: &str, _type: u16, class: u16, ttl: u32, rdata: RData) -> Result<Self> {
        if !rdata.fits(_type) {
            return Err(Error::InvalidRecord(format!("rdata does not fit type {}", _type)));
        }
        Ok(ResourceRecord {
            name: name.to_string(),
            _type,
            class,
            ttl,
            rdata,
        })
    }

    pub fn address(name: &str, ip: IpAddr, ttl: u32) -> Self {
        let address = match ip {
            IpAddr::V4(ip) => Address::V4(ip),
            IpAddr::V6(ip) => Address::V6(ip),
        };
        ResourceRecord::new(name, CLASS_FLUSH_IN, ttl, RData::Address(address))
    }

    pub fn null(name: &str, data: &[u8], ttl: u32) -> Self {
        ResourceRecord::new(name, CLASS_FLUSH_IN, ttl, RData::Opaque(data.to_vec()))
    }

    pub fn pointer(name: &str, target: &str, ttl: u32) -> Self {
        ResourceRecord::new(name, CLASS_FLUSH_IN, ttl, RData::Name(target.to_string()))
    }

    pub fn text(name: &str, txt: TxtData, ttl: u32) -> Self {
        ResourceRecord::new(name, CLASS_FLUSH_IN, ttl, RData::Text(txt))
    }

    pub fn service(name: &str, port: u16, target: &str, ttl: u32) -> Self {
        ResourceRecord::new(name, CLASS_FLUSH_IN, ttl, RData::Service(Service::new(port, target)))
    }

    pub fn get_type(&self) -> u16 {
        self._type
    }

    pub fn rdata(&self) -> &RData {
        &self.rdata
    }

    pub fn from(cursor: &mut Cursor, mode: PointerMode) -> Result<Self> {
        let (name, len) = decode_name(cursor.get_buf(), cursor.get_current_index(), mode)?;
        cursor.move_to(len)?;
        let _type = cursor.take_u16()?;
        let class = cursor.take_u16()?;
        let ttl = cursor.take_u32()?;
        let data_len = cursor.take_u16()? as usize;
        let start = cursor.get_current_index();
        cursor.take_slice(data_len)?;
        let rdata = RData::decode(_type, &cursor.get_buf()[..start + data_len], start, mode)?;
        Ok(ResourceRecord {
            name,
            _type,
            class,
            ttl,
            rdata,
        })
    }

    pub fn wire_len(&self) -> Result<usize> {
        Ok(name_len(&self.name)? + FIXED_LEN + self.data_len()? as usize)
    }

    fn data_len(&self) -> Result<u16> {
        let len = self.rdata.wire_len()?;
        if len > u16::MAX as usize {
            return Err(Error::InvalidRecord(format!("rdata of {} is {} bytes", self.name, len)));
        }
        Ok(len as u16)
    }

    pub fn write(&self, vec: &mut Vec<u8>) -> Result<()> {
        let data_len = self.data_len()?;
        wrap_name(&self.name, vec)?;
        vec.extend_from_slice(&self._type.to_be_bytes());
        vec.extend_from_slice(&self.class.to_be_bytes());
        vec.extend_from_slice(&self.ttl.to_be_bytes());
        vec.extend_from_slice(&data_len.to_be_bytes());
        self.rdata.write(vec)
    }

    /// Same name, type, class and rdata; the ttl is ignored.
    pub fn same_data(&self, other: &ResourceRecord) -> bool {
        self._type == other._type
            && self.class == other.class
            && self.name == other.name
            && self.rdata == other.rdata
    }
}

impl Display for ResourceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, type {}, ttl {})", self.name, self._type, self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use crate::cursor::Cursor;
    use crate::protocol::name::PointerMode;
    use crate::protocol::record::ResourceRecord;
    use crate::protocol::resource::{RData, TxtData, TYPE_A, TYPE_NULL, TYPE_PTR};
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    fn round_trip(record: &ResourceRecord) -> ResourceRecord {
        let mut vec = Vec::new();
        record.write(&mut vec).unwrap();
        assert_eq!(record.wire_len().unwrap(), vec.len());
        let mut cursor = Cursor::form(&vec);
        let decoded = ResourceRecord::from(&mut cursor, PointerMode::Full).unwrap();
        assert_eq!(vec.len(), cursor.get_current_index());
        let mut again = Vec::new();
        decoded.write(&mut again).unwrap();
        assert_eq!(vec, again);
        decoded
    }

    #[test]
    fn should_round_trip_when_write_and_from_given_every_supported_type() {
        let mut txt = TxtData::new();
        txt.insert("txtvers", Some("1"));
        txt.insert("status", Some("avail"));
        let records = vec![
            ResourceRecord::address("host.local", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 4500),
            ResourceRecord::address("host.local", IpAddr::V6(Ipv6Addr::LOCALHOST), 4500),
            ResourceRecord::null("alice._presence._tcp.local", &[0x89, b'P', b'N', b'G'], 4500),
            ResourceRecord::null("alice._presence._tcp.local", &[], 4500),
            ResourceRecord::pointer("_presence._tcp.local", "alice._presence._tcp.local", 0),
            ResourceRecord::text("alice._presence._tcp.local", txt, 4500),
            ResourceRecord::service("alice._presence._tcp.local", 5298, "host.local", 4500),
        ];

        for record in records.iter() {
            assert_eq!(record, &round_trip(record));
        }
    }

    #[test]
    fn should_write_same_bytes_when_from_then_write_given_txt_with_binary_value() {
        let mut vec = vec![1u8, b'k', 0, 0, 16, 0, 1, 0, 0, 0x11, 0x94, 0, 4];
        vec.extend(&[3, b'k', b'=', 0xFF]);
        let mut cursor = Cursor::form(&vec);

        let record = ResourceRecord::from(&mut cursor, PointerMode::Full).unwrap();
        let mut again = Vec::new();
        record.write(&mut again).unwrap();

        assert_eq!(vec, again)
    }

    #[test]
    fn should_keep_ttl_zero_when_round_trip_given_goodbye_record() {
        let record = ResourceRecord::pointer("_presence._tcp.local", "bob._presence._tcp.local", 0);

        assert_eq!(0, round_trip(&record).ttl)
    }

    #[test]
    fn should_return_error_when_from_given_rdlength_past_datagram_end() {
        let mut vec = Vec::new();
        ResourceRecord::null("a", &[1, 2, 3], 1).write(&mut vec).unwrap();
        vec.truncate(vec.len() - 1);
        let mut cursor = Cursor::form(&vec);

        assert!(ResourceRecord::from(&mut cursor, PointerMode::Full).is_err())
    }

    #[test]
    fn should_return_error_when_from_given_a_record_with_wrong_rdlength() {
        let bytes = [1u8, b'a', 0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 3, 10, 0, 0];
        let mut cursor = Cursor::form(&bytes);

        assert!(ResourceRecord::from(&mut cursor, PointerMode::Full).is_err())
    }

    #[test]
    fn should_return_error_when_with_type_given_mismatched_rdata() {
        let result = ResourceRecord::with_type("a", TYPE_A, 1, 1, RData::Name("b".to_string()));

        assert!(result.is_err());
        assert!(ResourceRecord::with_type("a", TYPE_PTR, 1, 1, RData::Name("b".to_string())).is_ok())
    }

    #[test]
    fn should_ignore_ttl_when_call_same_data() {
        let first = ResourceRecord::null("a", &[1], 10);
        let mut second = first.clone();
        second.ttl = 0;

        assert!(first.same_data(&second));
        assert_eq!(TYPE_NULL, second.get_type())
    }
}
