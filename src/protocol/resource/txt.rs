use crate::error::{Error, Result};

const MAX_ENTRY_LEN: usize = 255;

/// One `name[=value]` entry of a TXT record. A missing value is a bare flag.
/// Values are raw bytes; only the name has to be text.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TxtNode {
    pub name: String,
    pub value: Option<Vec<u8>>,
}

impl TxtNode {
    pub fn new(name: &str, value: Option<&str>) -> Self {
        TxtNode::with_bytes(name, value.map(str::as_bytes))
    }

    pub fn with_bytes(name: &str, value: Option<&[u8]>) -> Self {
        TxtNode {
            name: name.to_string(),
            value: value.map(|v| v.to_vec()),
        }
    }

    /// The value when it is valid UTF-8.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref().and_then(|v| std::str::from_utf8(v).ok())
    }

    fn len(&self) -> usize {
        self.name.len() + self.value.as_ref().map(|v| v.len() + 1).unwrap_or(0)
    }

    /// Splits an entry on its first `=`. Entries without a name, or whose
    /// name is not UTF-8, are dropped.
    fn parse(entry: &[u8]) -> Option<Self> {
        let (name, value) = match entry.iter().position(|b| *b == b'=') {
            Some(index) => (&entry[..index], Some(&entry[index + 1..])),
            None => (entry, None),
        };
        if name.is_empty() {
            return None;
        }
        let name = std::str::from_utf8(name).ok()?;
        Some(TxtNode {
            name: name.to_ascii_lowercase(),
            value: value.map(|v| v.to_vec()),
        })
    }
}

/// Ordered TXT entries, unique by case-insensitive name.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct TxtData {
    nodes: Vec<TxtNode>,
}

impl TxtData {
    pub fn new() -> Self {
        TxtData::default()
    }

    pub fn decode(rdata: &[u8]) -> Result<Self> {
        let mut data = TxtData::new();
        let mut index = 0;
        while index < rdata.len() {
            let entry_len = rdata[index] as usize;
            let start = index + 1;
            let entry = rdata
                .get(start..start + entry_len)
                .ok_or(Error::MalformedPacket("txt entry runs past rdata"))?;
            match TxtNode::parse(entry) {
                Some(node) => {
                    data.push(node);
                }
                None => {
                    debug!("dropping txt entry without a valid name: {:?}", String::from_utf8_lossy(entry));
                }
            }
            index = start + entry_len;
        }
        Ok(data)
    }

    /// Adds the node unless one with the same name exists. Returns whether it was added.
    pub fn insert(&mut self, name: &str, value: Option<&str>) -> bool {
        self.push(TxtNode::new(name, value))
    }

    fn push(&mut self, node: TxtNode) -> bool {
        if self.find(&node.name).is_some() {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Sets the value of `name`, overwriting any earlier one in place.
    pub fn replace(&mut self, name: &str, value: Option<&str>) {
        self.replace_bytes(name, value.map(str::as_bytes))
    }

    pub fn replace_bytes(&mut self, name: &str, value: Option<&[u8]>) {
        match self.nodes.iter_mut().find(|n| n.name.eq_ignore_ascii_case(name)) {
            Some(node) => node.value = value.map(|v| v.to_vec()),
            None => self.nodes.push(TxtNode::with_bytes(name, value)),
        }
    }

    pub fn find(&self, name: &str) -> Option<&TxtNode> {
        self.nodes.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<TxtNode> {
        let index = self.nodes.iter().position(|n| n.name.eq_ignore_ascii_case(name))?;
        Some(self.nodes.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TxtNode> {
        self.nodes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn wire_len(&self) -> Result<usize> {
        let mut len = 0;
        for node in &self.nodes {
            if node.len() > MAX_ENTRY_LEN {
                return Err(Error::InvalidRecord(format!("txt entry {} longer than 255 bytes", node.name)));
            }
            len += 1 + node.len();
        }
        Ok(len)
    }

    pub fn write(&self, vec: &mut Vec<u8>) -> Result<()> {
        self.wire_len()?;
        for node in &self.nodes {
            vec.push(node.len() as u8);
            vec.extend_from_slice(node.name.as_bytes());
            if let Some(value) = &node.value {
                vec.push(b'=');
                vec.extend_from_slice(value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::resource::txt::{TxtData, TxtNode};

    fn presence_bytes() -> Vec<u8> {
        let mut vec = vec![8u8];
        vec.extend(b"1st=Mark");
        vec.push(6);
        vec.extend(b"status");
        vec
    }

    #[test]
    fn should_return_value_and_flag_nodes_when_decode_given_presence_entries() {
        let data = TxtData::decode(&presence_bytes()).unwrap();

        let nodes: Vec<&TxtNode> = data.iter().collect();
        assert_eq!(vec![&TxtNode::new("1st", Some("Mark")), &TxtNode::new("status", None)], nodes)
    }

    #[test]
    fn should_write_16_bytes_when_write_given_value_and_flag_nodes() {
        let mut data = TxtData::new();
        data.insert("1st", Some("Mark"));
        data.insert("status", None);
        let mut vec = Vec::new();

        data.write(&mut vec).unwrap();

        assert_eq!(16, vec.len());
        assert_eq!(16, data.wire_len().unwrap());
        assert_eq!(presence_bytes(), vec)
    }

    #[test]
    fn should_lowercase_name_and_keep_value_case_when_decode_given_mixed_case() {
        let mut bytes = vec![12u8];
        bytes.extend(b"AIM=SomeOne=");

        let data = TxtData::decode(&bytes).unwrap();

        assert_eq!(Some(&TxtNode::new("aim", Some("SomeOne="))), data.find("AIM"))
    }

    #[test]
    fn should_drop_entry_when_decode_given_entry_starting_with_equals() {
        let mut bytes = vec![4u8];
        bytes.extend(b"=bad");
        bytes.push(4);
        bytes.extend(b"ok=1");

        let data = TxtData::decode(&bytes).unwrap();

        assert_eq!(1, data.len());
        assert!(data.find("ok").is_some())
    }

    #[test]
    fn should_keep_first_occurrence_when_decode_given_duplicate_names() {
        let mut bytes = vec![5u8];
        bytes.extend(b"msg=a");
        bytes.push(5);
        bytes.extend(b"MSG=b");

        let data = TxtData::decode(&bytes).unwrap();

        assert_eq!(1, data.len());
        assert_eq!(Some("a"), data.find("msg").unwrap().value_str())
    }

    #[test]
    fn should_overwrite_value_when_replace_given_existing_name() {
        let mut data = TxtData::new();
        data.insert("status", Some("avail"));

        let inserted = data.insert("status", Some("away"));
        data.replace("status", Some("dnd"));

        assert!(!inserted);
        assert_eq!(1, data.len());
        assert_eq!(Some("dnd"), data.find("status").unwrap().value_str())
    }

    #[test]
    fn should_keep_raw_bytes_when_decode_then_write_given_binary_value() {
        let bytes = [3u8, b'k', b'=', 0xFF, 4, b'i', b'=', 0x00, 0xC0];

        let data = TxtData::decode(&bytes).unwrap();
        let mut vec = Vec::new();
        data.write(&mut vec).unwrap();

        assert_eq!(Some(&[0xFFu8][..]), data.find("K").unwrap().value.as_deref());
        assert_eq!(None, data.find("k").unwrap().value_str());
        assert_eq!(bytes.to_vec(), vec);
        assert_eq!(bytes.len(), data.wire_len().unwrap())
    }

    #[test]
    fn should_overwrite_with_bytes_when_replace_bytes_given_existing_name() {
        let mut data = TxtData::new();
        data.insert("icon", Some("none"));

        data.replace_bytes("ICON", Some(&[0x89, b'P', b'N', b'G']));

        assert_eq!(1, data.len());
        assert_eq!(Some(&[0x89u8, b'P', b'N', b'G'][..]), data.find("icon").unwrap().value.as_deref())
    }

    #[test]
    fn should_drop_entry_when_decode_given_name_that_is_not_utf8() {
        let bytes = [3u8, 0xFF, b'=', b'1', 3, b'o', b'k', b'!'];

        let data = TxtData::decode(&bytes).unwrap();

        assert_eq!(1, data.len());
        assert!(data.find("ok!").is_some())
    }

    #[test]
    fn should_return_error_when_decode_given_entry_longer_than_rdata() {
        let bytes = [5u8, b'a', b'b'];

        assert!(TxtData::decode(&bytes).is_err())
    }

    #[test]
    fn should_return_empty_when_decode_given_empty_rdata_or_empty_entry() {
        assert!(TxtData::decode(&[]).unwrap().is_empty());
        assert!(TxtData::decode(&[0u8]).unwrap().is_empty())
    }

    #[test]
    fn should_return_error_when_write_given_entry_over_255_bytes() {
        let mut data = TxtData::new();
        let value = "v".repeat(255);
        data.insert("k", Some(&value));

        assert!(data.write(&mut Vec::new()).is_err())
    }
}
