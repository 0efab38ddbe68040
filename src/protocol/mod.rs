mod header;
mod name;
mod packet;
mod question;
mod record;
pub mod resource;

pub use header::{Header, QUERY_FLAGS, RESPONSE_FLAGS};
pub use name::{decode_name, name_len, name_segment_len, wrap_name, PointerMode};
pub use packet::{encode_answers, DnsPacket};
pub use question::Question;
pub use record::ResourceRecord;
