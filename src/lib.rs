#[macro_use]
extern crate log;

pub mod buffer;
pub mod cache;
pub mod config;
pub mod cursor;
pub mod error;
pub mod protocol;
pub mod socket;
pub mod system;
pub mod transport;

pub use cache::RecordCache;
pub use config::Config;
pub use error::{Error, Result};
pub use protocol::{DnsPacket, PointerMode, Question, ResourceRecord};
pub use transport::{MdnsTransport, PacketListener};
