use std::{error, fmt, io};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The output buffer for an encode could not be reserved.
    Allocation,
    /// The datagram violates the wire format; the whole packet is dropped.
    MalformedPacket(&'static str),
    /// Bind, join, send or receive failed on the multicast socket.
    Socket(io::Error),
    /// A name that cannot be written as length-prefixed labels.
    InvalidName(String),
    /// Rdata that does not fit its length field.
    InvalidRecord(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Allocation => write!(f, "failed to allocate packet buffer"),
            Error::MalformedPacket(reason) => write!(f, "malformed packet: {}", reason),
            Error::Socket(e) => write!(f, "socket error: {}", e),
            Error::InvalidName(name) => write!(f, "invalid domain name: {:?}", name),
            Error::InvalidRecord(reason) => write!(f, "invalid record: {}", reason),
            Error::Config(reason) => write!(f, "config error: {}", reason),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Socket(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Socket(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl Error {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedPacket(_))
    }
}
