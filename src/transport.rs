use crate::buffer::PacketBuffer;
use crate::cache::RecordCache;
use crate::config::Config;
use crate::error::Result;
use crate::protocol::resource::TxtData;
use crate::protocol::{encode_answers, DnsPacket, PointerMode, ResourceRecord, RESPONSE_FLAGS};
use crate::socket::{group_addr, open_multicast};
use crate::system::get_now;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc::Receiver;
use tokio::time::{interval, Duration};

/// Gets every packet that decoded cleanly, after its records reached the
/// cache and its questions were answered.
#[async_trait]
pub trait PacketListener: Send + Sync {
    async fn on_packet(&self, packet: &DnsPacket, src: SocketAddr);
}

pub struct MdnsTransport {
    socket: Arc<UdpSocket>,
    cache: Arc<RecordCache>,
    target: SocketAddr,
    mode: PointerMode,
    record_ttl: u32,
    sweep_interval: Duration,
}

impl MdnsTransport {
    /// Joins the multicast group described by `config`.
    pub fn establish(config: &Config, cache: Arc<RecordCache>) -> Result<Self> {
        let socket = open_multicast(config)?;
        info!("listening for mDNS on {}", group_addr(config));
        Ok(MdnsTransport::with_socket(socket, group_addr(config), cache, config))
    }

    /// Sends everything to `target` over an already bound socket.
    pub fn with_socket(socket: UdpSocket, target: SocketAddr, cache: Arc<RecordCache>, config: &Config) -> Self {
        MdnsTransport {
            socket: Arc::new(socket),
            cache,
            target,
            mode: config.pointer_mode(),
            record_ttl: config.record_ttl,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
        }
    }

    pub fn get_cache(&self) -> &Arc<RecordCache> {
        &self.cache
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    pub async fn send_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.socket.send_to(bytes, self.target).await?;
        Ok(())
    }

    pub async fn send_packet(&self, packet: &DnsPacket) -> Result<()> {
        self.send_bytes(&packet.to_bytes()?).await
    }

    pub async fn read(&self) -> Result<(PacketBuffer, SocketAddr)> {
        let mut buffer = PacketBuffer::new();
        let (len, src) = self.socket.recv_from(buffer.as_mut_slice()).await?;
        buffer.set_len(len);
        Ok((buffer, src))
    }

    /// Decodes one datagram, stores its records, and sends a response for
    /// each cached record matching one of its questions. Malformed input is
    /// logged and dropped.
    pub async fn handle_datagram(&self, bytes: &[u8]) -> Option<DnsPacket> {
        let packet = match DnsPacket::decode(bytes, self.mode) {
            Ok(packet) => packet,
            Err(e) => {
                debug!("dropping datagram of {} bytes: {}", bytes.len(), e);
                return None;
            }
        };
        packet.records().for_each(|record| {
            self.cache.ingest(record);
        });
        let responses: Vec<Vec<u8>> = packet.questions.iter()
            .flat_map(|question| self.cache.respond(question))
            .collect();
        // one at a time so peers see the answers in cache order
        for bytes in responses.iter() {
            if let Err(e) = self.send_bytes(bytes).await {
                error!("failed to send response: {}", e);
            }
        }
        Some(packet)
    }

    /// Asks the link for records of `_type` under `name`.
    pub async fn query(&self, name: &str, _type: u16) -> Result<()> {
        self.send_packet(&DnsPacket::query(name, _type)).await
    }

    /// Announces `record` and keeps it in the cache so later questions for it
    /// are answered. A ttl of 0 withdraws it instead.
    pub async fn advertise(&self, record: ResourceRecord) -> Result<()> {
        let bytes = encode_answers(RESPONSE_FLAGS, std::slice::from_ref(&record))?;
        if record.ttl == 0 {
            let withdrawn = self.cache.withdraw_local(&record);
            debug!("goodbye for {} withdrew {} local record(s)", record, withdrawn);
        } else {
            self.cache.replace_local(record);
        }
        self.send_bytes(&bytes).await
    }

    pub async fn advertise_a(&self, name: &str, ip: Ipv4Addr) -> Result<()> {
        self.advertise(ResourceRecord::address(name, IpAddr::V4(ip), self.record_ttl)).await
    }

    pub async fn advertise_aaaa(&self, name: &str, ip: Ipv6Addr) -> Result<()> {
        self.advertise(ResourceRecord::address(name, IpAddr::V6(ip), self.record_ttl)).await
    }

    pub async fn advertise_null(&self, name: &str, data: &[u8]) -> Result<()> {
        self.advertise(ResourceRecord::null(name, data, self.record_ttl)).await
    }

    pub async fn advertise_ptr(&self, name: &str, target: &str) -> Result<()> {
        self.advertise_ptr_with_ttl(name, target, self.record_ttl).await
    }

    pub async fn advertise_ptr_with_ttl(&self, name: &str, target: &str, ttl: u32) -> Result<()> {
        self.advertise(ResourceRecord::pointer(name, target, ttl)).await
    }

    pub async fn advertise_srv(&self, name: &str, port: u16, target: &str) -> Result<()> {
        self.advertise(ResourceRecord::service(name, port, target, self.record_ttl)).await
    }

    pub async fn advertise_txt(&self, name: &str, txt: &TxtData) -> Result<()> {
        self.advertise(ResourceRecord::text(name, txt.clone(), self.record_ttl)).await
    }

    /// Receives until `shutdown` fires or its sender is dropped, sweeping
    /// expired records on every tick.
    pub async fn serve(&self, listener: Option<Arc<dyn PacketListener>>, mut shutdown: Receiver<()>) {
        let mut ticker = interval(self.sweep_interval);
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("mDNS transport shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let expired = self.cache.sweep(get_now());
                    if expired > 0 {
                        debug!("swept {} expired record(s)", expired);
                    }
                }
                received = self.read() => match received {
                    Ok((buffer, src)) => {
                        if let Some(packet) = self.handle_datagram(buffer.as_slice()).await {
                            if let Some(listener) = &listener {
                                listener.on_packet(&packet, src).await;
                            }
                        }
                    }
                    Err(e) => error!("error occur here recv {}", e),
                }
            }
        }
    }

    /// Forgets every record, advertised ones included.
    pub fn close(&self) {
        self.cache.remove_all();
    }
}
