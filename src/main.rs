use rendezvous_mdns::config::init_from_toml;
use rendezvous_mdns::{MdnsTransport, RecordCache};
use simple_logger::SimpleLogger;
use std::sync::Arc;

#[macro_use]
extern crate log;

//rendezvous-mdns [config.toml]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1);
    let config = init_from_toml(path.as_deref()).await?;
    SimpleLogger::new().with_level(config.get_log_level()?).init()?;
    info!("starting rendezvous-mdns on port {}", config.port);

    let cache = Arc::new(RecordCache::from(&config));
    let transport = MdnsTransport::establish(&config, cache)?;
    let (sender, receiver) = tokio::sync::mpsc::channel(1);
    setup_exit_process_task(sender);
    transport.serve(None, receiver).await;
    transport.close();
    Ok(())
}

fn setup_exit_process_task(sender: tokio::sync::mpsc::Sender<()>) {
    //wait for ctrl_c, then stop the receive loop
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl_c event: {}", e);
        }
        if sender.send(()).await.is_err() {
            debug!("receive loop already stopped");
        }
    });
}
