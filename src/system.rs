#[cfg(not(test))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch.
#[cfg(not(test))]
pub fn get_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
pub fn get_now() -> u128 {
    TIME.with(|t| t.borrow().get_timestamp())
}

#[cfg(test)]
thread_local! {
    pub static TIME: std::cell::RefCell<Timer> = std::cell::RefCell::new(Timer { timestamp: 0 });
}

#[cfg(test)]
pub struct Timer {
    timestamp: u128,
}

#[cfg(test)]
impl Timer {
    pub fn set_timestamp(&mut self, timestamp: u128) {
        self.timestamp = timestamp;
    }

    pub fn get_timestamp(&self) -> u128 {
        self.timestamp
    }
}
