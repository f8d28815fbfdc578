use std::net::UdpSocket;

pub use webharness_capture::stamp::{date_stamp, datetime_stamp, display_stamp};

/// Best-effort LAN address of this host, used to build evidence links
/// when no base URL is configured. Falls back to loopback when the
/// routing probe fails (e.g. no network at all).
pub fn host_ip() -> String {
    fn probe() -> std::io::Result<String> {
        // Connecting a UDP socket selects a local address without
        // sending any packet.
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip().to_string())
    }
    probe().unwrap_or_else(|_| "127.0.0.1".to_string())
}
