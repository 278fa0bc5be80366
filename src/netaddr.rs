// netaddr.rs (linux first, any platform local-ip-address supports)
use std::net::IpAddr;

use local_ip_address::list_afinet_netifas;
use log::debug;

pub const NOT_CONNECTED: &str = "Not connected";

/// Interfaces tried first, in order.
const PREFERRED_IFACES: [&str; 2] = ["wlan0", "eth0"];

/// Pick the address to show from (interface, address) pairs.
///
/// wlan0 wins over eth0, then any other non-loopback IPv4.
pub fn pick_address(ifaces: &[(String, IpAddr)]) -> Option<IpAddr> {
    let v4 = |ip: &IpAddr| ip.is_ipv4() && !ip.is_loopback();
    for name in PREFERRED_IFACES {
        if let Some((_, ip)) = ifaces.iter().find(|(n, ip)| n == name && v4(ip)) {
            return Some(*ip);
        }
    }
    ifaces.iter().map(|(_, ip)| *ip).find(|ip| v4(ip))
}

/// Address line content for the standby view.
pub fn local_address() -> String {
    match list_afinet_netifas() {
        Ok(ifaces) => pick_address(&ifaces)
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| NOT_CONNECTED.to_string()),
        Err(e) => {
            debug!("interface scan failed: {}", e);
            NOT_CONNECTED.to_string()
        }
    }
}
