//! Serial port handling
//!
//! Enumeration of attached ports and low-level port opening.

use serialport::{SerialPort, SerialPortInfo, SerialPortType};
use std::collections::HashSet;
#[cfg(target_os = "linux")]
use std::fs;
use std::time::Duration;

use super::LinkError;

/// Read timeout applied to freshly opened ports. Short so that availability
/// driven reads never stall the caller's thread.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Information about an available serial port
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port name (e.g., "/dev/ttyUSB0" or "COM3")
    pub name: String,

    /// USB vendor ID (if USB device)
    pub vid: Option<u16>,

    /// USB product ID (if USB device)
    pub pid: Option<u16>,

    /// Manufacturer name (if available)
    pub manufacturer: Option<String>,

    /// Product name (if available)
    pub product: Option<String>,

    /// Serial number (if available)
    pub serial_number: Option<String>,
}

impl PortInfo {
    fn named(name: String) -> Self {
        Self {
            name,
            vid: None,
            pid: None,
            manufacturer: None,
            product: None,
            serial_number: None,
        }
    }
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let mut port = PortInfo::named(info.port_name);
        if let SerialPortType::UsbPort(usb) = info.port_type {
            port.vid = Some(usb.vid);
            port.pid = Some(usb.pid);
            port.manufacturer = usb.manufacturer;
            port.product = usb.product;
            port.serial_number = usb.serial_number;
        }
        port
    }
}

/// Sort rank for a port name: ttyACM* first (numeric suffix order), then
/// ttyUSB*, then everything else alphabetically.
fn sort_rank(name: &str) -> (u8, usize, String) {
    let base = name.rsplit('/').next().unwrap_or(name);
    for (rank, prefix) in [(0u8, "ttyACM"), (1u8, "ttyUSB")] {
        if let Some(suffix) = base.strip_prefix(prefix) {
            let num = suffix.parse::<usize>().unwrap_or(usize::MAX);
            return (rank, num, base.to_string());
        }
    }
    (2, 0, base.to_string())
}

/// List all attached serial ports in a deterministic order.
///
/// On Linux this also scans `/dev` for `ttyACM*`/`ttyUSB*` nodes the
/// enumeration API occasionally misses.
pub fn list_ports() -> Vec<PortInfo> {
    let mut seen = HashSet::new();
    let mut ports = Vec::new();

    for info in serialport::available_ports().unwrap_or_default() {
        let port = PortInfo::from(info);
        if seen.insert(port.name.clone()) {
            ports.push(port);
        }
    }

    #[cfg(target_os = "linux")]
    if let Ok(entries) = fs::read_dir("/dev") {
        for entry in entries.flatten() {
            if let Some(fname) = entry.file_name().to_str() {
                if fname.starts_with("ttyACM") || fname.starts_with("ttyUSB") {
                    let full = format!("/dev/{}", fname);
                    if seen.insert(full.clone()) {
                        ports.push(PortInfo::named(full));
                    }
                }
            }
        }
    }

    ports.sort_by_key(|p| sort_rank(&p.name));
    ports
}

/// Open a serial port at the given bit rate, configured 8N1 with no flow
/// control.
pub fn open_port(name: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>, LinkError> {
    serialport::new(name, baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|e| LinkError::Serial(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_ports() {
        // Enumeration must not panic on any host
        let ports = list_ports();
        for port in &ports {
            println!("Found port: {} - {:?}", port.name, port.product);
        }
    }

    #[test]
    fn test_port_sorting() {
        let names = [
            "/dev/ttyUSB1",
            "/dev/ttyACM1",
            "/dev/ttyUSB0",
            "/dev/ttyACM0",
            "/dev/someport",
            "/dev/ttyACM10",
        ];
        let mut ports: Vec<PortInfo> = names
            .iter()
            .map(|n| PortInfo::named(n.to_string()))
            .collect();

        ports.sort_by_key(|p| sort_rank(&p.name));
        let ordered: Vec<String> = ports.into_iter().map(|p| p.name).collect();

        assert_eq!(
            ordered,
            vec![
                "/dev/ttyACM0",
                "/dev/ttyACM1",
                "/dev/ttyACM10",
                "/dev/ttyUSB0",
                "/dev/ttyUSB1",
                "/dev/someport",
            ]
        );
    }

    #[test]
    fn test_open_missing_port_fails() {
        let result = open_port("/dev/does-not-exist-uartlink", 115200);
        assert!(matches!(result, Err(LinkError::Serial(_))));
    }
}
