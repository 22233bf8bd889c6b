//! `Ports` implementation backed by the `serialport` crate.

use std::io::Write;
use std::time::Duration;

use planter_traits::{BoxError, LinkPort, PortInfo, Ports};
use serialport::{SerialPort, SerialPortType};

/// System serial backend. Descriptors are composed from the USB product
/// string plus a bus-type marker so that the core's substring discovery rule
/// ("CP2102" and "USB") works the same way it did against pyserial-style
/// descriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPorts;

impl SystemPorts {
    pub fn new() -> Self {
        Self
    }
}

fn describe(info: &serialport::SerialPortInfo) -> String {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("unknown");
            let manufacturer = usb.manufacturer.as_deref().unwrap_or("");
            format!("{product} {manufacturer} [USB]")
        }
        SerialPortType::PciPort => "[PCI]".to_string(),
        SerialPortType::BluetoothPort => "[Bluetooth]".to_string(),
        SerialPortType::Unknown => String::new(),
    }
}

struct SystemLine {
    port: Box<dyn SerialPort>,
}

impl LinkPort for SystemLine {
    fn write_line(&mut self, line: &str) -> Result<(), BoxError> {
        self.port.write_all(line.as_bytes())?;
        self.port.flush()?;
        Ok(())
    }
}

impl Ports for SystemPorts {
    fn enumerate(&self) -> Vec<PortInfo> {
        match serialport::available_ports() {
            Ok(ports) => ports
                .iter()
                .map(|p| PortInfo::new(p.port_name.clone(), describe(p)))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "port enumeration failed");
                Vec::new()
            }
        }
    }

    fn open(
        &self,
        name: &str,
        baud: u32,
        read_timeout: Duration,
    ) -> Result<Box<dyn LinkPort + Send>, BoxError> {
        let port = serialport::new(name, baud).timeout(read_timeout).open()?;
        Ok(Box::new(SystemLine { port }))
    }
}
