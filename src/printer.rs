use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use encoding::all::UTF_8;
use encoding::types::{EncoderTrap, EncodingRef};

use crate::consts;
use crate::frame;
use crate::img::PackedBitmap;

/// Timeout for USB transfers.
pub const TIMEOUT: u64 = 400;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("USB error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] frame::EncodeError),

    /// The transport accepted fewer bytes than the frame holds. The write is
    /// not retried here; retry policy belongs to the caller.
    #[error("short write: {written} of {expected} bytes reached the device")]
    ShortWrite { written: usize, expected: usize },

    #[error("printer not found")]
    NotFound,

    #[error("unable to locate a bulk OUT endpoint")]
    InvalidEndpoints,
}

#[derive(Clone, Debug)]
pub struct UsbInfo {
    /// vendor_id is the USB vendor id used when initializing the printer
    pub vendor_id: u16,
    /// product_id is the USB product id used when initializing the printer
    pub product_id: u16,
    /// manufacturer is a string as defined in libusb for the device
    pub manufacturer: String,
    /// product is a string as defined in libusb for the device
    pub product: String,
}

/// An open ESC/POS printer on a USB bulk OUT endpoint.
///
/// The handle owns the claimed interface for the whole job and releases it
/// when dropped, so every exit path gives the device back.
pub struct Printer {
    codec: EncodingRef,
    trap: EncoderTrap,
    device: rusb::Device<rusb::GlobalContext>,
    handle: rusb::DeviceHandle<rusb::GlobalContext>,
    descriptor: rusb::DeviceDescriptor,
    timeout: Duration,

    /// USB Vendor ID
    vid: u16,
    /// USB Product ID
    pid: u16,
    /// USB command endpoint (bulk OUT)
    cmd_ep: u8,
}

impl Printer {
    /// Open the printer matching `vid`/`pid`.
    ///
    /// `endpoint` overrides bulk OUT endpoint discovery; hardware revisions
    /// of the same printer have shipped with different endpoint numbers, so
    /// this is configuration, not a constant. `codec` and `trap` control how
    /// [`Printer::print`] encodes text and default to UTF-8 with
    /// replacement.
    pub fn new(
        codec: Option<EncodingRef>,
        trap: Option<EncoderTrap>,
        vid: u16,
        pid: u16,
        endpoint: Option<u8>,
    ) -> Result<Self, Error> {
        let mut matches: VecDeque<_> = rusb::devices()?
            .iter()
            .filter_map(|d| {
                let desc = match d.device_descriptor() {
                    Ok(desc) => desc,
                    Err(_) => return None,
                };
                if desc.vendor_id() == vid && desc.product_id() == pid {
                    Some((d, desc))
                } else {
                    None
                }
            })
            .collect();
        let (device, descriptor) = match matches.pop_front() {
            Some((device, descriptor)) => (device, descriptor),
            None => return Err(Error::NotFound),
        };

        let mut handle = device.open()?;
        let _ = handle.set_auto_detach_kernel_driver(true);

        let config_desc = device.config_descriptor(0)?;
        let interface = match config_desc.interfaces().next() {
            Some(x) => x,
            None => return Err(Error::InvalidEndpoints),
        };

        let mut cmd_ep = endpoint;
        if cmd_ep.is_none() {
            for interface_desc in interface.descriptors() {
                for endpoint_desc in interface_desc.endpoint_descriptors() {
                    if let (rusb::TransferType::Bulk, rusb::Direction::Out) =
                        (endpoint_desc.transfer_type(), endpoint_desc.direction())
                    {
                        cmd_ep = Some(endpoint_desc.address());
                    }
                }
            }
        }
        let cmd_ep = match cmd_ep {
            Some(ep) => ep,
            None => return Err(Error::InvalidEndpoints),
        };

        match handle.kernel_driver_active(interface.number())? {
            true => {
                handle.detach_kernel_driver(interface.number())?;
            }
            false => {
                log::trace!("Kernel driver inactive");
            }
        }
        handle.claim_interface(interface.number())?;

        Ok(Printer {
            codec: codec.unwrap_or(UTF_8 as EncodingRef),
            trap: trap.unwrap_or(EncoderTrap::Replace),
            device,
            handle,
            descriptor,
            timeout: Duration::from_millis(TIMEOUT),
            vid,
            pid,
            cmd_ep,
        })
    }

    /// Release the claimed interface. Also runs on drop; call it directly to
    /// observe the result.
    pub fn release(&mut self) -> Result<(), Error> {
        let config_desc = self.device.config_descriptor(0)?;
        let interface = match config_desc.interfaces().next() {
            Some(x) => x,
            None => return Err(Error::InvalidEndpoints),
        };
        let _ = self.handle.release_interface(interface.number());
        Ok(())
    }

    pub fn info(&mut self) -> Result<UsbInfo, Error> {
        let languages = self.handle.read_languages(self.timeout)?;
        let language = match languages.first() {
            Some(l) => *l,
            None => return Err(Error::NotFound),
        };

        let manufacturer = self
            .handle
            .read_manufacturer_string(language, &self.descriptor, self.timeout)
            .unwrap_or_default();
        let product = self
            .handle
            .read_product_string(language, &self.descriptor, self.timeout)
            .unwrap_or_default();
        Ok(UsbInfo {
            vendor_id: self.vid,
            product_id: self.pid,
            manufacturer,
            product,
        })
    }

    // --------------------------------------------------

    fn encode(&mut self, content: &str) -> io::Result<Vec<u8>> {
        self.codec
            .encode(content, self.trap)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }

    /// Write one whole frame to the bulk OUT endpoint.
    ///
    /// A successful write means every byte was accepted; anything less is a
    /// [`Error::ShortWrite`] transport failure.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        let n_bytes = self.handle.write_bulk(self.cmd_ep, buf, self.timeout)?;
        if n_bytes != buf.len() {
            return Err(Error::ShortWrite {
                written: n_bytes,
                expected: buf.len(),
            });
        }
        log::debug!("wrote {} bytes to endpoint {:#04x}", n_bytes, self.cmd_ep);
        Ok(n_bytes)
    }

    /// ESC @ - Initialize printer, clear data in print buffer and set print
    /// mode to the default mode when powered on.
    ///
    /// ASCII    ESC   @
    /// Hex      1b   40
    /// Decimal  27   64
    pub fn hwinit(&mut self) -> Result<usize, Error> {
        self.write(&frame::init())
    }
    pub fn chain_hwinit(&mut self) -> Result<&mut Self, Error> {
        self.hwinit().map(|_| self)
    }

    /// ESC d 1, repeated - feed `lines` single lines.
    ///
    /// Each line is its own independent frame. A failed iteration is logged
    /// and the remaining feeds still run; the return value is the number of
    /// lines that actually fed.
    pub fn feed(&mut self, lines: usize) -> usize {
        feed_frames(lines, |buf| self.write(buf))
    }
    pub fn chain_feed(&mut self, lines: usize) -> &mut Self {
        self.feed(lines);
        self
    }

    /// GS V A - full cut.
    pub fn cut(&mut self) -> Result<usize, Error> {
        self.write(&frame::cut())
    }
    pub fn chain_cut(&mut self) -> Result<&mut Self, Error> {
        self.cut().map(|_| self)
    }

    /// GS v 0 - send a packed bitmap as one raster frame.
    pub fn raster(&mut self, bitmap: &PackedBitmap) -> Result<usize, Error> {
        let buf = frame::raster(bitmap)?;
        self.write(&buf)
    }
    pub fn chain_raster(&mut self, bitmap: &PackedBitmap) -> Result<&mut Self, Error> {
        self.raster(bitmap).map(|_| self)
    }

    /// Send raw text through the printer's built-in font, encoded with the
    /// configured codec.
    pub fn print(&mut self, content: &str) -> Result<usize, Error> {
        let rv = self.encode(content)?;
        self.write(rv.as_slice())
    }
    pub fn chain_print(&mut self, content: &str) -> Result<&mut Self, Error> {
        self.print(content).map(|_| self)
    }

    pub fn println(&mut self, content: &str) -> Result<usize, Error> {
        self.print(format!("{}{}", content, "\n").as_ref())
    }
    pub fn chain_println(&mut self, content: &str) -> Result<&mut Self, Error> {
        self.println(content).map(|_| self)
    }
}

impl Drop for Printer {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            log::debug!("release on drop failed: {}", err);
        }
    }
}

/// Feed loop over an injected frame sink.
///
/// Split out of [`Printer::feed`] so the log-and-continue policy is testable
/// without a device on the bench.
fn feed_frames<F>(lines: usize, mut send: F) -> usize
where
    F: FnMut(&[u8]) -> Result<usize, Error>,
{
    let mut fed = 0;
    for n in 0..lines {
        match send(consts::CMD_FEED_LINE) {
            Ok(_) => fed += 1,
            Err(err) => log::warn!("line feed {} of {} failed: {}", n + 1, lines, err),
        }
    }
    fed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_sends_one_frame_per_line() {
        let mut frames: Vec<Vec<u8>> = Vec::new();
        let fed = feed_frames(3, |buf| {
            frames.push(buf.to_vec());
            Ok(buf.len())
        });
        assert_eq!(fed, 3);
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f == &[0x1b, 0x64, 0x01]));
    }

    #[test]
    fn failed_feed_does_not_abort_the_rest() {
        let mut attempts = 0;
        let fed = feed_frames(3, |buf| {
            attempts += 1;
            if attempts == 2 {
                Err(Error::ShortWrite {
                    written: 0,
                    expected: buf.len(),
                })
            } else {
                Ok(buf.len())
            }
        });
        assert_eq!(attempts, 3);
        assert_eq!(fed, 2);
    }

    #[test]
    fn feed_of_zero_lines_sends_nothing() {
        let fed = feed_frames(0, |_| panic!("no frame expected"));
        assert_eq!(fed, 0);
    }
}
