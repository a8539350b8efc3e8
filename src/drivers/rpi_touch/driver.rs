use std::{
    error::Error,
    ffi::CString,
    io::{self, Read},
};

use hidapi::{HidDevice, HidError};

use super::hid_report::{hex_dump, unpack_report, FrameError, PackedInputDataReport, PACKET_SIZE};

/// Vendor ID
pub const VID: u16 = 0x0eef;
/// Product ID
pub const PID: u16 = 0x0005;
/// Size of the read buffer. Larger than [PACKET_SIZE] so that oversized
/// reads are seen as such instead of being truncated.
pub const READ_BUFFER_SIZE: usize = 64;

/// A blocking byte source that yields one raw report per read. A read of zero
/// bytes means the source is gone.
pub trait ReportSource {
    fn read_report(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl ReportSource for HidDevice {
    fn read_report(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf).map_err(to_io_error)
    }
}

/// Convert a hidapi error into an [io::Error], keeping the OS error if there
/// is one.
pub fn to_io_error(err: HidError) -> io::Error {
    match err {
        HidError::IoError { error } => error,
        err => io::Error::other(err),
    }
}

/// Adapts any [Read] implementation (files, pipes, in-memory buffers) into a
/// [ReportSource]. Byte streams carry no report boundaries, so each read
/// returns at most [PACKET_SIZE] bytes.
#[derive(Debug)]
pub struct ReadSource<R: Read> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: Read> ReportSource for ReadSource<R> {
    fn read_report(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(PACKET_SIZE);
        self.inner.read(&mut buf[..len])
    }
}

/// Result of a single read from the device
#[derive(Debug)]
pub enum Frame {
    /// A complete report
    Report(PackedInputDataReport),
    /// A read that returned any number of bytes other than [PACKET_SIZE]
    Malformed(usize),
    /// The source returned end-of-stream
    Disconnected,
}

#[derive(Debug)]
pub struct Driver<S: ReportSource> {
    source: S,
}

impl Driver<HidDevice> {
    /// Open the hidraw device at the given path and verify that it is the
    /// expected touch controller.
    pub fn open(path: &str, vid: u16, pid: u16) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let cs_path = CString::new(path)?;
        let api = hidapi::HidApi::new()?;
        let device = api.open_path(&cs_path)?;
        let info = device.get_device_info()?;
        if info.vendor_id() != vid || info.product_id() != pid {
            return Err(format!(
                "Device '{path}' is not a RPI_TOUCH controller: {:04x}:{:04x}",
                info.vendor_id(),
                info.product_id()
            )
            .into());
        }
        device.set_blocking_mode(true)?;

        Ok(Self::new(device))
    }
}

impl<S: ReportSource> Driver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Block until the next read completes and classify it
    pub fn poll(&mut self) -> io::Result<Frame> {
        let mut buf = [0; READ_BUFFER_SIZE];
        let bytes_read = loop {
            match self.source.read_report(&mut buf[..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };

        if bytes_read == 0 {
            return Ok(Frame::Disconnected);
        }
        if bytes_read != PACKET_SIZE {
            return Ok(Frame::Malformed(bytes_read));
        }

        let report = match unpack_report(&buf[..bytes_read]) {
            Ok(report) => report,
            Err(FrameError::InvalidLength { got, expected: _ }) => {
                return Ok(Frame::Malformed(got));
            }
            Err(e) => {
                log::warn!("Discarding report: {e}");
                return Ok(Frame::Malformed(bytes_read));
            }
        };

        if !report.has_valid_markers() {
            log::warn!(
                "Unexpected marker bytes in report: start={:02x} marker={:02x} end={:02x}",
                report.start,
                report.multi_touch_marker,
                report.end
            );
        }
        log::trace!("Got report: {}\n{}", hex_dump(&report), report.to_sample());

        Ok(Frame::Report(report))
    }
}
