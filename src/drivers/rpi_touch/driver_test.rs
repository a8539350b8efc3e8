use std::{
    collections::VecDeque,
    error::Error,
    io::{self, Cursor},
};

use crate::drivers::rpi_touch::{
    driver::{to_io_error, Driver, Frame, ReadSource, ReportSource},
    hid_report::PACKET_SIZE,
};

const ONE_FINGER: [u8; PACKET_SIZE] = [
    0xaa, 0x01, 0x00, 0x64, 0x00, 0xc8, 0xbb, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xcc,
];

/// Source that replays a scripted list of read results
struct ScriptedSource {
    reads: VecDeque<io::Result<Vec<u8>>>,
}

impl ReportSource for ScriptedSource {
    fn read_report(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reads.pop_front() {
            Some(Ok(data)) => {
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            Some(Err(e)) => Err(e),
            None => Ok(0),
        }
    }
}

#[tokio::test]
async fn test_poll_stream() -> Result<(), Box<dyn Error>> {
    let mut bytes = ONE_FINGER.to_vec();
    bytes.extend_from_slice(&ONE_FINGER[..10]);
    let mut driver = Driver::new(ReadSource::new(Cursor::new(bytes)));

    let Frame::Report(report) = driver.poll()? else {
        panic!("expected a complete report");
    };
    let sample = report.to_sample();
    assert!(sample.points[0].active);
    assert_eq!((sample.points[0].x, sample.points[0].y), (100, 200));

    assert!(matches!(driver.poll()?, Frame::Malformed(10)));
    assert!(matches!(driver.poll()?, Frame::Disconnected));

    Ok(())
}

#[tokio::test]
async fn test_poll_retries_interrupted_reads() -> Result<(), Box<dyn Error>> {
    let source = ScriptedSource {
        reads: VecDeque::from(vec![
            Err(io::Error::from(io::ErrorKind::Interrupted)),
            Ok(ONE_FINGER.to_vec()),
            Err(io::Error::new(io::ErrorKind::Other, "device unplugged")),
        ]),
    };
    let mut driver = Driver::new(source);

    assert!(matches!(driver.poll()?, Frame::Report(_)));
    let err = driver.poll().expect_err("read failure should be reported");
    assert_eq!(err.kind(), io::ErrorKind::Other);

    Ok(())
}

#[tokio::test]
async fn test_poll_keeps_reports_with_bad_markers() -> Result<(), Box<dyn Error>> {
    let mut raw = ONE_FINGER;
    raw[0] = 0x55;
    raw[24] = 0x01;
    let source = ScriptedSource {
        reads: VecDeque::from(vec![Ok(raw.to_vec())]),
    };
    let mut driver = Driver::new(source);

    let Frame::Report(report) = driver.poll()? else {
        panic!("marker anomalies must not drop the report");
    };
    assert!(!report.has_valid_markers());
    assert!(report.to_sample().points[0].active);

    Ok(())
}

#[tokio::test]
async fn test_poll_rejects_oversized_read() -> Result<(), Box<dyn Error>> {
    // Report id prefixed frame delivered by a single read
    let mut prefixed = vec![0x01];
    prefixed.extend_from_slice(&ONE_FINGER);
    let source = ScriptedSource {
        reads: VecDeque::from(vec![Ok(prefixed), Ok(ONE_FINGER.to_vec())]),
    };
    let mut driver = Driver::new(source);

    assert!(matches!(driver.poll()?, Frame::Malformed(26)));
    assert!(matches!(driver.poll()?, Frame::Report(_)));
    assert!(matches!(driver.poll()?, Frame::Disconnected));

    Ok(())
}

#[test]
fn test_hid_errors_keep_os_error() {
    let err = to_io_error(hidapi::HidError::IoError {
        error: io::Error::from_raw_os_error(19),
    });
    assert_eq!(err.raw_os_error(), Some(19));

    let err = to_io_error(hidapi::HidError::HidApiError {
        message: "device disconnected".to_string(),
    });
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert!(err.to_string().contains("device disconnected"));
}
