use std::{error::Error, io::Cursor};

use crate::{
    drivers::rpi_touch::{
        driver::{Driver, ReadSource},
        hid_report::PACKET_SIZE,
    },
    input::{
        event::native::{Axis, InputEvent, TrackingId},
        session::{EndReason, Session},
        target::{InputError, TargetInputDevice},
        tracker::{SyncPolicy, TrackerConfig},
    },
};

/// Target device that records every write
#[derive(Debug, Default)]
struct RecordingDevice {
    writes: Vec<Vec<InputEvent>>,
}

impl RecordingDevice {
    fn events(&self) -> Vec<InputEvent> {
        self.writes.iter().flatten().copied().collect()
    }
}

impl TargetInputDevice for RecordingDevice {
    fn write_events(&mut self, events: &[InputEvent]) -> Result<(), InputError> {
        self.writes.push(events.to_vec());
        Ok(())
    }
}

/// Target device whose writes always fail
#[derive(Debug, Default)]
struct BrokenDevice;

impl TargetInputDevice for BrokenDevice {
    fn write_events(&mut self, _events: &[InputEvent]) -> Result<(), InputError> {
        Err(InputError::DeviceError(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "uinput gone",
        )))
    }
}

fn frame(mask: u8, slot2: Option<(u16, u16)>) -> [u8; PACKET_SIZE] {
    let mut raw = [0u8; PACKET_SIZE];
    raw[0] = 0xaa;
    raw[6] = 0xbb;
    raw[7] = mask;
    raw[24] = 0xcc;
    if let Some((x, y)) = slot2 {
        // Slot 2 reads X from bytes 10-11 and Y from bytes 12-13
        raw[10..12].copy_from_slice(&x.to_be_bytes());
        raw[12..14].copy_from_slice(&y.to_be_bytes());
    }
    raw
}

fn slot_only() -> TrackerConfig {
    TrackerConfig {
        legacy_single_touch: false,
        sync_policy: SyncPolicy::OnChange,
    }
}

fn session(bytes: Vec<u8>) -> Session<ReadSource<Cursor<Vec<u8>>>, RecordingDevice> {
    let driver = Driver::new(ReadSource::new(Cursor::new(bytes)));
    Session::new(driver, RecordingDevice::default(), slot_only())
}

#[tokio::test]
async fn test_press_and_release() -> Result<(), Box<dyn Error>> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&frame(0b0000_0100, Some((100, 200))));
    bytes.extend_from_slice(&frame(0, None));
    bytes.extend_from_slice(&frame(0, None));

    let mut session = session(bytes);
    let end = session.run()?;
    assert!(matches!(end.reason, EndReason::Disconnected));
    assert_eq!(end.stats.reports, 3);
    assert_eq!(end.stats.malformed_frames, 0);

    let target = session.target();
    assert_eq!(target.writes.len(), 2, "idle report must not be written");
    assert_eq!(
        target.events(),
        vec![
            InputEvent::SlotSelect(2),
            InputEvent::TrackingId(TrackingId::Id(2)),
            InputEvent::AbsMove(Axis::PositionX, 100),
            InputEvent::AbsMove(Axis::PositionY, 200),
            InputEvent::SyncReport,
            InputEvent::SlotSelect(2),
            InputEvent::TrackingId(TrackingId::Release),
            InputEvent::SyncReport,
        ]
    );
    assert_eq!(end.stats.events, 8);

    Ok(())
}

#[tokio::test]
async fn test_malformed_frame_is_skipped() -> Result<(), Box<dyn Error>> {
    let press = frame(0b0000_0100, Some((100, 200)));
    let mut session = session(press[..10].to_vec());

    assert!(session.step()?.is_none());
    assert_eq!(session.stats().malformed_frames, 1);
    assert_eq!(session.stats().reports, 0);
    assert!(session.target().writes.is_empty());
    assert_eq!(
        session.tracker().state().previous().active_count(),
        0,
        "slot state must not change on a malformed frame"
    );

    assert!(matches!(session.step()?, Some(EndReason::Disconnected)));

    Ok(())
}

#[tokio::test]
async fn test_new_session_starts_released() -> Result<(), Box<dyn Error>> {
    // Contact is held across a reconnect: the second session presses it again
    let held = frame(0b0000_0100, Some((100, 200)));
    let mut first = session(held.to_vec());
    first.run()?;
    let mut second = session(held.to_vec());
    second.run()?;

    assert_eq!(first.target().events(), second.target().events());
    assert_eq!(
        second.target().events()[1],
        InputEvent::TrackingId(TrackingId::Id(2))
    );

    Ok(())
}

#[tokio::test]
async fn test_target_failure_ends_session() -> Result<(), Box<dyn Error>> {
    let press = frame(0b0000_0001, None);
    let driver = Driver::new(ReadSource::new(Cursor::new(press.to_vec())));
    let mut session = Session::new(driver, BrokenDevice, slot_only());

    let result = session.run();
    assert!(result.is_err());

    Ok(())
}
