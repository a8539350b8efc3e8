use std::io;

use thiserror::Error;

use crate::drivers::rpi_touch::driver::{Driver, Frame, ReportSource};

use super::{
    target::{InputError, TargetInputDevice},
    tracker::{Tracker, TrackerConfig},
};

/// Errors that abort a session. Device loss is not one of them; see
/// [EndReason].
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to write to target device: {0}")]
    Target(#[from] InputError),
}

/// Why a session stopped reading
#[derive(Debug)]
pub enum EndReason {
    /// The device returned end-of-stream
    Disconnected,
    /// The device read failed, usually because it was unplugged
    ReadFailed(io::Error),
}

/// Counters kept over the lifetime of a session
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub reports: u64,
    pub malformed_frames: u64,
    pub events: u64,
}

#[derive(Debug)]
pub struct SessionEnd {
    pub reason: EndReason,
    pub stats: SessionStats,
}

/// A [Session] ties one opened touch device to one target device. Slot state
/// starts from all-inactive and is dropped together with the session.
#[derive(Debug)]
pub struct Session<S: ReportSource, T: TargetInputDevice> {
    driver: Driver<S>,
    target: T,
    tracker: Tracker,
    stats: SessionStats,
}

impl<S: ReportSource, T: TargetInputDevice> Session<S, T> {
    pub fn new(driver: Driver<S>, target: T, config: TrackerConfig) -> Self {
        Self {
            driver,
            target,
            tracker: Tracker::new(config),
            stats: SessionStats::default(),
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Read and process a single frame. Returns the reason the session ended
    /// if the device is gone.
    pub fn step(&mut self) -> Result<Option<EndReason>, SessionError> {
        let frame = match self.driver.poll() {
            Ok(frame) => frame,
            Err(e) => return Ok(Some(EndReason::ReadFailed(e))),
        };

        match frame {
            Frame::Report(report) => {
                self.stats.reports += 1;
                let sample = report.to_sample();
                let events = self.tracker.emit(&sample);
                if !events.is_empty() {
                    self.target.write_events(events.as_slice())?;
                    self.stats.events += events.len() as u64;
                }
            }
            Frame::Malformed(size) => {
                self.stats.malformed_frames += 1;
                log::warn!("Short input: {size} byte(s)");
            }
            Frame::Disconnected => return Ok(Some(EndReason::Disconnected)),
        }

        Ok(None)
    }

    /// Process frames until the device goes away
    pub fn run(&mut self) -> Result<SessionEnd, SessionError> {
        log::debug!("Session started");
        loop {
            if let Some(reason) = self.step()? {
                let stats = self.stats;
                log::info!(
                    "Session ended ({reason:?}): {} report(s), {} malformed, {} event(s)",
                    stats.reports,
                    stats.malformed_frames,
                    stats.events
                );
                return Ok(SessionEnd { reason, stats });
            }
        }
    }
}
