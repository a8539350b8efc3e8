use packed_struct::prelude::*;
use packed_struct::PackingError;
use thiserror::Error;

use super::event::{TouchPoint, TouchSample, MAX_TOUCHES};

/// Size of a single touch report
pub const PACKET_SIZE: usize = 25;

/// Axis ranges of the panel
pub const TOUCHSCREEN_X_MAX: u16 = 800;
pub const TOUCHSCREEN_Y_MAX: u16 = 480;

// Marker bytes as observed on the wire. They are only checked for logging.
pub const START_BYTE: u8 = 0xaa;
pub const MULTI_TOUCH_MARKER: u8 = 0xbb;
pub const END_BYTES: [u8; 2] = [0xcc, 0x00];

/// Errors produced while turning a raw read into a report
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid report size: {got}/{expected}")]
    InvalidLength { got: usize, expected: usize },
    #[error("failed to unpack report: {0:?}")]
    Unpack(PackingError),
}

impl From<PackingError> for FrameError {
    fn from(err: PackingError) -> Self {
        Self::Unpack(err)
    }
}

// Offset:
//     0 : Start byte (aa)
//     1 : Any touch (0=off,1=on)
//   2-5 : Primary touch X, Y (big endian)
//     6 : Multi-touch marker (bb)
//     7 : Touch bitmask, bit N = slot N
//  8-23 : Secondary coordinate words (big endian)
//    24 : End byte (cc or 00)
//
// aa 01 03 1b 01 d2 bb 03 01 68 02 cc 00 5d 01 ef 01 5f 01 fe 00 fb 02 37 cc
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "25")]
pub struct PackedInputDataReport {
    #[packed_field(bytes = "0")]
    pub start: u8,
    #[packed_field(bytes = "1")]
    pub any_touch: u8,
    #[packed_field(bytes = "2..=5")]
    pub primary: TouchData,
    #[packed_field(bytes = "6")]
    pub multi_touch_marker: u8,
    #[packed_field(bytes = "7")]
    pub touch_mask: u8,
    #[packed_field(bytes = "8..=23")]
    pub secondary: [u8; 16],
    #[packed_field(bytes = "24")]
    pub end: u8,
}

impl Default for PackedInputDataReport {
    fn default() -> Self {
        Self {
            start: START_BYTE,
            any_touch: 0,
            primary: TouchData::default(),
            multi_touch_marker: MULTI_TOUCH_MARKER,
            touch_mask: 0,
            secondary: [0; 16],
            end: END_BYTES[0],
        }
    }
}

impl PackedInputDataReport {
    /// Returns whether the given slot has its bit set in the touch bitmask.
    pub fn is_active(&self, slot: usize) -> bool {
        slot < MAX_TOUCHES && self.touch_mask & (1 << slot) != 0
    }

    /// Returns the X coordinate reported for the given slot. Slots past the
    /// primary touch read the secondary word array with a stride of one word,
    /// so slot N's X shares its word with slot N-1's Y.
    pub fn get_x(&self, slot: usize) -> u16 {
        match slot {
            0 => self.primary.get_x(),
            _ => self.secondary_word(slot - 1),
        }
    }

    /// Returns the Y coordinate reported for the given slot.
    pub fn get_y(&self, slot: usize) -> u16 {
        match slot {
            0 => self.primary.get_y(),
            _ => self.secondary_word(slot),
        }
    }

    /// Returns true if the start, multi-touch and end markers hold the values
    /// the controller is known to send.
    pub fn has_valid_markers(&self) -> bool {
        self.start == START_BYTE
            && self.multi_touch_marker == MULTI_TOUCH_MARKER
            && END_BYTES.contains(&self.end)
    }

    /// Translate the report into a slot-indexed touch sample
    pub fn to_sample(&self) -> TouchSample {
        let mut sample = TouchSample::default();
        for (slot, point) in sample.points.iter_mut().enumerate() {
            *point = TouchPoint {
                active: self.is_active(slot),
                x: self.get_x(slot),
                y: self.get_y(slot),
            };
        }
        sample
    }

    fn secondary_word(&self, index: usize) -> u16 {
        let offset = index * 2;
        match self.secondary.get(offset..offset + 2) {
            Some(word) => u16::from_be_bytes([word[0], word[1]]),
            None => 0,
        }
    }
}

// 03 1b 01 d2
#[derive(PackedStruct, Debug, Copy, Clone, PartialEq)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "4")]
pub struct TouchData {
    #[packed_field(bytes = "0..=1", endian = "msb")]
    pub x: Integer<u16, packed_bits::Bits<16>>,
    #[packed_field(bytes = "2..=3", endian = "msb")]
    pub y: Integer<u16, packed_bits::Bits<16>>,
}

impl TouchData {
    pub fn get_x(&self) -> u16 {
        self.x.to_primitive()
    }

    pub fn set_x(&mut self, value: u16) {
        self.x = Integer::from_primitive(value);
    }

    pub fn get_y(&self) -> u16 {
        self.y.to_primitive()
    }

    pub fn set_y(&mut self, value: u16) {
        self.y = Integer::from_primitive(value);
    }
}

impl Default for TouchData {
    fn default() -> Self {
        Self {
            x: Integer::from_primitive(0),
            y: Integer::from_primitive(0),
        }
    }
}

/// Unpack a raw read into a report. The length must be exactly [PACKET_SIZE];
/// marker bytes are not validated here.
pub fn unpack_report(buf: &[u8]) -> Result<PackedInputDataReport, FrameError> {
    let Ok(data) = <&[u8; PACKET_SIZE]>::try_from(buf) else {
        return Err(FrameError::InvalidLength {
            got: buf.len(),
            expected: PACKET_SIZE,
        });
    };
    Ok(PackedInputDataReport::unpack(data)?)
}

/// Returns the raw bytes of the report as space separated hex.
/// e.g. "aa 01 03 1b ... cc"
pub fn hex_dump(report: &PackedInputDataReport) -> String {
    match report.pack() {
        Ok(bytes) => bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<String>>()
            .join(" "),
        Err(e) => format!("<unpackable: {e:?}>"),
    }
}

/// Decode a raw read into a touch sample.
pub fn decode(buf: &[u8]) -> Result<TouchSample, FrameError> {
    let report = unpack_report(buf)?;
    Ok(report.to_sample())
}
