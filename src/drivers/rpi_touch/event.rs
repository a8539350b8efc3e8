use std::fmt;

/// Number of concurrent contacts the controller reports
pub const MAX_TOUCHES: usize = 5;

/// A single contact decoded from a report
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TouchPoint {
    pub active: bool,
    pub x: u16,
    pub y: u16,
}

/// All contacts of one report, indexed by slot. Slot 0 is the primary touch.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub points: [TouchPoint; MAX_TOUCHES],
}

impl TouchSample {
    /// Returns the number of active contacts
    pub fn active_count(&self) -> usize {
        self.iter().filter(|point| point.active).count()
    }

    /// Returns the lowest-numbered active slot and its contact
    pub fn primary(&self) -> Option<(usize, &TouchPoint)> {
        self.iter()
            .enumerate()
            .find(|(_, point)| point.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TouchPoint> {
        self.points.iter()
    }
}

impl fmt::Display for TouchSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, point) in self.points.iter().enumerate() {
            let state = if point.active { "down" } else { "up" };
            writeln!(f, "Slot {slot}: {state:<4} X: {:>5} Y: {:>5}", point.x, point.y)?;
        }
        Ok(())
    }
}
