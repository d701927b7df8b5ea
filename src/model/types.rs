use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of processes on the factory floor.
pub const PROCESS_COUNT: usize = 13;

/// One of the 13 manufacturing processes, labelled `A` through `M`.
///
/// Alphabet order is the canonical order: seeding, iteration and output rows
/// all follow it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
}

impl ProcessId {
    pub const ALL: [ProcessId; PROCESS_COUNT] = [
        ProcessId::A,
        ProcessId::B,
        ProcessId::C,
        ProcessId::D,
        ProcessId::E,
        ProcessId::F,
        ProcessId::G,
        ProcessId::H,
        ProcessId::I,
        ProcessId::J,
        ProcessId::K,
        ProcessId::L,
        ProcessId::M,
    ];

    /// Position in the alphabet, usable as an array index.
    pub fn index(self) -> usize {
        self as usize
    }

    #[cfg(test)]
    pub fn from_index(index: usize) -> Option<ProcessId> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessId::A => "A",
            ProcessId::B => "B",
            ProcessId::C => "C",
            ProcessId::D => "D",
            ProcessId::E => "E",
            ProcessId::F => "F",
            ProcessId::G => "G",
            ProcessId::H => "H",
            ProcessId::I => "I",
            ProcessId::J => "J",
            ProcessId::K => "K",
            ProcessId::L => "L",
            ProcessId::M => "M",
        }
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not one of the 13 process labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl FromStr for ProcessId {
    type Err = UnknownLabel;

    /// Accepts `"A"`..`"M"` in either case, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                let c = c.to_ascii_uppercase();
                if ('A'..='M').contains(&c) {
                    Ok(Self::ALL[(c as u8 - b'A') as usize])
                } else {
                    Err(UnknownLabel(trimmed.to_string()))
                }
            }
            _ => Err(UnknownLabel(trimmed.to_string())),
        }
    }
}

/// A point in floor coordinates.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PointF) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
