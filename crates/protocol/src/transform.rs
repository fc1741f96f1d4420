//! Device coordinates to display grid
//!
//! The device addresses a 1024×1024 beam range. The display grid is
//! `512 × magnification` cells square. The transform is:
//!
//! ```text
//! device_x = (raw_x + 512) mod 1024
//! device_y = 1024 - ((raw_y + 512) mod 1024)     (Y grows downward on screen)
//! x        = device_x * size / 1024
//! y        = device_y * size / 1024
//! ```
//!
//! and every point is wrapped into `[0, size)` with `& (size - 1)`. The
//! `+ 512` moves the device origin (screen centre) to the middle of the grid.
//! `device_y` can be 1024 for `raw_y = 512`; it wraps to row 0.

use thiserror::Error;

use crate::frame::CoordinateFrame;

/// Span of device coordinates on each axis.
pub const DEVICE_RANGE: u32 = 1024;

/// Display width at magnification 1.
pub const BASE_WIDTH: u32 = 512;

/// Half the device range; the device origin sits here on the grid.
const DEVICE_CENTRE: u32 = DEVICE_RANGE / 2;

/// Invalid display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Only 1 and 2 keep the grid a power of two within the device range.
    #[error("magnification must be 1 or 2, got {0}")]
    Magnification(u32),
}

/// Integer display scale, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Magnification {
    /// 512×512 grid, two device units per cell.
    #[default]
    X1,
    /// 1024×1024 grid, one device unit per cell.
    X2,
}

impl Magnification {
    /// Validate a numeric factor.
    pub fn new(factor: u32) -> Result<Self, ConfigError> {
        match factor {
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            other => Err(ConfigError::Magnification(other)),
        }
    }

    /// Numeric factor.
    pub const fn factor(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
        }
    }
}

/// One cell to light, already inside the display grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotPoint {
    /// Column, `0..size`.
    pub x: u32,
    /// Row, `0..size`.
    pub y: u32,
    /// Brightness to store.
    pub intensity: u8,
}

/// Display grid derived from the magnification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    magnification: Magnification,
}

impl DisplayGeometry {
    /// Offsets of the 2×2 dot drawn for each sample.
    pub const FOOTPRINT: [(u32, u32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

    /// Geometry for a magnification.
    pub const fn new(magnification: Magnification) -> Self {
        Self { magnification }
    }

    /// Configured magnification.
    pub const fn magnification(&self) -> Magnification {
        self.magnification
    }

    /// Cells per side (always a power of two).
    #[allow(clippy::arithmetic_side_effects)] // Safety: constant 512 * 2
    pub const fn size(&self) -> u32 {
        match self.magnification {
            Magnification::X1 => BASE_WIDTH,
            Magnification::X2 => BASE_WIDTH * 2,
        }
    }

    /// `size - 1`, for wrapping.
    #[allow(clippy::arithmetic_side_effects)] // Safety: size is at least BASE_WIDTH
    pub const fn mask(&self) -> u32 {
        self.size() - 1
    }

    /// Beam position of a frame in device units, before scaling.
    // SAFETY: raw values are at most 0xFFF, so `raw + 512` fits in u32; the
    // modulo result is below DEVICE_RANGE, so the subtraction cannot underflow.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn device_position(frame: CoordinateFrame) -> (u32, u32) {
        let x = (u32::from(frame.raw_x()) + DEVICE_CENTRE) % DEVICE_RANGE;
        let y = DEVICE_RANGE - (u32::from(frame.raw_y()) + DEVICE_CENTRE) % DEVICE_RANGE;
        (x, y)
    }

    /// Grid cell for a frame, wrapped into `[0, size)`.
    // SAFETY: device coordinates are at most 1024 and size at most 1024, so the
    // product fits in u32; DEVICE_RANGE is a non-zero constant.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn project(&self, frame: CoordinateFrame) -> (u32, u32) {
        let (dx, dy) = Self::device_position(frame);
        let scale = |d: u32| (d * self.size() / DEVICE_RANGE) & self.mask();
        (scale(dx), scale(dy))
    }

    /// The four cells of a sample's 2×2 dot, each wrapped into the grid.
    pub fn footprint(&self, frame: CoordinateFrame, intensity: u8) -> [PlotPoint; 4] {
        let (x, y) = self.project(frame);
        Self::FOOTPRINT.map(|(ox, oy)| PlotPoint {
            x: x.wrapping_add(ox) & self.mask(),
            y: y.wrapping_add(oy) & self.mask(),
            intensity,
        })
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::new(Magnification::default())
    }
}
