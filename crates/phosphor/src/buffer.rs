//! Shared intensity grid
//!
//! Every cell is an independent [`AtomicU8`]. Cells share no invariant, so the
//! decoder thread can [`plot`](PhosphorBuffer::plot) while the display thread
//! runs [`decay_tick`](PhosphorBuffer::decay_tick) without a lock. A plot that
//! lands mid-sweep is either decayed once in that tick or not at all; it is
//! never lost and never exceeds [`MAX_INTENSITY`].

use core::sync::atomic::{AtomicU8, Ordering};

use thiserror::Error;

use crate::decay::DecayStep;
use crate::MAX_INTENSITY;

/// Grid construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Coordinates wrap by masking, which needs a power-of-two side.
    #[error("buffer side must be a non-zero power of two, got {0}")]
    SizeNotPowerOfTwo(u32),
}

/// Square persistent-phosphor grid.
pub struct PhosphorBuffer {
    cells: Box<[AtomicU8]>,
    size: u32,
    mask: u32,
    step: DecayStep,
}

impl PhosphorBuffer {
    /// Create a dark `size × size` grid.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::SizeNotPowerOfTwo`] unless `size` is a power of two.
    // SAFETY: size is a power of two no larger than 2^31, so size - 1 cannot
    // underflow; size * size is computed in usize.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn new(size: u32, step: DecayStep) -> Result<Self, BufferError> {
        if !size.is_power_of_two() {
            return Err(BufferError::SizeNotPowerOfTwo(size));
        }
        let side = size as usize;
        let cells = (0..side * side).map(|_| AtomicU8::new(0)).collect();
        Ok(Self {
            cells,
            size,
            mask: size - 1,
            step,
        })
    }

    /// Cells per side.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Ticks for a fully plotted cell to fade to zero.
    pub fn ticks_to_black(&self) -> u32 {
        self.step.ticks_to_black()
    }

    // SAFETY: both coordinates are masked below `size`, so the index is below
    // size * size, the cell count.
    #[allow(clippy::arithmetic_side_effects)]
    fn cell(&self, x: u32, y: u32) -> Option<&AtomicU8> {
        let index = (y & self.mask) as usize * self.size as usize + (x & self.mask) as usize;
        self.cells.get(index)
    }

    /// Light the cell at `(x & mask, y & mask)`.
    ///
    /// Intensities above [`MAX_INTENSITY`] are stored as `MAX_INTENSITY`.
    pub fn plot(&self, x: u32, y: u32, intensity: u8) {
        if let Some(cell) = self.cell(x, y) {
            cell.store(intensity.min(MAX_INTENSITY), Ordering::Relaxed);
        }
    }

    /// Fade every lit cell by one step, stopping at zero.
    pub fn decay_tick(&self) {
        let step = self.step.get();
        for cell in self.cells.iter() {
            // Most of the grid is dark; skip the read-modify-write for it.
            if cell.load(Ordering::Relaxed) == 0 {
                continue;
            }
            let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                (v != 0).then(|| v.saturating_sub(step))
            });
        }
    }

    /// Intensity at `(x & mask, y & mask)`.
    pub fn intensity(&self, x: u32, y: u32) -> u8 {
        self.cell(x, y).map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// All intensities in row-major order.
    pub fn intensities(&self) -> impl ExactSizeIterator<Item = u8> + '_ {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed))
    }

    /// Number of cells currently above zero.
    pub fn lit_cells(&self) -> usize {
        self.intensities().filter(|&v| v != 0).count()
    }

    /// Number of cells currently at [`MAX_INTENSITY`].
    pub fn cells_at_max(&self) -> usize {
        self.intensities().filter(|&v| v == MAX_INTENSITY).count()
    }
}

impl core::fmt::Debug for PhosphorBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhosphorBuffer")
            .field("size", &self.size)
            .field("step", &self.step.get())
            .field("lit_cells", &self.lit_cells())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn buffer(size: u32) -> PhosphorBuffer {
        PhosphorBuffer::new(size, DecayStep::default()).unwrap()
    }

    #[test]
    fn test_buffer_creation() {
        let fb = buffer(512);
        assert_eq!(fb.size(), 512);
        assert_eq!(fb.intensities().len(), 512 * 512);
        assert_eq!(fb.lit_cells(), 0);
    }

    #[test]
    fn test_size_must_be_power_of_two() {
        let step = DecayStep::default();
        assert_eq!(
            PhosphorBuffer::new(500, step).unwrap_err(),
            BufferError::SizeNotPowerOfTwo(500)
        );
        assert_eq!(
            PhosphorBuffer::new(0, step).unwrap_err(),
            BufferError::SizeNotPowerOfTwo(0)
        );
    }

    #[test]
    fn test_plot_and_read_back() {
        let fb = buffer(16);
        fb.plot(3, 7, 100);
        assert_eq!(fb.intensity(3, 7), 100);
        assert_eq!(fb.intensity(7, 3), 0);
        assert_eq!(fb.lit_cells(), 1);
    }

    #[test]
    fn test_plot_wraps_coordinates() {
        let fb = buffer(16);
        fb.plot(16 + 2, 32 + 5, 50);
        assert_eq!(fb.intensity(2, 5), 50);
        fb.plot(u32::MAX, 0, 60);
        assert_eq!(fb.intensity(15, 0), 60);
    }

    #[test]
    fn test_plot_clamps_to_max() {
        let fb = buffer(16);
        fb.plot(0, 0, 0xFF);
        assert_eq!(fb.intensity(0, 0), MAX_INTENSITY);
        assert_eq!(fb.cells_at_max(), 1);
    }

    #[test]
    fn test_decay_steps_down_and_floors() {
        let fb = PhosphorBuffer::new(8, DecayStep::new(100).unwrap()).unwrap();
        fb.plot(1, 1, MAX_INTENSITY);
        fb.decay_tick();
        assert_eq!(fb.intensity(1, 1), MAX_INTENSITY - 100);
        fb.decay_tick();
        assert_eq!(fb.intensity(1, 1), MAX_INTENSITY - 200);
        fb.decay_tick();
        assert_eq!(fb.intensity(1, 1), 0);
        fb.decay_tick();
        assert_eq!(fb.intensity(1, 1), 0);
    }

    #[test]
    fn test_replot_overrides_decay() {
        let fb = buffer(8);
        fb.plot(2, 2, MAX_INTENSITY);
        fb.decay_tick();
        fb.plot(2, 2, MAX_INTENSITY);
        assert_eq!(fb.intensity(2, 2), MAX_INTENSITY);
    }

    #[test]
    fn test_intensities_are_row_major() {
        let fb = buffer(4);
        fb.plot(1, 2, 9);
        let position = fb.intensities().position(|v| v == 9);
        assert_eq!(position, Some(2 * 4 + 1));
    }
}
