//! # 1-bit Black & White Encoder
//!
//! [`BwMatrix`] draws basic on/off pixel data and ships the whole panel to
//! the module in a single `DrawBw` frame.
//!
//! ## Buffer Layout
//!
//! The buffer packs one bit per pixel in row-major order, least-significant
//! bit first:
//!
//! ```text
//! index = y * 9 + x        bit `index % 8` of byte `index / 8`
//!
//! (0,0) → byte 0, bit 0
//! (7,0) → byte 0, bit 7
//! (8,0) → byte 1, bit 0
//! (8,33) → byte 38, bit 1
//! ```
//!
//! `set_pixel` only ever turns bits on. Individual pixels cannot be turned
//! off; `clear` resets the whole buffer.

use std::path::Path;

use log::trace;

use crate::error::MatrizError;
use crate::matrix::{BW_BUFFER_SIZE, MATRIX_HEIGHT, MATRIX_WIDTH, Renderer};
use crate::protocol::commands::{Command, write_command};
use crate::transport::{SerialTransport, Transport};

/// A tool for drawing 1-bit black & white pixel data on an LED matrix
/// module.
///
/// ## Example
///
/// ```no_run
/// use matriz::matrix::{BwMatrix, Renderer};
///
/// let mut matrix = BwMatrix::open("/dev/ttyACM0", 115_200)?;
/// matrix.set_pixel(4, 17);
/// matrix.flush()?;
/// matrix.close()?;
/// # Ok::<(), matriz::error::MatrizError>(())
/// ```
pub struct BwMatrix<T: Transport> {
    transport: T,
    buffer: Vec<u8>,
}

impl BwMatrix<SerialTransport> {
    /// Open the serial device at `device`/`baud` and initialize an encoder
    /// on it.
    pub fn open<P: AsRef<Path>>(device: P, baud: u32) -> Result<Self, MatrizError> {
        Ok(Self::new(SerialTransport::open(device, baud)?))
    }
}

impl<T: Transport> BwMatrix<T> {
    /// Create an encoder over a caller-supplied transport.
    ///
    /// The buffer is allocated once here, sized to the panel, and mutated
    /// in place for the encoder's whole lifetime.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            buffer: vec![0; BW_BUFFER_SIZE],
        }
    }

    /// Consume the encoder and hand back its transport, e.g. to reuse the
    /// port for control commands.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

impl<T: Transport> Renderer for BwMatrix<T> {
    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn set_pixel(&mut self, x: i32, y: i32) {
        if x < 0 || x >= MATRIX_WIDTH as i32 || y < 0 || y >= MATRIX_HEIGHT as i32 {
            return;
        }

        let index = y as usize * MATRIX_WIDTH + x as usize;
        self.buffer[index / 8] |= 1 << (index % 8);
    }

    /// Send the packed buffer as one `DrawBw` frame.
    ///
    /// On failure the buffer is left unchanged, so the caller may retry the
    /// flush as-is.
    fn flush(&mut self) -> Result<(), MatrizError> {
        trace!("flushing bw frame ({} bytes)", self.buffer.len());
        write_command(&mut self.transport, Command::DrawBw, &self.buffer)
    }

    fn close(mut self) -> Result<(), MatrizError> {
        self.transport.close()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn matrix() -> BwMatrix<MockTransport> {
        BwMatrix::new(MockTransport::new())
    }

    // ── buffer layout ───────────────────────────────────────────────────

    #[test]
    fn fresh_buffer_is_all_zero() {
        let m = matrix();
        assert_eq!(m.buffer.len(), 39);
        assert!(m.buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn bit_index_law_at_boundaries() {
        // index = y*9 + x, byte index/8, bit index%8 (LSB first)
        let cases = [
            ((0, 0), 0usize, 0u32),  // index 0
            ((7, 0), 0, 7),          // index 7, last bit of byte 0
            ((8, 0), 1, 0),          // index 8, first bit of byte 1
            ((8, 33), 38, 1),        // index 305 = 9*34 - 1
        ];

        for ((x, y), byte, bit) in cases {
            let mut m = matrix();
            m.set_pixel(x, y);

            let expected = {
                let mut buf = vec![0u8; 39];
                buf[byte] = 1 << bit;
                buf
            };
            assert_eq!(m.buffer, expected, "pixel ({x},{y})");
        }
    }

    #[test]
    fn single_pixel_sets_exactly_one_bit() {
        let mut m = matrix();
        m.clear();
        m.set_pixel(3, 11);

        let ones: u32 = m.buffer.iter().map(|b| b.count_ones()).sum();
        assert_eq!(ones, 1);
    }

    #[test]
    fn set_pixel_never_clears() {
        let mut m = matrix();
        m.set_pixel(2, 2);
        let snapshot = m.buffer.clone();

        // Setting the same pixel again changes nothing
        m.set_pixel(2, 2);
        assert_eq!(m.buffer, snapshot);
    }

    #[test]
    fn out_of_bounds_is_a_no_op() {
        let mut m = matrix();
        m.set_pixel(1, 1);
        let snapshot = m.buffer.clone();

        m.set_pixel(-1, 0);
        m.set_pixel(0, -1);
        m.set_pixel(9, 0);
        m.set_pixel(0, 34);
        m.set_pixel(i32::MIN, i32::MAX);

        assert_eq!(m.buffer, snapshot);
    }

    #[test]
    fn clear_zeroes_everything() {
        let mut m = matrix();
        for y in 0..34 {
            m.set_pixel(0, y);
        }
        m.clear();
        assert!(m.buffer.iter().all(|&b| b == 0));
    }

    // ── flush ───────────────────────────────────────────────────────────

    #[test]
    fn flush_emits_one_full_frame() {
        let mut m = matrix();
        m.set_pixel(0, 0);
        m.flush().unwrap();

        let writes = m.transport.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].len(), 3 + 39);
        assert_eq!(&writes[0][..3], &[0x32, 0xAC, 0x06]);
        assert_eq!(writes[0][3], 0x01); // bit 0 of byte 0
    }

    #[test]
    fn failed_flush_leaves_buffer_for_retry() {
        let mut m = matrix();
        m.set_pixel(5, 5);
        let snapshot = m.buffer.clone();

        m.transport.fail_writes_after(0);
        assert!(m.flush().is_err());
        assert_eq!(m.buffer, snapshot);
    }

    #[test]
    fn close_releases_transport() {
        let m = matrix();
        m.close().unwrap();
    }
}
