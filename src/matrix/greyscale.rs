//! # 8-bit Greyscale Encoder
//!
//! [`GreyscaleMatrix`] draws per-pixel intensity data. The module's
//! greyscale protocol is a two-phase commit: each of the 9 columns is
//! staged with its own `StageColumn` frame, then a single parameterless
//! `FlushColumns` frame makes the staged image visible.
//!
//! ## Buffer Layout
//!
//! One byte per pixel, **column-major**:
//!
//! ```text
//! index = x * 34 + y
//!
//! (0,0) → byte 0
//! (0,33) → byte 33
//! (1,0) → byte 34
//! (8,33) → byte 305
//! ```
//!
//! This is deliberately different from the row-major 1-bit layout: the
//! staging protocol sends whole columns, and storing them contiguously
//! makes each `StageColumn` frame a straight slice of the buffer.
//!
//! ## Brightness
//!
//! The encoder holds a current brightness byte. `set_pixel` stores the
//! value in effect at call time; changing the brightness afterwards does
//! not touch pixels that were already set.

use std::path::Path;

use log::trace;

use crate::error::MatrizError;
use crate::matrix::{GS_BUFFER_SIZE, MATRIX_HEIGHT, MATRIX_WIDTH, Renderer};
use crate::protocol::commands::{Command, write_command};
use crate::transport::{SerialTransport, Transport};

/// Brightness a fresh encoder starts with (full intensity).
pub const DEFAULT_BRIGHTNESS: u8 = 0xFF;

/// A tool for drawing 8-bit greyscale pixel data on an LED matrix module.
///
/// ## Example
///
/// ```no_run
/// use matriz::matrix::{GreyscaleMatrix, Renderer};
///
/// let mut matrix = GreyscaleMatrix::open("/dev/ttyACM0", 115_200)?;
/// matrix.set_brightness(0x40);
/// matrix.set_pixel(4, 17); // stored at quarter intensity
/// matrix.flush()?;
/// matrix.close()?;
/// # Ok::<(), matriz::error::MatrizError>(())
/// ```
pub struct GreyscaleMatrix<T: Transport> {
    transport: T,
    buffer: Vec<u8>,
    brightness: u8,
}

impl GreyscaleMatrix<SerialTransport> {
    /// Open the serial device at `device`/`baud` and initialize an encoder
    /// on it.
    pub fn open<P: AsRef<Path>>(device: P, baud: u32) -> Result<Self, MatrizError> {
        Ok(Self::new(SerialTransport::open(device, baud)?))
    }
}

impl<T: Transport> GreyscaleMatrix<T> {
    /// Create an encoder over a caller-supplied transport, starting at
    /// [`DEFAULT_BRIGHTNESS`].
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            buffer: vec![0; GS_BUFFER_SIZE],
            brightness: DEFAULT_BRIGHTNESS,
        }
    }

    /// Consume the encoder and hand back its transport, e.g. to reuse the
    /// port for control commands.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// The brightness applied by subsequent `set_pixel` calls.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set the brightness applied by subsequent `set_pixel` calls.
    ///
    /// The value is a raw intensity byte, not clamped, and has no effect on
    /// pixels already in the buffer.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
    }

    /// Parameter bytes for one `StageColumn` frame: the column index
    /// followed by that column's 34 pixel bytes.
    fn column_params(&self, column: usize) -> Vec<u8> {
        let mut params = Vec::with_capacity(1 + MATRIX_HEIGHT);
        params.push(column as u8);
        params.extend_from_slice(&self.buffer[column * MATRIX_HEIGHT..(column + 1) * MATRIX_HEIGHT]);
        params
    }
}

impl<T: Transport> Renderer for GreyscaleMatrix<T> {
    /// Zero every pixel. The brightness setting is untouched.
    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn set_pixel(&mut self, x: i32, y: i32) {
        if x < 0 || x >= MATRIX_WIDTH as i32 || y < 0 || y >= MATRIX_HEIGHT as i32 {
            return;
        }

        let index = x as usize * MATRIX_HEIGHT + y as usize;
        self.buffer[index] = self.brightness;
    }

    /// Stage all 9 columns, then commit them with one `FlushColumns` frame.
    ///
    /// A failure on any column aborts immediately and propagates; columns
    /// already staged are not rolled back, so the module holds a partially
    /// staged image until the next successful flush.
    fn flush(&mut self) -> Result<(), MatrizError> {
        for column in 0..MATRIX_WIDTH {
            trace!("staging greyscale column {column}");
            let params = self.column_params(column);
            write_command(
                &mut self.transport,
                Command::StageColumn,
                &params,
            )?;
        }
        write_command(&mut self.transport, Command::FlushColumns, &[])
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

    fn matrix() -> GreyscaleMatrix<MockTransport> {
        GreyscaleMatrix::new(MockTransport::new())
    }

    // ── buffer layout ───────────────────────────────────────────────────

    #[test]
    fn fresh_buffer_is_all_zero() {
        let m = matrix();
        assert_eq!(m.buffer.len(), 306);
        assert!(m.buffer.iter().all(|&b| b == 0));
    }

    #[test]
    fn column_major_index_law_at_boundaries() {
        // index = x*34 + y, one byte per pixel
        let cases = [
            ((0, 0), 0usize),
            ((0, 7), 7),
            ((0, 8), 8),
            ((1, 0), 34),
            ((8, 33), 305),
        ];

        for ((x, y), index) in cases {
            let mut m = matrix();
            m.set_brightness(0x5A);
            m.set_pixel(x, y);

            let expected = {
                let mut buf = vec![0u8; 306];
                buf[index] = 0x5A;
                buf
            };
            assert_eq!(m.buffer, expected, "pixel ({x},{y})");
        }
    }

    #[test]
    fn single_pixel_reads_back_brightness() {
        let mut m = matrix();
        m.set_brightness(0x33);
        m.clear();
        m.set_pixel(2, 20);

        let lit: Vec<_> = m.buffer.iter().filter(|&&b| b != 0).collect();
        assert_eq!(lit, vec![&0x33]);
    }

    #[test]
    fn pixel_keeps_brightness_from_call_time() {
        let mut m = matrix();
        m.set_brightness(0x10);
        m.set_pixel(0, 0);
        m.set_brightness(0xF0);
        m.set_pixel(1, 0);

        assert_eq!(m.buffer[0], 0x10); // unchanged by the later setting
        assert_eq!(m.buffer[34], 0xF0);
    }

    #[test]
    fn out_of_bounds_is_a_no_op() {
        let mut m = matrix();
        m.set_pixel(3, 3);
        let snapshot = m.buffer.clone();

        m.set_pixel(-1, 0);
        m.set_pixel(0, -1);
        m.set_pixel(9, 0);
        m.set_pixel(0, 34);

        assert_eq!(m.buffer, snapshot);
    }

    #[test]
    fn clear_preserves_brightness_setting() {
        let mut m = matrix();
        m.set_brightness(0x77);
        m.set_pixel(0, 0);
        m.clear();

        assert!(m.buffer.iter().all(|&b| b == 0));
        assert_eq!(m.brightness(), 0x77);
    }

    #[test]
    fn brightness_accessor_round_trips() {
        let mut m = matrix();
        assert_eq!(m.brightness(), DEFAULT_BRIGHTNESS);
        m.set_brightness(0);
        assert_eq!(m.brightness(), 0);
    }

    // ── flush ───────────────────────────────────────────────────────────

    #[test]
    fn flush_stages_every_column_then_commits() {
        let mut m = matrix();
        m.flush().unwrap();

        let writes = m.transport.writes();
        assert_eq!(writes.len(), 10); // 9 columns + 1 commit

        for (column, frame) in writes[..9].iter().enumerate() {
            assert_eq!(frame.len(), 3 + 1 + 34);
            assert_eq!(&frame[..3], &[0x32, 0xAC, 0x07]);
            assert_eq!(frame[3], column as u8);
        }
        assert_eq!(writes[9], vec![0x32, 0xAC, 0x08]);
    }

    #[test]
    fn staged_column_carries_buffer_slice() {
        let mut m = matrix();
        m.set_brightness(0xAB);
        m.set_pixel(2, 5);
        m.flush().unwrap();

        let frame = &m.transport.writes()[2];
        assert_eq!(frame[3], 2); // column index
        assert_eq!(frame[4 + 5], 0xAB); // row 5 of column 2
    }

    #[test]
    fn failed_column_aborts_without_commit() {
        let mut m = matrix();
        m.transport.fail_writes_after(4);

        assert!(m.flush().is_err());

        // Four columns went out; no commit frame follows the failure.
        let writes = m.transport.writes();
        assert_eq!(writes.len(), 4);
        assert!(writes.iter().all(|w| w[2] == 0x07));
    }

    #[test]
    fn close_releases_transport() {
        let m = matrix();
        m.close().unwrap();
    }
}
