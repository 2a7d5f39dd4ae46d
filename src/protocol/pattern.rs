//! # Pre-programmed Patterns
//!
//! The LED matrix firmware ships a small catalogue of built-in patterns
//! that can be displayed with a single command, no pixel data required.
//!
//! ## Pattern Table
//!
//! | Pattern | Id | Extra param |
//! |---------|----|-------------|
//! | Percentage | 0x00 | 1 byte, 0-100 |
//! | Gradient | 0x01 | none |
//! | DoubleGradient | 0x02 | none |
//! | LotusHorizontal | 0x03 | none |
//! | ZigZag | 0x04 | none |
//! | FullBrightness | 0x05 | none |
//! | Panic | 0x06 | none |
//! | LotusVertical | 0x07 | none |

use crate::error::MatrizError;
use crate::protocol::commands::{Command, write_command};
use crate::transport::Transport;

/// Pre-programmed patterns built into the LED matrix firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Pattern {
    /// Progress indicator driven by a percentage parameter
    Percentage = 0x00,
    /// Brightness gradient from top to bottom
    Gradient = 0x01,
    /// Brightness gradient from the middle out to both top and bottom
    DoubleGradient = 0x02,
    /// The text "LOTUS" horizontally across the matrix
    LotusHorizontal = 0x03,
    /// A zigzag pattern
    ZigZag = 0x04,
    /// All LEDs at 100% brightness
    FullBrightness = 0x05,
    /// The text "PANIC" across the matrix
    Panic = 0x06,
    /// The text "LOTUS" vertically across the matrix
    LotusVertical = 0x07,
}

/// # Display a Pre-programmed Pattern (0x01)
///
/// Shows one of the firmware's built-in patterns.
///
/// | Format | Bytes |
/// |--------|-------|
/// | Hex    | 32 AC 01 id [pct] |
///
/// Only [`Pattern::Percentage`] takes the extra byte; `percentage` is
/// clamped to 100 and ignored for every other pattern.
///
/// ## Example
///
/// ```
/// use matriz::protocol::pattern::{Pattern, show_pattern};
/// use matriz::transport::MockTransport;
///
/// let mut transport = MockTransport::new();
/// show_pattern(&mut transport, Pattern::Percentage, 42)?;
///
/// assert_eq!(transport.writes(), &[vec![0x32, 0xAC, 0x01, 0x00, 42]]);
/// # Ok::<(), matriz::error::MatrizError>(())
/// ```
pub fn show_pattern<T: Transport>(
    transport: &mut T,
    pattern: Pattern,
    percentage: u8,
) -> Result<(), MatrizError> {
    let mut params = vec![pattern as u8];

    if pattern == Pattern::Percentage {
        params.push(percentage.min(100));
    }

    write_command(transport, Command::Pattern, &params)
}
