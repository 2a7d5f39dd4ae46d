//! # Protocol Commands
//!
//! Frame encoding and the single-frame control commands of the LED matrix
//! protocol.
//!
//! ## Frame Structure
//!
//! All commands follow the pattern:
//!
//! 1. Magic bytes `0x32 0xAC`
//! 2. One opcode byte
//! 3. Zero or more parameter bytes (length fixed per opcode)
//!
//! ## Opcode Table
//!
//! | Opcode | Value | Params |
//! |--------|-------|--------|
//! | Brightness | 0x00 | 1 byte level |
//! | Pattern | 0x01 | 1 byte id, +1 byte iff percentage pattern |
//! | Bootloader | 0x02 | none |
//! | Sleep | 0x03 | 0 (get) or 1 (set) byte |
//! | Animate | 0x04 | 0 (get) or 1 (set) byte |
//! | Panic | 0x05 | none |
//! | DrawBw | 0x06 | packed 1-bit buffer, 39 bytes |
//! | StageColumn | 0x07 | 1 byte column index + 34 column bytes |
//! | FlushColumns | 0x08 | none |
//!
//! ## Error Model
//!
//! Every frame is sent with exactly one transport write. A short or failed
//! write surfaces immediately as an error; there is no retry or partial-frame
//! recovery anywhere in this layer, and the caller must treat any write
//! failure as connection-fatal.

use crate::error::MatrizError;
use crate::transport::Transport;

// ============================================================================
// FRAME CONSTANTS
// ============================================================================

/// First magic byte of every frame
pub const MAGIC_HIGH: u8 = 0x32;

/// Second magic byte of every frame
pub const MAGIC_LOW: u8 = 0xAC;

/// Command opcodes understood by the LED matrix firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Set the global LED brightness
    Brightness = 0x00,
    /// Display a pre-programmed pattern (see [`crate::protocol::pattern`])
    Pattern = 0x01,
    /// Jump to the bootloader for firmware updates
    Bootloader = 0x02,
    /// Get or set the sleep state
    Sleep = 0x03,
    /// Get or set the firmware's built-in animation scrolling
    Animate = 0x04,
    /// Cause a firmware panic
    Panic = 0x05,
    /// Draw a 1-bit black & white image
    DrawBw = 0x06,
    /// Stage one greyscale column of pixels
    StageColumn = 0x07,
    /// Display all staged greyscale columns
    FlushColumns = 0x08,
}

// ============================================================================
// FRAME ENCODING
// ============================================================================

/// Encode a complete protocol frame.
///
/// Deterministically produces `[0x32, 0xAC, opcode] ++ params`. Pass an
/// empty slice when the command takes no parameters.
///
/// ## Example
///
/// ```
/// use matriz::protocol::{Command, commands};
///
/// assert_eq!(commands::frame(Command::Panic, &[]), vec![0x32, 0xAC, 0x05]);
/// assert_eq!(
///     commands::frame(Command::Brightness, &[0x80]),
///     vec![0x32, 0xAC, 0x00, 0x80],
/// );
/// ```
#[inline]
pub fn frame(command: Command, params: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(3 + params.len());
    buf.push(MAGIC_HIGH);
    buf.push(MAGIC_LOW);
    buf.push(command as u8);
    buf.extend_from_slice(params);
    buf
}

/// Send one command frame over the transport.
///
/// The frame goes out in a single write. If the transport accepts fewer
/// bytes than the frame contains, this fails with
/// [`MatrizError::ShortWrite`]; the module is then mid-frame and the
/// connection cannot be recovered.
pub fn write_command<T: Transport>(
    transport: &mut T,
    command: Command,
    params: &[u8],
) -> Result<(), MatrizError> {
    let buf = frame(command, params);
    let written = transport.write(&buf)?;

    if written != buf.len() {
        return Err(MatrizError::ShortWrite {
            written,
            expected: buf.len(),
        });
    }
    Ok(())
}

/// Read from the transport until `buf` is completely filled.
///
/// Accumulates across as many reads as it takes. The first transport error
/// propagates immediately, discarding any bytes already collected: with no
/// resynchronization marker in the protocol, a partial reply is useless.
pub fn read_exact<T: Transport>(transport: &mut T, buf: &mut [u8]) -> Result<(), MatrizError> {
    let mut received = 0;

    while received < buf.len() {
        let count = transport.read(&mut buf[received..])?;
        if count == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "transport closed mid-reply",
            )
            .into());
        }
        received += count;
    }
    Ok(())
}

/// Send a parameterless query and interpret the one-byte reply as a bool.
fn query_bool<T: Transport>(transport: &mut T, command: Command) -> Result<bool, MatrizError> {
    write_command(transport, command, &[])?;

    let mut reply = [0u8; 1];
    read_exact(transport, &mut reply)?;

    Ok(reply[0] != 0)
}

// ============================================================================
// CONTROL COMMANDS
// ============================================================================

/// # Set Brightness (0x00)
///
/// Sets the global brightness applied to all lit pixels.
///
/// | Format | Bytes |
/// |--------|-------|
/// | Hex    | 32 AC 00 n |
///
/// `level` is the raw PWM level, 0 (off) to 255 (full). It scales the whole
/// panel; per-pixel greyscale values are multiplied under it.
pub fn set_brightness<T: Transport>(transport: &mut T, level: u8) -> Result<(), MatrizError> {
    write_command(transport, Command::Brightness, &[level])
}

/// # Set Sleep State (0x03 + 1 byte)
///
/// If `sleep` is true, blanks the panel and idles the firmware until woken
/// with `set_sleep(false)`.
///
/// | Format | Bytes |
/// |--------|-------|
/// | Hex    | 32 AC 03 n |
pub fn set_sleep<T: Transport>(transport: &mut T, sleep: bool) -> Result<(), MatrizError> {
    write_command(transport, Command::Sleep, &[u8::from(sleep)])
}

/// # Query Sleep State (0x03, no params)
///
/// Returns true if the module is currently sleeping. Sends the opcode with
/// no parameters, then reads one reply byte (non-zero = asleep).
pub fn sleep_state<T: Transport>(transport: &mut T) -> Result<bool, MatrizError> {
    query_bool(transport, Command::Sleep)
}

/// # Enable/Disable Built-in Animation (0x04 + 1 byte)
///
/// When enabled, the firmware scrolls through its pre-programmed animations
/// on its own until disabled. This is a firmware-side feature, unrelated to
/// the host-driven frame loop in [`crate::animation`].
///
/// | Format | Bytes |
/// |--------|-------|
/// | Hex    | 32 AC 04 n |
pub fn set_animation<T: Transport>(transport: &mut T, enabled: bool) -> Result<(), MatrizError> {
    write_command(transport, Command::Animate, &[u8::from(enabled)])
}

/// # Query Built-in Animation State (0x04, no params)
///
/// Returns true if the firmware is currently running its built-in
/// animation. One reply byte, non-zero = animating.
pub fn animation_state<T: Transport>(transport: &mut T) -> Result<bool, MatrizError> {
    query_bool(transport, Command::Animate)
}

/// # Jump to Bootloader (0x02)
///
/// Reboots the module into its bootloader so new firmware can be flashed.
/// The serial device disappears and re-enumerates; this transport is dead
/// afterwards.
pub fn enter_bootloader<T: Transport>(transport: &mut T) -> Result<(), MatrizError> {
    write_command(transport, Command::Bootloader, &[])
}

/// # Cause a Firmware Panic (0x05)
///
/// Makes the firmware panic on purpose. Only useful for testing the
/// module's crash behavior.
pub fn trigger_panic<T: Transport>(transport: &mut T) -> Result<(), MatrizError> {
    write_command(transport, Command::Panic, &[])
}

// ============================================================================
// TESTS
// ============================================================================
