//! # USB Serial Transport
//!
//! This module provides communication with LED matrix modules over their
//! USB CDC-ACM serial interface.
//!
//! ## Device Setup (Linux)
//!
//! The module enumerates as a USB serial device when plugged in:
//!
//! ```bash
//! $ dmesg | tail
//! cdc_acm 1-4.1:1.0: ttyACM0: USB ACM device
//!
//! # The device node usually belongs to the dialout group
//! $ ls -l /dev/ttyACM0
//! crw-rw---- 1 root dialout 166, 0 ... /dev/ttyACM0
//! ```
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so binary frames pass through
//! unmodified:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//! - **Blocking reads**: VMIN=1, VTIME=0 (a read waits for at least one byte)
//!
//! Disabling IXON/IXOFF/IXANY is critical: 0x11 (XON) and 0x13 (XOFF) are
//! perfectly ordinary pixel values in a frame buffer.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;

use log::debug;

use crate::error::MatrizError;
use crate::transport::Transport;

/// Default serial device path
pub const DEFAULT_DEVICE: &str = "/dev/ttyACM0";

/// Default baud rate for LED matrix modules
pub const DEFAULT_BAUD: u32 = 115_200;

/// # USB Serial Transport
///
/// Manages a connection to an LED matrix module over a serial device file.
///
/// ## Example
///
/// ```no_run
/// use matriz::protocol::commands;
/// use matriz::transport::SerialTransport;
///
/// let mut transport = SerialTransport::open("/dev/ttyACM0", 115_200)?;
///
/// // Query the module's sleep state
/// let asleep = commands::sleep_state(&mut transport)?;
/// println!("asleep: {asleep}");
///
/// # Ok::<(), matriz::error::MatrizError>(())
/// ```
pub struct SerialTransport {
    file: File,
}

impl SerialTransport {
    /// Open a serial connection to an LED matrix module.
    ///
    /// ## Parameters
    ///
    /// - `device`: Path to the serial device (e.g. "/dev/ttyACM0")
    /// - `baud`: Line speed in bits per second (see [`supported_baud`])
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need the dialout group)
    /// - The baud rate is not a supported POSIX speed
    /// - TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P, baud: u32) -> Result<Self, MatrizError> {
        let path = device.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                MatrizError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd(), baud)?;
        debug!("opened {} at {} baud", path.display(), baud);

        Ok(Self { file })
    }

    /// Open with the default device path and baud rate.
    pub fn open_default() -> Result<Self, MatrizError> {
        Self::open(DEFAULT_DEVICE, DEFAULT_BAUD)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize, MatrizError> {
        Ok(self.file.write(data)?)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MatrizError> {
        Ok(self.file.read(buf)?)
    }

    /// Flush pending output. The descriptor itself is released when the
    /// transport is dropped.
    fn close(&mut self) -> Result<(), MatrizError> {
        self.file.flush()?;
        debug!("closed serial transport");
        Ok(())
    }
}

/// Map a numeric baud rate to its POSIX speed constant.
///
/// Only the standard rates a CDC-ACM module will actually negotiate are
/// supported. Returns `None` for anything else.
fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    match baud {
        9_600 => Some(libc::B9600),
        19_200 => Some(libc::B19200),
        38_400 => Some(libc::B38400),
        57_600 => Some(libc::B57600),
        115_200 => Some(libc::B115200),
        230_400 => Some(libc::B230400),
        _ => None,
    }
}

/// Whether a numeric baud rate can be programmed on the device.
pub fn supported_baud(baud: u32) -> bool {
    baud_constant(baud).is_some()
}

/// Configure a file descriptor for raw TTY mode at the given speed.
///
/// This disables all input/output processing so binary frames pass through
/// unmodified, sets the line speed, and arranges for blocking reads.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
///
/// Note: IXON/IXOFF/IXANY disable XON/XOFF software flow control. This is
/// critical because 0x11 (XON/DC1) and 0x13 (XOFF/DC3) can appear in binary
/// pixel data.
#[cfg(unix)]
fn configure_tty_raw(fd: i32, baud: u32) -> Result<(), MatrizError> {
    use std::mem::MaybeUninit;

    let speed = baud_constant(baud)
        .ok_or_else(|| MatrizError::Transport(format!("Unsupported baud rate: {}", baud)))?;

    // Get current terminal attributes
    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(MatrizError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    // Input flags: disable all processing
    // IXON/IXOFF/IXANY: disable XON/XOFF flow control (0x11/0x13 occur in pixel data)
    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    // Output flags: disable post-processing
    termios.c_oflag &= !libc::OPOST;

    // Local flags: disable echo, canonical mode, signals
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    // Control flags: 8-bit characters, no parity
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    // Blocking reads: wait for at least one byte, no inter-byte timer
    termios.c_cc[libc::VMIN] = 1;
    termios.c_cc[libc::VTIME] = 0;

    // Line speed, both directions
    unsafe {
        libc::cfsetispeed(&mut termios, speed);
        libc::cfsetospeed(&mut termios, speed);
    }

    // Apply settings immediately
    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(MatrizError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32, _baud: u32) -> Result<(), MatrizError> {
    // On non-Unix platforms, skip TTY configuration
    // The device may work differently
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
