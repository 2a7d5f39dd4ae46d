//! # Matriz - LED Matrix Module Driver
//!
//! Matriz is a Rust library for driving LED matrix input modules over their
//! USB serial interface. It provides:
//!
//! - **Protocol implementation**: the module's framed binary command set
//! - **Two encoders**: 1-bit black & white and 8-bit greyscale frame buffers
//! - **Graphics**: line and rectangle rasterization over either encoder
//! - **Animation**: a fixed-cadence frame loop with a drawing callback
//! - **Transport**: raw-mode serial communication, plus a mock for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use matriz::graphics;
//! use matriz::matrix::{BwMatrix, Renderer};
//!
//! // Open the module's serial device
//! let mut matrix = BwMatrix::open("/dev/ttyACM0", 115_200)?;
//!
//! // Draw into the in-memory buffer
//! matrix.clear();
//! graphics::draw_rect(&mut matrix, 0, 0, 8, 33);
//! graphics::draw_line(&mut matrix, 0, 0, 8, 33);
//!
//! // Ship it to the panel
//! matrix.flush()?;
//! matrix.close()?;
//! # Ok::<(), matriz::error::MatrizError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Frame encoding, opcodes, control commands, patterns |
//! | [`matrix`] | Panel geometry, the `Renderer` trait, both encoders |
//! | [`graphics`] | Line and rectangle primitives |
//! | [`animation`] | Fixed-framerate callback loop |
//! | [`transport`] | Serial and mock byte channels |
//! | [`error`] | Error types |
//!
//! ## Supported Hardware
//!
//! Any LED matrix input module speaking the `0x32 0xAC` framed command
//! protocol over USB CDC-ACM; the panel geometry is the common 9×34 layout.

pub mod animation;
pub mod error;
pub mod graphics;
pub mod matrix;
pub mod protocol;
pub mod transport;

// Re-exports for convenience
pub use animation::{FrameControl, animate};
pub use error::MatrizError;
pub use matrix::{BwMatrix, GreyscaleMatrix, MATRIX_HEIGHT, MATRIX_WIDTH, Renderer};
pub use transport::{MockTransport, SerialTransport, Transport};
