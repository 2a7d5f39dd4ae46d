//! # LED Matrix Command Protocol
//!
//! This module implements the binary command protocol spoken by LED matrix
//! input modules over their serial interface.
//!
//! ## Protocol Overview
//!
//! Every message is a single frame:
//!
//! ```text
//! ┌──────┬──────┬────────┬─────────────────┐
//! │ 0x32 │ 0xAC │ opcode │ params (0+ B)   │
//! └──────┴──────┴────────┴─────────────────┘
//! ```
//!
//! The two magic bytes and the opcode are always present. Parameters may be
//! empty but are never omitted from the frame structure. There is no length
//! field, checksum, or resynchronization marker: the firmware knows each
//! opcode's parameter length, and any transport failure mid-frame is fatal
//! to the connection.
//!
//! Boolean "get" queries (sleep state, animation state) send the opcode with
//! zero parameters and read exactly one reply byte; non-zero means true.
//!
//! ## Module Layout
//!
//! - [`commands`]: frame encoding, the opcode table, and single-frame
//!   control helpers (brightness, sleep, animate, bootloader, panic)
//! - [`pattern`]: the firmware's pre-programmed pattern catalogue

pub mod commands;
pub mod pattern;

pub use commands::Command;
pub use pattern::Pattern;
