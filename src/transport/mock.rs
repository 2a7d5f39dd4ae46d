//! # Mock Transport
//!
//! An in-memory [`Transport`] for tests and golden files. It records every
//! write as a separate byte vector (the protocol layer sends one frame per
//! write, so tests can count and inspect frames directly) and serves
//! queued reply bytes to reads.
//!
//! Failure injection knobs cover the interesting transport behaviors:
//! short writes, write errors after N frames, and reads split into small
//! chunks.

use std::collections::VecDeque;

use crate::error::MatrizError;
use crate::transport::Transport;

/// In-memory transport that records frames and serves canned replies.
///
/// ## Example
///
/// ```
/// use matriz::protocol::commands;
/// use matriz::transport::MockTransport;
///
/// let mut transport = MockTransport::new();
/// commands::enter_bootloader(&mut transport)?;
///
/// assert_eq!(transport.writes(), &[vec![0x32, 0xAC, 0x02]]);
/// # Ok::<(), matriz::error::MatrizError>(())
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    writes: Vec<Vec<u8>>,
    replies: VecDeque<u8>,
    write_cap: Option<usize>,
    fail_writes_after: Option<usize>,
    read_cap: Option<usize>,
    closed: bool,
}

impl MockTransport {
    /// Create an empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write performed so far, one entry per call.
    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    /// Queue bytes to be served to subsequent reads.
    pub fn queue_reply(&mut self, bytes: &[u8]) {
        self.replies.extend(bytes);
    }

    /// Accept at most `cap` bytes per write (simulates a short write).
    pub fn cap_writes(&mut self, cap: usize) {
        self.write_cap = Some(cap);
    }

    /// Fail with a transport error after `n` successful writes.
    pub fn fail_writes_after(&mut self, n: usize) {
        self.fail_writes_after = Some(n);
    }

    /// Serve at most `cap` bytes per read (simulates trickling input).
    pub fn cap_reads(&mut self, cap: usize) {
        self.read_cap = Some(cap);
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize, MatrizError> {
        if let Some(remaining) = self.fail_writes_after {
            if remaining == 0 {
                return Err(MatrizError::Transport("injected write failure".into()));
            }
            self.fail_writes_after = Some(remaining - 1);
        }

        let accepted = self.write_cap.map_or(data.len(), |cap| cap.min(data.len()));
        self.writes.push(data[..accepted].to_vec());
        Ok(accepted)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, MatrizError> {
        if self.replies.is_empty() {
            return Err(MatrizError::Transport("no queued reply bytes".into()));
        }

        let limit = self.read_cap.map_or(buf.len(), |cap| cap.min(buf.len()));
        let mut count = 0;
        while count < limit {
            match self.replies.pop_front() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn close(&mut self) -> Result<(), MatrizError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_one_entry_per_write() {
        let mut transport = MockTransport::new();
        transport.write(&[1, 2, 3]).unwrap();
        transport.write(&[4]).unwrap();

        assert_eq!(transport.writes(), &[vec![1, 2, 3], vec![4]]);
    }

    #[test]
    fn capped_write_reports_short_count() {
        let mut transport = MockTransport::new();
        transport.cap_writes(2);

        let written = transport.write(&[1, 2, 3, 4]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(transport.writes(), &[vec![1, 2]]);
    }

    #[test]
    fn injected_failure_after_n_writes() {
        let mut transport = MockTransport::new();
        transport.fail_writes_after(1);

        assert!(transport.write(&[1]).is_ok());
        assert!(transport.write(&[2]).is_err());
        assert_eq!(transport.writes().len(), 1);
    }

    #[test]
    fn reads_drain_queued_replies() {
        let mut transport = MockTransport::new();
        transport.queue_reply(&[0xAA, 0xBB]);

        let mut buf = [0u8; 4];
        let count = transport.read(&mut buf).unwrap();
        assert_eq!(count, 2);
        assert_eq!(&buf[..2], &[0xAA, 0xBB]);
    }

    #[test]
    fn capped_reads_trickle() {
        let mut transport = MockTransport::new();
        transport.queue_reply(&[1, 2, 3]);
        transport.cap_reads(1);

        let mut buf = [0u8; 4];
        assert_eq!(transport.read(&mut buf).unwrap(), 1);
        assert_eq!(transport.read(&mut buf).unwrap(), 1);
    }

    #[test]
    fn read_with_nothing_queued_errors() {
        let mut transport = MockTransport::new();
        let mut buf = [0u8; 1];
        assert!(transport.read(&mut buf).is_err());
    }

    #[test]
    fn close_is_recorded() {
        let mut transport = MockTransport::new();
        assert!(!transport.is_closed());
        transport.close().unwrap();
        assert!(transport.is_closed());
    }
}
