//! Frame downlink (robot to operator)
//!
//! A persistent TCP connection the operator subscribes on; the robot pushes
//! one frame message per video tick. Reads are timeout-bounded so the
//! receive loop can check the run flag and never hangs teardown on a stalled
//! stream. Once the length prefix has been read the payload read switches to
//! a longer timeout, otherwise a partial read would leave the stream
//! misaligned.

use crate::error::{Error, Result};
use crate::protocol::{FrameMessage, MAX_FRAME_BYTES};
use std::io::Read;
use std::net::TcpStream;
use std::time::Duration;

/// Initial receive buffer size; grows on demand up to [`MAX_FRAME_BYTES`]
const INITIAL_BUFFER_SIZE: usize = 64 * 1024;

/// Timeout for reading a payload once its length prefix has arrived
const PAYLOAD_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Subscribe-style frame stream from the robot
pub struct FrameDownlink {
    stream: TcpStream,
    buffer: Vec<u8>,
    /// Length prefix accumulator; a prefix split across read timeouts must
    /// not leave the stream misaligned
    len_buf: [u8; 4],
    len_read: usize,
}

impl FrameDownlink {
    /// Connect to the robot's frame port.
    ///
    /// Failure here is fatal at startup; after a mid-stream disconnect the
    /// receive loop calls this again to resume delivery.
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(|source| Error::Connect {
            addr: addr.to_string(),
            source,
        })?;
        log::info!("Frame downlink connected to {}", addr);
        Ok(Self {
            stream,
            buffer: vec![0u8; INITIAL_BUFFER_SIZE],
            len_buf: [0u8; 4],
            len_read: 0,
        })
    }

    /// Receive the next frame, waiting at most `timeout`.
    ///
    /// Returns `Ok(None)` when no frame arrived within the timeout,
    /// [`Error::Disconnected`] when the robot closed the connection, and
    /// [`Error::FrameDecode`] for a malformed message (the caller drops it
    /// and keeps receiving).
    pub fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<FrameMessage>> {
        self.stream.set_read_timeout(Some(timeout))?;

        // Accumulate the prefix across calls: a timeout after a partial
        // read keeps the bytes already consumed, so the next call resumes
        // where this one stopped instead of misreading the stream
        while self.len_read < 4 {
            match self.stream.read(&mut self.len_buf[self.len_read..]) {
                Ok(0) => return Err(Error::Disconnected),
                Ok(n) => self.len_read += n,
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return Ok(None),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if is_disconnect(&e) => return Err(Error::Disconnected),
                Err(e) => return Err(Error::Io(e)),
            }
        }
        self.len_read = 0;

        let len = u32::from_be_bytes(self.len_buf) as usize;
        if len > MAX_FRAME_BYTES {
            return Err(Error::FrameTooLarge(len));
        }
        if len > self.buffer.len() {
            self.buffer.resize(len, 0);
        }

        // Committed to a message now; a timeout mid-payload would corrupt
        // the stream, so allow a generous window
        self.stream.set_read_timeout(Some(PAYLOAD_READ_TIMEOUT))?;
        match self.stream.read_exact(&mut self.buffer[..len]) {
            Ok(()) => {}
            Err(e) if is_disconnect(&e) => return Err(Error::Disconnected),
            Err(e) => return Err(Error::Io(e)),
        }

        FrameMessage::parse(&self.buffer[..len]).map(Some)
    }
}

fn is_disconnect(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::ConnectionReset
    )
}
