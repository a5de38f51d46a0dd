//! Command uplink (operator to robot)
//!
//! A persistent TCP connection carrying drive commands in send order.
//! Pure push: there is no request/reply and no acknowledgment. A stale
//! retry is actively undesirable for a real-time control surface, so the
//! caller logs and drops on send failure instead of retrying.

use crate::error::{Error, Result};
use crate::protocol::DriveCommand;
use std::io::Write;
use std::net::TcpStream;

/// Push-only command connection to the robot
#[derive(Debug)]
pub struct CommandUplink {
    stream: TcpStream,
}

impl CommandUplink {
    /// Connect to the robot's command port.
    ///
    /// Failure here is fatal and must be reported before any loop starts.
    pub fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).map_err(|source| Error::Connect {
            addr: addr.to_string(),
            source,
        })?;
        // Commands are tiny and latency-sensitive
        stream.set_nodelay(true)?;
        log::info!("Command uplink connected to {}", addr);
        Ok(Self { stream })
    }

    /// Send one command, fire-and-forget.
    ///
    /// Wire format: 4-byte big-endian length, then the MessagePack payload.
    pub fn send(&mut self, cmd: &DriveCommand) -> Result<()> {
        let payload = cmd.encode()?;
        let mut buf = Vec::with_capacity(4 + payload.len());
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(&payload);
        self.stream.write_all(&buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ANGLE_RIGHT;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn test_send_frames_command_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut len_buf = [0u8; 4];
            stream.read_exact(&mut len_buf).unwrap();
            let len = u32::from_be_bytes(len_buf) as usize;
            let mut payload = vec![0u8; len];
            stream.read_exact(&mut payload).unwrap();
            DriveCommand::decode(&payload).unwrap()
        });

        let mut uplink = CommandUplink::connect(&addr.to_string()).unwrap();
        let cmd = DriveCommand {
            speed: -45,
            angle: ANGLE_RIGHT,
        };
        uplink.send(&cmd).unwrap();

        assert_eq!(server.join().unwrap(), cmd);
    }

    #[test]
    fn test_commands_arrive_in_send_order() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut received = Vec::new();
            for _ in 0..3 {
                let mut len_buf = [0u8; 4];
                stream.read_exact(&mut len_buf).unwrap();
                let mut payload = vec![0u8; u32::from_be_bytes(len_buf) as usize];
                stream.read_exact(&mut payload).unwrap();
                received.push(DriveCommand::decode(&payload).unwrap());
            }
            received
        });

        let mut uplink = CommandUplink::connect(&addr.to_string()).unwrap();
        let sent: Vec<DriveCommand> = (1..=3)
            .map(|i| DriveCommand {
                speed: i * 10,
                angle: 0,
            })
            .collect();
        for cmd in &sent {
            uplink.send(cmd).unwrap();
        }

        assert_eq!(server.join().unwrap(), sent);
    }

    #[test]
    fn test_connect_failure_is_fatal_error() {
        // Nothing listens on this port
        let err = CommandUplink::connect("127.0.0.1:1").unwrap_err();
        assert!(matches!(err, Error::Connect { .. }));
    }
}
