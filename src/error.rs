//! Error types for drishti-teleop

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Teleop console error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Connection establishment failed (fatal at startup)
    #[error("Connection to {addr} failed: {source}")]
    Connect {
        /// Address we tried to reach
        addr: String,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// Peer closed the connection
    #[error("Connection closed by peer")]
    Disconnected,

    /// Command serialization failed
    #[error("Command encode error: {0}")]
    CommandEncode(#[from] rmp_serde::encode::Error),

    /// Command deserialization failed
    #[error("Command decode error: {0}")]
    CommandDecode(#[from] rmp_serde::decode::Error),

    /// Malformed frame message on the downlink
    #[error("Frame decode error: {0}")]
    FrameDecode(String),

    /// Frame message exceeds the wire size limit
    #[error("Frame too large: {0} bytes")]
    FrameTooLarge(usize),

    /// Configuration file error
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Frame capture to disk failed
    #[error("Capture failed: {0}")]
    Capture(String),

    /// Display sink error
    #[error("Display error: {0}")]
    Display(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
