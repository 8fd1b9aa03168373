//! Stream configuration built from the positional command line values

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DEVICE: &str = "/dev/video0";

/// Where to capture from and where to send the RTP stream.
///
/// Set once at startup and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// UDP destination host
    pub host: String,

    /// UDP destination port
    pub port: u16,

    /// V4L2 capture device path
    pub device: PathBuf,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            device: PathBuf::from(DEFAULT_DEVICE),
        }
    }
}

impl StreamConfig {
    /// Builds a configuration from up to three positional values
    /// (address, port, device). Missing trailing values keep their defaults.
    pub fn from_positional(
        address: Option<String>,
        port: Option<String>,
        device: Option<String>,
    ) -> Self {
        let mut config = Self::default();

        if let Some(address) = address {
            config.host = address;
        }
        if let Some(port) = port {
            config.port = parse_port(&port);
        }
        if let Some(device) = device {
            config.device = PathBuf::from(device);
        }

        config
    }
}

/// Reads a port the way `atoi` would: leading whitespace, an optional sign,
/// then the leading run of digits. No digits yields 0. Out of range values
/// are clamped into `0..=65535`.
pub fn parse_port(raw: &str) -> u16 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(rest, |(idx, _)| &rest[..idx]);

    if digits.is_empty() {
        log::warn!("Port '{}' is not a number, using 0", raw);
        return 0;
    }
    if digits.len() != rest.len() {
        log::warn!("Port '{}' has trailing characters, using {}", raw, digits);
    }

    // Anything longer than 5 digits is out of range anyway
    let value: u64 = digits.parse().unwrap_or(u64::MAX);
    if negative && value != 0 {
        log::warn!("Port '{}' is negative, clamping to 0", raw);
        return 0;
    }

    match u16::try_from(value) {
        Ok(port) => port,
        Err(_) => {
            log::warn!("Port '{}' is out of range, clamping to {}", raw, u16::MAX);
            u16::MAX
        }
    }
}
