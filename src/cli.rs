use clap::Parser;

use crate::config::StreamConfig;

#[derive(Parser, Debug)]
#[command(name = "h264-udp-streamer")]
#[command(about = "Stream a V4L2 camera as H.264 over RTP/UDP", long_about = None)]
// Every token is a positional value, `-12` and `--help` included
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Destination IP address. Default 127.0.0.1.
    #[arg(allow_hyphen_values = true)]
    pub address: Option<String>,

    /// Destination UDP port. Default 5000.
    #[arg(allow_hyphen_values = true)]
    pub port: Option<String>,

    /// Capture device path. Default /dev/video0.
    #[arg(allow_hyphen_values = true)]
    pub device: Option<String>,

    /// Anything past the third value is ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

impl Cli {
    /// Turns the positional values into a `StreamConfig`, warning about
    /// (but otherwise ignoring) surplus arguments.
    pub fn into_config(self) -> StreamConfig {
        if !self.extra.is_empty() {
            log::warn!(
                "Check input variables: ignoring {} extra argument(s) {:?}",
                self.extra.len(),
                self.extra
            );
        }

        StreamConfig::from_positional(self.address, self.port, self.device)
    }
}
