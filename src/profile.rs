//! Fixed capture, encoder and payloader settings.
//!
//! None of these come from the command line. They are applied once while the
//! pipeline is assembled and stay as they are for the life of the stream.

use crate::framework::PropertyValue;

/// Raw video format forced on the capture -> converter link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFormat {
    pub width: i32,
    pub height: i32,
    pub framerate_num: i32,
    pub framerate_den: i32,
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            framerate_num: 30,
            framerate_den: 1,
        }
    }
}

/// x264enc settings tuned for low latency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    pub tune: &'static str,
    pub key_int_max: i32,
    /// kbit/s
    pub bitrate: u32,
    pub speed_preset: &'static str,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            tune: "zerolatency",
            key_int_max: 15,
            bitrate: 1000,
            speed_preset: "ultrafast",
        }
    }
}

impl EncoderSettings {
    pub fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("tune", PropertyValue::Nick(self.tune)),
            ("key-int-max", PropertyValue::Int(self.key_int_max)),
            ("bitrate", PropertyValue::UInt(self.bitrate)),
            ("speed-preset", PropertyValue::Nick(self.speed_preset)),
        ]
    }
}

/// rtph264pay settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloaderSettings {
    /// Seconds between SPS/PPS insertions
    pub config_interval: i32,
    pub payload_type: u32,
}

impl Default for PayloaderSettings {
    fn default() -> Self {
        Self {
            config_interval: 1,
            payload_type: 96,
        }
    }
}

impl PayloaderSettings {
    pub fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("config-interval", PropertyValue::Int(self.config_interval)),
            ("pt", PropertyValue::UInt(self.payload_type)),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamProfile {
    pub capture: CaptureFormat,
    pub encoder: EncoderSettings,
    pub payloader: PayloaderSettings,
}
