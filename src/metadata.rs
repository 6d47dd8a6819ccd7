//! Plugin identity and capability metadata.
//!
//! Plain data: what a host asks about the plugin before it ever renders a
//! sample.

use serde::{Deserialize, Serialize};

/// Display budget for program names, in bytes.
pub const MAX_PROGRAM_NAME_LEN: usize = 24;
/// Display budget for parameter names, labels and value text, in bytes.
pub const MAX_PARAM_STR_LEN: usize = 8;
/// Display budget for the plugin name.
pub const MAX_EFFECT_NAME_LEN: usize = 32;
/// Display budget for vendor and product strings.
pub const MAX_VENDOR_STR_LEN: usize = 64;
/// Display budget for output pin labels.
pub const MAX_LABEL_LEN: usize = 64;

/// Capabilities answered with "yes".
pub const CAPABILITIES: [&str; 3] = ["receiveVstEvents", "receiveVstMidiEvent", "midiProgramNames"];

/// Cut `text` to at most `max` bytes without splitting a character.
pub fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Output pin description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinInfo {
    pub label: String,
    pub active: bool,
}

/// Identity and capability surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Four-character code
    pub unique_id: u32,
    pub name: String,
    pub vendor: String,
    pub product: String,
    pub vendor_version: i32,
    pub audio_inputs: usize,
    pub audio_outputs: usize,
    pub receives_midi: bool,
    pub midi_input_channels: usize,
    pub midi_output_channels: usize,
    /// One entry per output; only pin 0 exists for the mono synth.
    pub output_pins: Vec<PinInfo>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl PluginInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            unique_id: 0,
            product: name.clone(),
            name,
            vendor: String::new(),
            vendor_version: 1000,
            audio_inputs: 0,
            audio_outputs: 1,
            receives_midi: true,
            midi_input_channels: 9,
            midi_output_channels: 0,
            output_pins: vec![PinInfo {
                label: "1 Out".to_string(),
                active: true,
            }],
            capabilities: CAPABILITIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn unique_id(mut self, code: [u8; 4]) -> Self {
        self.unique_id = u32::from_be_bytes(code);
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    pub fn vendor_version(mut self, version: i32) -> Self {
        self.vendor_version = version;
        self
    }

    /// Whether the plugin answers "yes" to a host capability query.
    pub fn can_do(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Pin properties for output `index`; `None` past the last pin.
    pub fn output_pin(&self, index: usize) -> Option<&PinInfo> {
        self.output_pins.get(index)
    }

    pub fn effect_name(&self) -> String {
        truncate(&self.name, MAX_EFFECT_NAME_LEN)
    }

    pub fn vendor_string(&self) -> String {
        truncate(&self.vendor, MAX_VENDOR_STR_LEN)
    }

    pub fn product_string(&self) -> String {
        truncate(&self.product, MAX_VENDOR_STR_LEN)
    }
}

impl Default for PluginInfo {
    fn default() -> Self {
        Self::new("VST2413")
            .unique_id(*b"OPLL")
            .vendor("RadiumSoftware")
    }
}
