//! This module contains global constants shared by the graph, strip and poller modules.

/// Fear & Greed index endpoint.
pub const FNG_URL: &str = "https://api.alternative.me/fng/";

/// Pixels on the LED SHIM style strip.
pub const NUM_PIXELS: usize = 28;
/// Top of the index scale.
pub const MAX_VALUE: f32 = 100.0;
/// Largest configurable full scale; a swipe renders one frame per unit.
pub const MAX_VALUE_LIMIT: f32 = 10_000.0;

/// Gradient starts at red-orange...
pub const HUE_START: f32 = 10.0;
/// ...and sweeps this many degrees toward green.
pub const HUE_RANGE: f32 = 80.0;
/// Brightness of a lit pixel, 0.0 - 1.0.
pub const MAX_BRIGHTNESS: f32 = 0.8;

// poll scheduling, seconds
pub const MIN_DELAY_SECS: i64 = 30;
pub const MAX_DELAY_SECS: i64 = 3600;
pub const RETRY_DELAY_SECS: i64 = 60;

pub const CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Default SPI device for the strip.
pub const SPI_BUS: &str = "/dev/spidev0.0";
pub const SPI_SPEED_HZ: u32 = 1_000_000;

/// BCM pin of the toggle button.
pub const BUTTON_PIN: u8 = 27;
pub const BUTTON_DEBOUNCE_MS: u64 = 200;
