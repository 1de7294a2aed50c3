//! Built-in tool implementations.

mod current_location;
mod directions;
mod geocode;
mod nearby_resources;
mod risk;
mod safety_tips;
mod static_map;
mod submit_case;
mod web_search;

pub use current_location::CurrentLocation;
pub use directions::Directions;
pub use geocode::Geocode;
pub use nearby_resources::NearbyResources;
pub use risk::{RiskAssessment, RiskLevel};
pub use safety_tips::SafetyTips;
pub use static_map::StaticMap;
pub use submit_case::SubmitCase;
pub use web_search::WebSearch;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Random lowercase hex string of the given length.
pub(crate) fn random_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| HEX_DIGITS[rng.gen_range(0..16)] as char)
        .collect()
}

/// Seconds since the Unix epoch.
pub(crate) fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_hex_shape() {
        let hex = random_hex(8);
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_random_hex_varies() {
        // Two 16-char draws colliding would mean a broken RNG.
        assert_ne!(random_hex(16), random_hex(16));
    }
}
