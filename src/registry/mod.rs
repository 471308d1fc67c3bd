//! Device and gateway registries.
//!
//! Both tables are plain structs mutated under the coordinator's single
//! write lock; they never lock internally.

mod device;
mod gateway;

pub use device::{Device, DeviceError, DeviceTable};
pub use gateway::{Gateway, GatewayError, GatewayTable};

use regex_lite::Regex;

/// Names are hostname-ish: alphanumeric head, then dots, dashes,
/// underscores, max 64 chars.
const NAME_PATTERN: &str = "^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$";

/// Check a device or gateway name against the naming rule.
pub fn is_valid_name(name: &str) -> bool {
    // The pattern is a literal; compilation cannot fail.
    Regex::new(NAME_PATTERN).map(|re| re.is_match(name)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("pi-cluster-01"));
        assert!(is_valid_name("esp32.lab2"));
        assert!(is_valid_name("A"));
        assert!(is_valid_name("gw_main"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("-leading-dash"));
        assert!(!is_valid_name(".hidden"));
        assert!(!is_valid_name("has space"));
        assert!(!is_valid_name("bad/slash"));
        assert!(!is_valid_name(&"x".repeat(65)));
    }
}
