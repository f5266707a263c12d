//! MAC and IPv4 input helpers shared by the services and the seeder.
//!
//! The normalizers are tolerant and work on partial input, so the same
//! functions can mask a value while it is being typed and clean it on submit.
//! The validators are strict.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of octets in a MAC address.
pub const MAC_OCTETS: usize = 6;

/// Shown when a MAC does not pass [`is_valid_mac`] after normalization.
pub const MAC_FORMAT_MESSAGE: &str = "MAC WLAN must follow the format XX:XX:XX:XX:XX:XX";

static MAC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-F]{2}:){5}[0-9A-F]{2}$").expect("valid MAC regex"));

static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$",
    )
    .expect("valid IPv4 regex")
});

/// Formats raw MAC input as uppercase colon-separated octets.
///
/// Every non-hex character is dropped, the remaining digits are capped at
/// twelve and grouped in pairs. A trailing odd digit stays as a partial group.
///
/// ```
/// assert_eq!(util::network::normalize_mac("aa-bb-cc-dd-ee-ff"), "AA:BB:CC:DD:EE:FF");
/// assert_eq!(util::network::normalize_mac("aab"), "AA:B");
/// ```
pub fn normalize_mac(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_uppercase())
        .take(MAC_OCTETS * 2)
        .collect();

    digits
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

/// True iff `formatted` is exactly six uppercase hex octets joined by `:`.
pub fn is_valid_mac(formatted: &str) -> bool {
    MAC_REGEX.is_match(formatted)
}

/// True iff `raw` is a dotted quad of decimal octets in `0..=255`.
///
/// Leading zeros such as `010` are rejected.
pub fn is_valid_ipv4(raw: &str) -> bool {
    IPV4_REGEX.is_match(raw)
}

/// As-you-type mask for IPv4 input.
///
/// Keeps digits and dots, collapses repeated dots, and allows at most four
/// groups of at most three digits. The result is not necessarily valid.
pub fn mask_ipv4_input(raw: &str) -> String {
    let mut groups: Vec<String> = vec![String::new()];

    for c in raw.chars() {
        let current = groups.len() - 1;
        match c {
            '0'..='9' => {
                if groups[current].len() == 3 {
                    if groups.len() == 4 {
                        break;
                    }
                    groups.push(c.to_string());
                } else {
                    groups[current].push(c);
                }
            }
            '.' => {
                if !groups[current].is_empty() && groups.len() < 4 {
                    groups.push(String::new());
                }
            }
            _ => {}
        }
    }

    groups.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_mac_accepts_any_separator_style() {
        for raw in [
            "aa bb cc dd ee ff",
            "aa:bb:cc:dd:ee:ff",
            "AA-BB-CC-DD-EE-FF",
            "aabb.ccdd.eeff",
            "aabbccddeeff",
            "  Aa:bB-cc dd.EE_ff ",
        ] {
            let formatted = normalize_mac(raw);
            assert_eq!(formatted, "AA:BB:CC:DD:EE:FF", "input {raw:?}");
            assert!(is_valid_mac(&formatted));
        }
    }

    #[test]
    fn normalize_mac_handles_partial_and_overlong_input() {
        assert_eq!(normalize_mac(""), "");
        assert_eq!(normalize_mac("a"), "A");
        assert_eq!(normalize_mac("aab"), "AA:B");
        assert_eq!(normalize_mac("0011223344556677"), "00:11:22:33:44:55");
        assert_eq!(normalize_mac("zz:gg"), "");
    }

    #[test]
    fn is_valid_mac_is_strict() {
        assert!(is_valid_mac("00:1A:2B:3C:4D:5E"));
        assert!(!is_valid_mac("00:1a:2b:3c:4d:5e"));
        assert!(!is_valid_mac("00-1A-2B-3C-4D-5E"));
        assert!(!is_valid_mac("00:1A:2B:3C:4D"));
        assert!(!is_valid_mac("00:1A:2B:3C:4D:5E:6F"));
        assert!(!is_valid_mac("AA:B"));
    }

    #[test]
    fn ipv4_validation() {
        assert!(is_valid_ipv4("192.168.0.10"));
        assert!(is_valid_ipv4("0.0.0.0"));
        assert!(is_valid_ipv4("255.255.255.255"));
        assert!(!is_valid_ipv4("999.1.1.1"));
        assert!(!is_valid_ipv4("1.2.3"));
        assert!(!is_valid_ipv4("1.2.3.4.5"));
        assert!(!is_valid_ipv4("256.0.0.1"));
        assert!(!is_valid_ipv4("10.0.0.05"));
        assert!(!is_valid_ipv4(" 10.0.0.5"));
        assert!(!is_valid_ipv4("a.b.c.d"));
    }

    #[test]
    fn ipv4_mask_limits_groups_and_digits() {
        assert_eq!(mask_ipv4_input("192.168.0.10"), "192.168.0.10");
        assert_eq!(mask_ipv4_input("192168010"), "192.168.010");
        assert_eq!(mask_ipv4_input("10..0.x0.5"), "10.0.0.5");
        assert_eq!(mask_ipv4_input("1.2.3.4.5"), "1.2.3.45");
        assert_eq!(mask_ipv4_input("1.2.3.4444"), "1.2.3.444");
        assert_eq!(mask_ipv4_input(".10"), "10");
    }
}
