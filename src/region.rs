//! Area-code to climate-region mapping.
//!
//! The region weights which emergency categories count as priority issues:
//! north leans on heating failures, south on cooling failures.

use serde::{Deserialize, Serialize};

/// Climate region derived from a phone number's area code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    North,
    South,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "north",
            Region::South => "south",
        }
    }

    /// Parse a stored region string. Anything unrecognized falls back to
    /// south, matching the resolver's default bias.
    pub fn from_str_or_default(s: &str) -> Self {
        match s {
            "north" => Region::North,
            _ => Region::South,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area codes of cold-climate states (NY, MA, PA, northern IL, OH, MI, WI,
/// MN, the Dakotas, MT, WY, ID, northern New England, CT, RI, IA, NE, KS,
/// CO, UT, northern NV, WA, OR, AK). Everything else resolves south.
const NORTHERN_AREA_CODES: &[u16] = &[
    // New York
    212, 315, 347, 516, 518, 585, 607, 631, 646, 680, 716, 718, 838, 845, 914, 917, 929, 934,
    // Massachusetts
    339, 351, 413, 508, 617, 774, 781, 857, 978,
    // Pennsylvania
    215, 223, 267, 272, 412, 445, 484, 570, 582, 610, 717, 724, 814, 878,
    // Illinois (northern)
    217, 224, 309, 312, 331, 630, 708, 773, 779, 815, 847, 872,
    // Ohio
    216, 220, 234, 283, 330, 380, 419, 440, 513, 567, 614, 740, 937,
    // Michigan
    231, 248, 269, 313, 517, 586, 616, 734, 810, 906, 947, 989,
    // Wisconsin
    262, 414, 534, 608, 715, 920,
    // Minnesota
    218, 320, 507, 612, 651, 763, 952,
    // North Dakota / South Dakota / Montana / Wyoming
    701, 605, 406, 307,
    // Idaho
    208, 986,
    // Vermont / New Hampshire / Maine
    802, 603, 207,
    // Connecticut
    203, 475, 860, 959,
    // Rhode Island
    401,
    // Iowa
    319, 515, 563, 641, 712,
    // Nebraska
    308, 402, 531,
    // Kansas
    316, 620, 785, 913,
    // Colorado
    303, 719, 720, 970,
    // Utah
    385, 435, 801,
    // Nevada (Reno area)
    775,
    // Washington
    206, 253, 360, 425, 509, 564,
    // Oregon
    458, 503, 541, 971,
    // Alaska
    907,
];

/// Pull the area code out of a US-format phone number, tolerating
/// punctuation and an optional leading country code.
pub fn extract_area_code(phone: &str) -> Option<u16> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let code = if digits.len() == 10 {
        &digits[0..3]
    } else if digits.len() == 11 && digits.starts_with('1') {
        &digits[1..4]
    } else {
        return None;
    };

    code.parse().ok()
}

/// Resolve a phone number to its climate region.
///
/// Never fails: unrecognized or unparseable numbers resolve south, which
/// biases toward cooling-emergency prioritization.
pub fn resolve(phone: &str) -> Region {
    match extract_area_code(phone) {
        Some(code) if NORTHERN_AREA_CODES.contains(&code) => Region::North,
        _ => Region::South,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bare_ten_digit_numbers() {
        assert_eq!(extract_area_code("2125551234"), Some(212));
    }

    #[test]
    fn extracts_eleven_digits_with_country_code() {
        assert_eq!(extract_area_code("+1 (305) 555-1234"), Some(305));
        assert_eq!(extract_area_code("13055551234"), Some(305));
    }

    #[test]
    fn rejects_short_and_garbage_input() {
        assert_eq!(extract_area_code("abc"), None);
        assert_eq!(extract_area_code("555-1234"), None);
        // 11 digits without a leading 1 is not a US number
        assert_eq!(extract_area_code("23055512345"), None);
    }

    #[test]
    fn northern_codes_resolve_north() {
        assert_eq!(resolve("2125551234"), Region::North); // NYC
        assert_eq!(resolve("+1 (617) 555-0100"), Region::North); // Boston
        assert_eq!(resolve("906-555-0000"), Region::North); // Upper Michigan
    }

    #[test]
    fn southern_and_unknown_codes_resolve_south() {
        assert_eq!(resolve("3055551234"), Region::South); // Miami
        assert_eq!(resolve("7135550000"), Region::South); // Houston
        // Unrecognized code
        assert_eq!(resolve("9995551234"), Region::South);
    }

    #[test]
    fn unparseable_input_defaults_south() {
        assert_eq!(resolve("abc"), Region::South);
        assert_eq!(resolve(""), Region::South);
    }

    #[test]
    fn region_round_trips_through_strings() {
        assert_eq!(Region::from_str_or_default("north"), Region::North);
        assert_eq!(Region::from_str_or_default("south"), Region::South);
        assert_eq!(Region::from_str_or_default("tropical"), Region::South);
        assert_eq!(Region::North.to_string(), "north");
    }
}
