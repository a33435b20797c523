// ── Hotel chain and room-type lookup tables ──
//
// Static code-to-label tables. `detect_chain` guesses a property's brand
// from its free-text name; keywords are tried in table order, so the
// more specific spelling of a brand always precedes the shorter one it
// contains.

/// A hotel brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub code: &'static str,
    pub name: &'static str,
    /// Parent brand family, e.g. `"Hilton"`.
    pub family: &'static str,
}

macro_rules! chains {
    ($($code:literal => $name:literal, $family:literal;)+) => {
        &[$(Chain { code: $code, name: $name, family: $family }),+]
    };
}

pub static CHAINS: &[Chain] = chains! {
    "HAM" => "Hampton Inn", "Hilton";
    "HGI" => "Hilton Garden Inn", "Hilton";
    "DT" => "DoubleTree by Hilton", "Hilton";
    "HWS" => "Homewood Suites", "Hilton";
    "HOME2" => "Home2 Suites", "Hilton";
    "ES" => "Embassy Suites", "Hilton";
    "TRU" => "Tru by Hilton", "Hilton";
    "HH" => "Hilton Hotels & Resorts", "Hilton";
    "CY" => "Courtyard by Marriott", "Marriott";
    "FFI" => "Fairfield Inn & Suites", "Marriott";
    "RI" => "Residence Inn", "Marriott";
    "SHS" => "SpringHill Suites", "Marriott";
    "TPS" => "TownePlace Suites", "Marriott";
    "MAR" => "Marriott Hotels", "Marriott";
    "HIE" => "Holiday Inn Express", "IHG";
    "HI" => "Holiday Inn", "IHG";
    "CW" => "Candlewood Suites", "IHG";
    "SB" => "Staybridge Suites", "IHG";
};

/// Name keywords, most specific first. Matched case-insensitively.
static KEYWORDS: &[(&str, &str)] = &[
    ("hampton", "HAM"),
    ("hilton garden inn", "HGI"),
    ("garden inn", "HGI"),
    ("doubletree", "DT"),
    ("double tree", "DT"),
    ("home2", "HOME2"),
    ("home 2", "HOME2"),
    ("homewood", "HWS"),
    ("embassy suites", "ES"),
    ("tru by hilton", "TRU"),
    ("hilton", "HH"),
    ("courtyard", "CY"),
    ("fairfield", "FFI"),
    ("residence inn", "RI"),
    ("springhill", "SHS"),
    ("towneplace", "TPS"),
    ("marriott", "MAR"),
    ("holiday inn express", "HIE"),
    ("holiday inn", "HI"),
    ("candlewood", "CW"),
    ("staybridge", "SB"),
];

/// Room types shared by every brand.
static GENERIC_ROOM_TYPES: &[(&str, &str)] = &[
    ("K", "King"),
    ("KNG", "King Room"),
    ("QQ", "Two Queens"),
    ("QN", "Queen Room"),
    ("DBL", "Double Room"),
    ("TWN", "Twin Room"),
    ("STE", "Suite"),
    ("KSTE", "King Suite"),
    ("ADA", "Accessible Room"),
    ("ADAK", "Accessible King"),
    ("ADAQ", "Accessible Two Queens"),
    ("STD", "Standard Room"),
];

/// Brand-specific room types, consulted before the generic table.
static CHAIN_ROOM_TYPES: &[(&str, &[(&str, &str)])] = &[
    (
        "HAM",
        &[
            ("NK1", "1 King Bed Nonsmoking"),
            ("NQQ", "2 Queen Beds Nonsmoking"),
            ("KSTE", "King Studio Suite"),
        ],
    ),
    (
        "HGI",
        &[
            ("NK1", "1 King Bed"),
            ("NQQ", "2 Queen Beds"),
            ("KSTE", "King Suite with Sofabed"),
        ],
    ),
    (
        "HWS",
        &[
            ("K1ST", "King Studio Suite"),
            ("K1B", "1 Bedroom King Suite"),
            ("QQ2B", "2 Bedroom Suite"),
        ],
    ),
    (
        "HOME2",
        &[("KSTU", "King Studio"), ("QQSTU", "Two Queen Studio")],
    ),
    (
        "ES",
        &[("KSTE", "King Two Room Suite"), ("QQSTE", "Two Queen Two Room Suite")],
    ),
    (
        "CY",
        &[("GK", "Guest Room, 1 King"), ("GQQ", "Guest Room, 2 Queens")],
    ),
    (
        "RI",
        &[("SK", "Studio, 1 King"), ("1BR", "1 Bedroom Suite"), ("2BR", "2 Bedroom Suite")],
    ),
    (
        "HIE",
        &[("KEX", "King Executive"), ("TQN", "Two Queen Beds")],
    ),
    (
        "HI",
        &[("KNGN", "King Bed Nonsmoking"), ("TQNN", "Two Queen Beds Nonsmoking")],
    ),
    (
        "SB",
        &[("KSTU", "Studio Suite"), ("1BR", "One Bedroom Suite")],
    ),
];

/// Look a chain up by code (case-insensitive).
pub fn chain(code: &str) -> Option<&'static Chain> {
    CHAINS.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

/// Guess the chain from a property name.
pub fn detect_chain(property_name: &str) -> Option<&'static Chain> {
    let name = property_name.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .and_then(|(_, code)| chain(code))
}

fn chain_table(chain: &str) -> Option<&'static [(&'static str, &'static str)]> {
    CHAIN_ROOM_TYPES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(chain))
        .map(|(_, table)| *table)
}

fn find_label(table: &[(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, label)| *label)
}

/// Label for a room-type code: brand table, then generic table, then the
/// code itself.
pub fn room_type_label<'a>(chain: Option<&str>, code: &'a str) -> &'a str {
    let label = chain
        .and_then(chain_table)
        .and_then(|table| find_label(table, code))
        .or_else(|| find_label(GENERIC_ROOM_TYPES, code));
    label.unwrap_or(code)
}

/// Every room type available for a chain: brand entries first, then the
/// generic entries the brand doesn't override.
pub fn room_types(chain: Option<&str>) -> Vec<(&'static str, &'static str)> {
    let specific = chain.and_then(chain_table).unwrap_or(&[]);
    let mut out: Vec<_> = specific.to_vec();
    out.extend(
        GENERIC_ROOM_TYPES
            .iter()
            .filter(|(code, _)| find_label(specific, code).is_none())
            .copied(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(name: &str) -> Option<&'static str> {
        detect_chain(name).map(|c| c.code)
    }

    #[test]
    fn specific_keywords_win() {
        assert_eq!(detected("Holiday Inn Express & Suites Austin"), Some("HIE"));
        assert_eq!(detected("Holiday Inn Downtown"), Some("HI"));
        assert_eq!(detected("Home2 Suites by Hilton Denver"), Some("HOME2"));
        assert_eq!(detected("Homewood Suites by Hilton"), Some("HWS"));
        assert_eq!(detected("Hilton Garden Inn Airport"), Some("HGI"));
        assert_eq!(detected("The Hilton Chicago"), Some("HH"));
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(detected("COURTYARD MIDTOWN"), Some("CY"));
        assert_eq!(detected("hampton inn"), Some("HAM"));
    }

    #[test]
    fn unknown_names_detect_nothing() {
        assert_eq!(detected("Joe's Motel"), None);
        assert_eq!(detected(""), None);
    }

    #[test]
    fn room_type_falls_back_to_generic_then_code() {
        assert_eq!(room_type_label(Some("HAM"), "NK1"), "1 King Bed Nonsmoking");
        assert_eq!(room_type_label(Some("HAM"), "kste"), "King Studio Suite");
        assert_eq!(room_type_label(Some("HGI"), "DBL"), "Double Room");
        assert_eq!(room_type_label(None, "QQ"), "Two Queens");
        assert_eq!(room_type_label(Some("TRU"), "XYZ"), "XYZ");
    }

    #[test]
    fn chain_room_types_override_generic_entries() {
        let types = room_types(Some("HAM"));
        let kste: Vec<_> = types.iter().filter(|(c, _)| *c == "KSTE").collect();
        assert_eq!(kste.len(), 1);
        assert_eq!(kste[0].1, "King Studio Suite");
        assert!(types.iter().any(|(c, _)| *c == "DBL"));
    }

    #[test]
    fn every_keyword_points_at_a_known_chain() {
        for (keyword, code) in KEYWORDS {
            assert!(chain(code).is_some(), "{keyword} -> {code}");
        }
    }
}
