//! Fixed region groups and the membership predicate.
//!
//! A [`RegionSet`] pairs a country with a set of provider region codes. The
//! two groups served by this deployment are compile-time constants; they are
//! never mutated and never loaded from configuration.
//!
//! | Group    | Country | Region codes            |
//! |----------|---------|-------------------------|
//! | Norrland | SE      | 3, 7, 14, 23, 24        |
//! | Skåne    | SE      | 27                      |

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::geo::GeoLocation;

/// Region codes making up Norrland.
pub const NORRLAND_REGION_CODES: &[&str] = &[
    "3",  // Gävleborg
    "7",  // Jämtland
    "24", // Västernorrland
    "23", // Västerbotten
    "14", // Norrbotten
];

/// Region codes making up Skåne.
pub const SKANE_REGION_CODES: &[&str] = &["27"];

static NORRLAND: LazyLock<RegionSet> =
    LazyLock::new(|| RegionSet::new("Norrland", "SE", NORRLAND_REGION_CODES));

static SKANE: LazyLock<RegionSet> =
    LazyLock::new(|| RegionSet::new("Skåne", "SE", SKANE_REGION_CODES));

/// A named geofence: one country and a set of its region codes.
#[derive(Debug, Clone)]
pub struct RegionSet {
    name: &'static str,
    country: &'static str,
    regions: HashSet<&'static str>,
}

impl RegionSet {
    pub fn new(name: &'static str, country: &'static str, regions: &[&'static str]) -> Self {
        Self {
            name,
            country,
            regions: regions.iter().copied().collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn country(&self) -> &'static str {
        self.country
    }

    /// Exact string membership; "03" does not match "3".
    pub fn contains(&self, region_code: &str) -> bool {
        self.regions.contains(region_code)
    }
}

/// Test whether a resolved location falls inside a region set.
///
/// True only when the location is known, its country equals the set's
/// country, and its region code is a member. Never fails.
pub fn classify(location: Option<&GeoLocation>, set: &RegionSet) -> bool {
    let Some(location) = location else {
        return false;
    };

    location.country_code.as_deref() == Some(set.country())
        && location
            .region_code
            .as_deref()
            .is_some_and(|region| set.contains(region))
}

/// The region groups exposed as routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Norrland,
    Skane,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Norrland, Region::Skane];

    /// Route serving this region's pixel.
    pub fn path(self) -> &'static str {
        match self {
            Region::Norrland => "/is-norrland",
            Region::Skane => "/is-skane",
        }
    }

    pub fn region_set(self) -> &'static RegionSet {
        match self {
            Region::Norrland => &NORRLAND,
            Region::Skane => &SKANE,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.region_set().name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn se(region: &str) -> GeoLocation {
        GeoLocation::new("SE", region)
    }

    #[test]
    fn test_norrland_members() {
        let set = Region::Norrland.region_set();
        for code in ["3", "7", "24", "23", "14"] {
            assert!(classify(Some(&se(code)), set), "{code} should be Norrland");
        }
    }

    #[test]
    fn test_skane_member() {
        assert!(classify(Some(&se("27")), Region::Skane.region_set()));
    }

    #[test]
    fn test_region_sets_are_disjoint() {
        let norrland = Region::Norrland.region_set();
        let skane = Region::Skane.region_set();

        assert!(!classify(Some(&se("27")), norrland));
        for code in NORRLAND_REGION_CODES {
            assert!(!classify(Some(&se(code)), skane));
        }
    }

    #[test]
    fn test_membership_is_exact_string_match() {
        let set = Region::Norrland.region_set();

        assert!(classify(Some(&se("3")), set));
        assert!(!classify(Some(&se("03")), set));
        assert!(!classify(Some(&se("30")), set));
        assert!(!classify(Some(&se(" 3")), set));
    }

    #[test]
    fn test_country_mismatch() {
        let us = GeoLocation::new("US", "27");
        assert!(!classify(Some(&us), Region::Skane.region_set()));

        let lowercase = GeoLocation::new("se", "27");
        assert!(!classify(Some(&lowercase), Region::Skane.region_set()));
    }

    #[test]
    fn test_absent_location_or_parts() {
        let set = Region::Skane.region_set();

        assert!(!classify(None, set));
        assert!(!classify(Some(&GeoLocation::country_only("SE")), set));
        assert!(!classify(Some(&GeoLocation::default()), set));
        assert!(!classify(
            Some(&GeoLocation {
                country_code: None,
                region_code: Some("27".to_string()),
            }),
            set
        ));
    }

    #[test]
    fn test_region_not_in_any_set() {
        assert!(!classify(Some(&se("99")), Region::Norrland.region_set()));
        assert!(!classify(Some(&se("99")), Region::Skane.region_set()));
    }

    #[test]
    fn test_paths() {
        assert_eq!(Region::Norrland.path(), "/is-norrland");
        assert_eq!(Region::Skane.path(), "/is-skane");
    }

    #[test]
    fn test_display_uses_set_name() {
        assert_eq!(Region::Norrland.to_string(), "Norrland");
        assert_eq!(Region::Skane.to_string(), "Skåne");
        assert_eq!(Region::Skane.region_set().country(), "SE");
    }
}
