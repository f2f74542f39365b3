//! MaxMind GeoIP resolver.
//!
//! Reads a GeoIP2/GeoLite2 City database fully into memory at startup.
//! Lookups are lock-free reads against the shared reader.
//!
//! # Region Codes
//!
//! GeoIP2 reports subdivisions as ISO 3166-2 codes (`SE-AC`, reported as
//! `AC`). The fixed region groups use MaxMind's numeric region codes
//! (see MaxMind's legacy `region.csv`), so Swedish subdivisions are
//! translated through [`region_code_for_subdivision`]. Other countries keep
//! their ISO subdivision code.

use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;

use maxminddb::Reader;
use serde::Deserialize;

use super::{GeoLocation, GeoResolver};
use crate::error::{AppError, AppResult};

/// ISO 3166-2:SE subdivision → MaxMind numeric region code.
const SWEDISH_REGION_CODES: &[(&str, &str)] = &[
    ("K", "2"),   // Blekinge
    ("X", "3"),   // Gävleborg
    ("I", "5"),   // Gotland
    ("N", "6"),   // Halland
    ("Z", "7"),   // Jämtland
    ("F", "8"),   // Jönköping
    ("H", "9"),   // Kalmar
    ("W", "10"),  // Dalarna
    ("G", "12"),  // Kronoberg
    ("BD", "14"), // Norrbotten
    ("T", "15"),  // Örebro
    ("E", "16"),  // Östergötland
    ("D", "18"),  // Södermanland
    ("C", "21"),  // Uppsala
    ("S", "22"),  // Värmland
    ("AC", "23"), // Västerbotten
    ("Y", "24"),  // Västernorrland
    ("U", "25"),  // Västmanland
    ("AB", "26"), // Stockholm
    ("M", "27"),  // Skåne
    ("O", "28"),  // Västra Götaland
];

/// Translate a subdivision ISO code into the region code used for matching.
///
/// Swedish subdivisions map to numeric codes; unknown Swedish codes and
/// other countries' codes are returned unchanged.
pub fn region_code_for_subdivision(country: &str, subdivision: &str) -> String {
    if country == "SE"
        && let Some((_, code)) = SWEDISH_REGION_CODES
            .iter()
            .find(|(iso, _)| *iso == subdivision)
    {
        return (*code).to_string();
    }
    subdivision.to_string()
}

/// MaxMind GeoIP resolver.
pub struct MaxMindGeoResolver {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoResolver {
    /// Load a GeoIP database from a file path into memory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::GeoDatabase` if the file is missing or is not a
    /// valid MaxMind database.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path)
            .map_err(|e| AppError::GeoDatabase(format!("{}: {e}", path.display())))?;

        tracing::debug!(
            database_type = %reader.metadata.database_type,
            build_epoch = reader.metadata.build_epoch,
            "GeoIP database opened"
        );

        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Database type reported in the file metadata (e.g. "GeoLite2-City").
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

impl GeoResolver for MaxMindGeoResolver {
    fn lookup_addr(&self, ip: IpAddr) -> Option<GeoLocation> {
        #[derive(Debug, Deserialize)]
        struct IsoNamed {
            iso_code: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct CityResp {
            country: Option<IsoNamed>,
            subdivisions: Option<Vec<IsoNamed>>,
        }

        // Address-not-found is an error in the reader API, unknown here
        let resp: CityResp = self.reader.lookup(ip).ok()?;

        let country_code = resp.country.and_then(|c| c.iso_code);
        let region_code = resp
            .subdivisions
            .and_then(|subs| subs.into_iter().next())
            .and_then(|sub| sub.iso_code)
            .map(|sub| match &country_code {
                Some(country) => region_code_for_subdivision(country, &sub),
                None => sub,
            });

        Some(GeoLocation {
            country_code,
            region_code,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_norrland_subdivisions_translate() {
        assert_eq!(region_code_for_subdivision("SE", "X"), "3");
        assert_eq!(region_code_for_subdivision("SE", "Z"), "7");
        assert_eq!(region_code_for_subdivision("SE", "Y"), "24");
        assert_eq!(region_code_for_subdivision("SE", "AC"), "23");
        assert_eq!(region_code_for_subdivision("SE", "BD"), "14");
    }

    #[test]
    fn test_skane_subdivision_translates() {
        assert_eq!(region_code_for_subdivision("SE", "M"), "27");
    }

    #[test]
    fn test_other_countries_pass_through() {
        assert_eq!(region_code_for_subdivision("US", "M"), "M");
        assert_eq!(region_code_for_subdivision("NO", "03"), "03");
    }

    #[test]
    fn test_unknown_swedish_code_passes_through() {
        assert_eq!(region_code_for_subdivision("SE", "QQ"), "QQ");
    }

    #[test]
    fn test_region_table_has_unique_entries() {
        let mut isos: Vec<_> = SWEDISH_REGION_CODES.iter().map(|(iso, _)| *iso).collect();
        let mut codes: Vec<_> = SWEDISH_REGION_CODES.iter().map(|(_, c)| *c).collect();
        isos.sort_unstable();
        isos.dedup();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(isos.len(), SWEDISH_REGION_CODES.len());
        assert_eq!(codes.len(), SWEDISH_REGION_CODES.len());
    }

    #[test]
    fn test_open_nonexistent_file() {
        let result = MaxMindGeoResolver::open("/nonexistent/path/GeoLite2-City.mmdb");

        assert!(matches!(result, Err(AppError::GeoDatabase(_))));
    }

    #[test]
    fn test_open_invalid_file() {
        let path = std::env::temp_dir().join(format!("geo_pixel_invalid_{}.mmdb", std::process::id()));
        std::fs::write(&path, b"definitely not a maxmind database").unwrap();

        let result = MaxMindGeoResolver::open(&path);
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
