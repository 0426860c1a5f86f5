//! Header-signature registry for the daily report layouts.
//!
//! The CSSE daily reports changed shape twice. Each layout is identified by
//! the literal text of its header row and maps to the raw column indices of
//! the fields we read. These indices describe the *source file*; canonical
//! access always goes through the named fields of
//! [`CaseRecord`](plotter_core::models::CaseRecord).

use plotter_core::error::{PlotterError, Result};

/// Byte-order mark some reports carry in front of the first header cell.
pub const BOM: char = '\u{feff}';

/// Raw column positions of one known header layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLayout {
    pub name: &'static str,
    /// Exact comma-joined header text identifying the layout.
    pub signature: &'static str,
    pub province: usize,
    pub country: usize,
    pub last_update: usize,
    pub confirmed: usize,
    pub deaths: usize,
    pub recovered: usize,
    pub active: Option<usize>,
    pub local_area: Option<usize>,
}

/// Layout of the first reports (January to February 2020).
pub const INITIAL: SchemaLayout = SchemaLayout {
    name: "initial",
    signature: "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered",
    province: 0,
    country: 1,
    last_update: 2,
    confirmed: 3,
    deaths: 4,
    recovered: 5,
    active: None,
    local_area: None,
};

/// Initial layout extended with coordinates (March 2020).
pub const GEOLOCATED: SchemaLayout = SchemaLayout {
    name: "geolocated",
    signature:
        "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered,Latitude,Longitude",
    province: 0,
    country: 1,
    last_update: 2,
    confirmed: 3,
    deaths: 4,
    recovered: 5,
    active: None,
    local_area: None,
};

/// County-level layout keyed by FIPS code (from late March 2020).
pub const FIPS: SchemaLayout = SchemaLayout {
    name: "fips",
    signature: "FIPS,Admin2,Province_State,Country_Region,Last_Update,Lat,Long_,Confirmed,Deaths,Recovered,Active,Combined_Key",
    province: 2,
    country: 3,
    last_update: 4,
    confirmed: 7,
    deaths: 8,
    recovered: 9,
    active: Some(10),
    local_area: Some(1),
};

/// Remove a leading byte-order mark, if any.
pub fn strip_bom(header: &str) -> &str {
    header.strip_prefix(BOM).unwrap_or(header)
}

/// Immutable set of recognised layouts.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    layouts: Vec<SchemaLayout>,
}

impl SchemaRegistry {
    /// Registry with the three CSSE layouts, in rollout order.
    pub fn builtin() -> Self {
        Self::new(vec![INITIAL, GEOLOCATED, FIPS])
    }

    pub fn new(layouts: Vec<SchemaLayout>) -> Self {
        Self { layouts }
    }

    pub fn layouts(&self) -> &[SchemaLayout] {
        &self.layouts
    }

    /// Find the layout whose signature equals `header` exactly.
    ///
    /// A leading BOM is ignored; nothing else is normalized.
    pub fn resolve(&self, header: &str) -> Result<&SchemaLayout> {
        let header = strip_bom(header);
        self.layouts
            .iter()
            .find(|layout| layout.signature == header)
            .ok_or_else(|| PlotterError::UnknownSchema {
                header: header.to_string(),
            })
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_each_builtin_layout() {
        let registry = SchemaRegistry::builtin();
        for layout in [&INITIAL, &GEOLOCATED, &FIPS] {
            let found = registry.resolve(layout.signature).unwrap();
            assert_eq!(found.name, layout.name);
        }
    }

    #[test]
    fn test_resolve_strips_bom() {
        let registry = SchemaRegistry::builtin();
        let header = format!("{}{}", BOM, INITIAL.signature);
        assert_eq!(registry.resolve(&header).unwrap().name, "initial");
    }

    #[test]
    fn test_resolve_unknown_header() {
        let registry = SchemaRegistry::builtin();
        let err = registry.resolve("Date,Country,Cases").unwrap_err();
        match err {
            PlotterError::UnknownSchema { header } => assert_eq!(header, "Date,Country,Cases"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_is_exact_not_prefix() {
        let registry = SchemaRegistry::builtin();
        // Trailing column and case changes must not match.
        let extended = format!("{},Extra", GEOLOCATED.signature);
        assert!(registry.resolve(&extended).is_err());
        assert!(registry
            .resolve(&INITIAL.signature.to_lowercase())
            .is_err());
    }

    #[test]
    fn test_resolve_with_custom_registry() {
        let registry = SchemaRegistry::new(vec![INITIAL]);
        assert!(registry.resolve(FIPS.signature).is_err());
    }

    #[test]
    fn test_fips_optional_columns() {
        assert_eq!(FIPS.local_area, Some(1));
        assert_eq!(FIPS.active, Some(10));
        assert!(INITIAL.local_area.is_none());
    }

    #[test]
    fn test_strip_bom_without_bom() {
        assert_eq!(strip_bom("FIPS,Admin2"), "FIPS,Admin2");
    }
}
