//! Conversion of raw report rows into [`CaseRecord`]s.

use std::collections::HashMap;

use plotter_core::error::{PlotterError, Result};
use plotter_core::models::CaseRecord;

use crate::schema::SchemaLayout;

// ── CountryAliases ────────────────────────────────────────────────────────────

/// Corrections for country labels that changed between reports.
///
/// Lookup is total: names without an alias come back unchanged.
#[derive(Debug, Clone)]
pub struct CountryAliases {
    map: HashMap<String, String>,
}

impl CountryAliases {
    /// Aliases observed in the CSSE reports.
    pub fn builtin() -> Self {
        Self::from_pairs([("Mainland China", "China"), ("Taiwan*", "Taiwan")])
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Canonical name for `raw`.
    pub fn resolve<'a>(&'a self, raw: &'a str) -> &'a str {
        self.map.get(raw).map(String::as_str).unwrap_or(raw)
    }
}

impl Default for CountryAliases {
    fn default() -> Self {
        Self::builtin()
    }
}

// ── RecordNormalizer ──────────────────────────────────────────────────────────

/// Turns one raw row plus its layout into a [`CaseRecord`].
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    aliases: CountryAliases,
}

impl RecordNormalizer {
    pub fn new(aliases: CountryAliases) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &CountryAliases {
        &self.aliases
    }

    /// Normalize `row` according to `layout`.
    ///
    /// Blank counts read as 0. A row narrower than a declared column fails
    /// with [`PlotterError::IndexOutOfRange`].
    pub fn normalize<S: AsRef<str>>(&self, layout: &SchemaLayout, row: &[S]) -> Result<CaseRecord> {
        let country = cell(row, layout.country, "Country")?;

        Ok(CaseRecord {
            province: cell(row, layout.province, "Province")?.to_string(),
            country: self.aliases.resolve(country).to_string(),
            last_update: cell(row, layout.last_update, "LastUpdate")?.to_string(),
            confirmed: parse_count(cell(row, layout.confirmed, "Confirmed")?, "Confirmed")?,
            deaths: parse_count(cell(row, layout.deaths, "Deaths")?, "Deaths")?,
            recovered: parse_count(cell(row, layout.recovered, "Recovered")?, "Recovered")?,
            active: layout
                .active
                .map(|idx| cell(row, idx, "Active").and_then(|v| parse_count(v, "Active")))
                .transpose()?,
            local_area: layout
                .local_area
                .map(|idx| cell(row, idx, "LocalArea").map(str::to_string))
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn cell<'a, S: AsRef<str>>(row: &'a [S], index: usize, field: &'static str) -> Result<&'a str> {
    row.get(index)
        .map(AsRef::as_ref)
        .ok_or(PlotterError::IndexOutOfRange {
            field,
            index,
            width: row.len(),
        })
}

/// Parse a count column; surrounding whitespace is ignored and blank is 0.
fn parse_count(value: &str, field: &'static str) -> Result<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u64>()
        .map_err(|_| PlotterError::MalformedCount {
            field,
            value: value.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
