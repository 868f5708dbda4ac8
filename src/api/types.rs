use serde::Deserialize;

/// One entry of the country directory, as returned by
/// `GET /all?fields=alpha3Code,name`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CountrySummary {
    /// Stable three-letter identifier, the key for all detail lookups.
    #[serde(rename = "alpha3Code")]
    pub code: String,
    pub name: String,
}

/// Raw per-country record from `GET /alpha/{code}`.
///
/// The v2 API omits `capital` and `borders` entirely for some records
/// (territories, island nations), so both default to empty.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CountryDetail {
    pub name: String,
    #[serde(default)]
    pub capital: String,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub borders: Vec<String>,
}
