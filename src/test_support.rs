//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::api::{ApiError, CountryDetail, CountryProvider, CountrySummary};
use crate::core::state::CountryViewModel;

/// An in-memory provider for tests that don't need real HTTP.
/// Unknown codes get a 404, mirroring the live API.
#[derive(Default)]
pub struct StaticProvider {
    pub directory: Vec<CountrySummary>,
    pub records: HashMap<String, CountryDetail>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, code: &str, record: CountryDetail) -> Self {
        self.directory.push(summary(code, &record.name));
        self.records.insert(code.to_string(), record);
        self
    }
}

#[async_trait]
impl CountryProvider for StaticProvider {
    async fn fetch_directory(&self) -> Result<Vec<CountrySummary>, ApiError> {
        Ok(self.directory.clone())
    }

    async fn fetch_country(&self, code: &str) -> Result<CountryDetail, ApiError> {
        self.records.get(code).cloned().ok_or_else(|| ApiError::Api {
            status: 404,
            message: format!("{code} not found"),
        })
    }
}

pub fn summary(code: &str, name: &str) -> CountrySummary {
    CountrySummary {
        code: code.to_string(),
        name: name.to_string(),
    }
}

pub fn detail(name: &str, capital: &str, population: u64, borders: &[&str]) -> CountryDetail {
    CountryDetail {
        name: name.to_string(),
        capital: capital.to_string(),
        population,
        borders: borders.iter().map(|b| b.to_string()).collect(),
    }
}

pub fn view_model(
    name: &str,
    capital: &str,
    population: u64,
    border_names: &[&str],
) -> CountryViewModel {
    CountryViewModel {
        name: name.to_string(),
        capital: capital.to_string(),
        population,
        border_names: border_names.iter().map(|b| b.to_string()).collect(),
    }
}
