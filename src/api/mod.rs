//! HTTP layer for the REST Countries v2 API.
//!
//! The [`CountryProvider`] trait is the seam between the network and the rest
//! of the app: production code talks to [`RestCountriesClient`], tests swap in
//! an in-memory provider.

pub mod client;
pub mod types;

pub use client::{ApiError, CountryProvider, RestCountriesClient};
pub use types::{CountryDetail, CountrySummary};
