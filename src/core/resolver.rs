//! # Detail Resolver
//!
//! The pipeline behind a committed selection: fetch the country's detail
//! record, then fetch every border country concurrently to swap codes for
//! display names, and assemble a [`CountryViewModel`].
//!
//! Progress is reported over an mpsc channel so the event loop can walk the
//! resolution state machine (`FetchingDetail → FetchingBorders → Resolved`)
//! without the resolver knowing anything about actions or generations.
//!
//! The border fan-out is an all-or-nothing join: one failed border fetch
//! fails the whole run. Output order matches the order of border codes in
//! the detail record regardless of which fetch finishes first.

use futures::future::try_join_all;
use log::{debug, info};
use tokio::sync::mpsc::Sender;

use crate::api::client::{ApiError, CountryProvider};
use crate::core::state::CountryViewModel;

/// Progress updates emitted by one resolution run.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionUpdate {
    /// The detail record arrived; border fetches are starting.
    DetailFetched,
    /// The run finished with a complete view model.
    Resolved(CountryViewModel),
}

/// Resolves one country code into a view model, sending progress to `sender`.
///
/// Errors from any fetch step propagate to the caller; the run sends no
/// `Resolved` update in that case.
pub async fn resolve_country(
    provider: &dyn CountryProvider,
    code: &str,
    sender: Sender<ResolutionUpdate>,
) -> Result<(), ApiError> {
    let detail = provider.fetch_country(code).await?;
    debug!("Detail for {code}: {} border codes", detail.borders.len());

    if sender.send(ResolutionUpdate::DetailFetched).await.is_err() {
        return Err(ApiError::ChannelClosed);
    }

    let border_names = try_join_all(detail.borders.iter().map(|border| async move {
        provider.fetch_country(border).await.map(|record| record.name)
    }))
    .await?;

    info!(
        "Resolved {code}: {} ({} borders)",
        detail.name,
        border_names.len()
    );

    let view = CountryViewModel {
        name: detail.name,
        capital: detail.capital,
        population: detail.population,
        border_names,
    };

    if sender
        .send(ResolutionUpdate::Resolved(view))
        .await
        .is_err()
    {
        return Err(ApiError::ChannelClosed);
    }

    Ok(())
}
