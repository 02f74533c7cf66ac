// src/services/petition_client.rs
//! Petition source client.
//!
//! Petitions are plain documents served by the petition platform at
//! `GET {url}/petitions/{id}`. Fetching one resets the petition and the
//! entered verification codes in the wallet state before the request goes out.

use crate::models::Petition;
use crate::services::{endpoint, normalize_base_url, send_json, ServiceError};
use crate::state::{Action, Store};
use async_trait::async_trait;
use log::{info, warn};

/// Where petitions come from.
#[async_trait]
pub trait PetitionSource: Send + Sync {
    async fn fetch_petition(&self, url: &str, id: &str) -> Result<Petition, ServiceError>;
}

/// [`PetitionSource`] over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpPetitionSource {
    client: reqwest::Client,
}

impl HttpPetitionSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PetitionSource for HttpPetitionSource {
    async fn fetch_petition(&self, url: &str, id: &str) -> Result<Petition, ServiceError> {
        let base = normalize_base_url(url)?;
        send_json(
            self.client.get(endpoint(&base, &["petitions", id])),
            "petition fetch",
        )
        .await
    }
}

/// Fetches a petition and records the outcome in `store`.
///
/// Dispatches [`Action::FetchPetitionRequest`] first, then either
/// [`Action::FetchPetitionSuccess`] or [`Action::FetchPetitionFailure`].
///
/// # Returns
/// The fetched petition, or the error whose message was stored
pub async fn fetch_petition(
    store: &Store,
    source: &dyn PetitionSource,
    url: &str,
    id: &str,
) -> Result<Petition, ServiceError> {
    store.dispatch(Action::FetchPetitionRequest {
        url: url.to_string(),
        id: id.to_string(),
    });

    match source.fetch_petition(url, id).await {
        Ok(petition) => {
            info!("fetched petition '{}' from {}", id, url);
            store.dispatch(Action::FetchPetitionSuccess {
                petition: petition.clone(),
            });
            Ok(petition)
        }
        Err(e) => {
            warn!("petition '{}' could not be fetched: {}", id, e);
            store.dispatch(Action::FetchPetitionFailure {
                error: e.to_string(),
            });
            Err(e)
        }
    }
}
