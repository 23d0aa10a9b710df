//! BigQuery REST client
//!
//! Thin wrapper over the v2 REST API. Every request carries the configured
//! bearer token and is bounded by the configured timeout.

use super::models::{
    DatasetReference, DatasetResource, ErrorResponse, InsertAllRequest, InsertAllResponse,
    TableReference, TableResource, TableSchema,
};
use crate::config::schema::BigQueryConfig;
use crate::domain::ids::{DatasetName, ResourceName};
use crate::domain::{BigQueryError, Result};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;

/// BigQuery REST client
pub struct BigQueryClient {
    /// HTTP client for making requests
    http: Client,

    /// BigQuery configuration
    config: BigQueryConfig,
}

impl BigQueryClient {
    /// Create a new BigQuery client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: BigQueryConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                BigQueryError::ConnectionFailed(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { http, config })
    }

    /// Project the client writes to
    pub fn project_id(&self) -> &str {
        &self.config.project_id
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/projects/{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.project_id,
            path
        )
    }

    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, BigQueryError> {
        request
            .bearer_auth(self.config.access_token.expose_secret().as_ref())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BigQueryError::Timeout(e.to_string())
                } else {
                    BigQueryError::ConnectionFailed(e.to_string())
                }
            })
    }

    /// List at most one dataset to prove the token and project work
    pub async fn test_connection(&self) -> Result<()> {
        let response = self
            .send(self.http.get(self.url("datasets")).query(&[("maxResults", "1")]))
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await.into());
        }

        tracing::info!(project = %self.config.project_id, "BigQuery connection test successful");
        Ok(())
    }

    /// Whether a dataset exists
    pub async fn dataset_exists(&self, dataset: &DatasetName) -> Result<bool> {
        let response = self
            .send(self.http.get(self.url(&format!("datasets/{dataset}"))))
            .await?;
        exists(response).await
    }

    /// Create a dataset; an existing dataset counts as success
    pub async fn create_dataset(&self, dataset: &DatasetName) -> Result<()> {
        let body = DatasetResource {
            dataset_reference: DatasetReference {
                project_id: self.config.project_id.clone(),
                dataset_id: dataset.to_string(),
            },
            location: self.config.location.clone(),
        };

        let response = self
            .send(self.http.post(self.url("datasets")).json(&body))
            .await?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!(
                    dataset = %dataset,
                    location = %self.config.location,
                    "Created BigQuery dataset"
                );
                Ok(())
            }
            StatusCode::CONFLICT => {
                tracing::debug!(dataset = %dataset, "BigQuery dataset already exists");
                Ok(())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(error_for_response(response).await.into())
            }
            _ => {
                let err = error_for_response(response).await;
                Err(BigQueryError::DatasetCreationFailed(format!("{dataset}: {err}")).into())
            }
        }
    }

    /// Whether a table exists
    pub async fn table_exists(&self, dataset: &DatasetName, table: &ResourceName) -> Result<bool> {
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("datasets/{dataset}/tables/{table}"))),
            )
            .await?;
        exists(response).await
    }

    /// Create a table with the envelope schema; an existing table counts as
    /// success
    pub async fn create_table(&self, dataset: &DatasetName, table: &ResourceName) -> Result<()> {
        let body = TableResource {
            table_reference: TableReference {
                project_id: self.config.project_id.clone(),
                dataset_id: dataset.to_string(),
                table_id: table.to_string(),
            },
            schema: TableSchema::envelope(),
        };

        let response = self
            .send(
                self.http
                    .post(self.url(&format!("datasets/{dataset}/tables")))
                    .json(&body),
            )
            .await?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!(dataset = %dataset, table = %table, "Created BigQuery table");
                Ok(())
            }
            StatusCode::CONFLICT => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(error_for_response(response).await.into())
            }
            _ => {
                let err = error_for_response(response).await;
                Err(BigQueryError::TableCreationFailed(format!("{dataset}.{table}: {err}")).into())
            }
        }
    }

    /// Stream rows into a table
    pub async fn insert_all(
        &self,
        dataset: &DatasetName,
        table: &ResourceName,
        request: &InsertAllRequest,
    ) -> Result<InsertAllResponse> {
        let response = self
            .send(
                self.http
                    .post(self.url(&format!("datasets/{dataset}/tables/{table}/insertAll")))
                    .json(request),
            )
            .await?;

        if !response.status().is_success() {
            return Err(error_for_response(response).await.into());
        }

        response
            .json::<InsertAllResponse>()
            .await
            .map_err(|e| BigQueryError::InvalidResponse(e.to_string()).into())
    }
}

async fn exists(response: Response) -> Result<bool> {
    match response.status() {
        status if status.is_success() => Ok(true),
        StatusCode::NOT_FOUND => Ok(false),
        _ => Err(error_for_response(response).await.into()),
    }
}

/// Classify a non-success response, preferring the API's own error message
async fn error_for_response(response: Response) -> BigQueryError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        _ => body,
    };
    BigQueryError::from_status(status, message)
}
