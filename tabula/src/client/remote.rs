//! HTTP client for the remote managed table service.
//!
//! Speaks the service's JSON REST surface: tables live under
//! `/tables/{name}` and items under `/tables/{name}/items`. Requests
//! carry the deployment's region and resolved credentials as headers.
//! Construction performs no network I/O.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::client::{Credentials, StoreClient, StoreItem, TableSpec, TableStatus};
use crate::error::{Error, Result};

/// Client for a remote, region-scoped managed table service.
#[derive(Debug, Clone)]
pub struct RemoteStoreClient {
    http: reqwest::Client,
    endpoint: String,
    region: String,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct TableDescription {
    status: TableStatus,
}

#[derive(Debug, Deserialize)]
struct ItemPage {
    items: Vec<StoreItem>,
}

impl RemoteStoreClient {
    /// Creates a client for the given endpoint, region, and credentials.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(endpoint: &str, region: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            region: region.to_string(),
            credentials,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/tables/{table}", self.endpoint)
    }

    fn items_url(&self, table: &str) -> String {
        format!("{}/tables/{table}/items", self.endpoint)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("x-tabula-region", &self.region)
            .header("x-tabula-access-key", &self.credentials.access_key_id)
            .header("x-tabula-secret", &self.credentials.secret_access_key)
    }

    async fn reject(operation: &str, response: reqwest::Response) -> Error {
        let status = response.status();
        let message = match response.text().await {
            Ok(body) if !body.is_empty() => format!("{status}: {body}"),
            _ => status.to_string(),
        };
        Error::Store {
            operation: operation.to_string(),
            message,
        }
    }
}

#[async_trait]
impl StoreClient for RemoteStoreClient {
    async fn table_status(&self, table: &str) -> Result<Option<TableStatus>> {
        let response = self.authed(self.http.get(self.table_url(table))).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let description: TableDescription = response.json().await?;
                Ok(Some(description.status))
            }
            _ => Err(Self::reject("table_status", response).await),
        }
    }

    async fn create_table(&self, spec: &TableSpec) -> Result<()> {
        let url = format!("{}/tables", self.endpoint);
        let response = self.authed(self.http.post(url)).json(spec).send().await?;
        // The service reports an already-existing table as a conflict;
        // create-if-absent treats that as success.
        if response.status().is_success() || response.status() == StatusCode::CONFLICT {
            Ok(())
        } else {
            Err(Self::reject("create_table", response).await)
        }
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        let response = self
            .authed(self.http.delete(self.table_url(table)))
            .send()
            .await?;
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(Self::reject("delete_table", response).await)
        }
    }

    async fn put_item(&self, table: &str, item: &StoreItem) -> Result<()> {
        let response = self
            .authed(self.http.put(self.items_url(table)))
            .json(item)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::reject("put_item", response).await)
        }
    }

    async fn delete_item(&self, table: &str, partition_key: &str, sort_key: &str) -> Result<()> {
        let body = serde_json::json!({
            "partition_key": partition_key,
            "sort_key": sort_key,
        });
        let response = self
            .authed(self.http.delete(self.items_url(table)))
            .json(&body)
            .send()
            .await?;
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(Self::reject("delete_item", response).await)
        }
    }

    async fn query_partition(&self, table: &str, partition_key: &str) -> Result<Vec<StoreItem>> {
        let response = self
            .authed(self.http.get(self.items_url(table)))
            .query(&[("partition_key", partition_key)])
            .send()
            .await?;
        if response.status().is_success() {
            let page: ItemPage = response.json().await?;
            Ok(page.items)
        } else {
            Err(Self::reject("query_partition", response).await)
        }
    }
}
