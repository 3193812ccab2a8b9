//! Firestore REST client
//!
//! Implements [`DocumentStore`] against the Firestore v1 REST API. All
//! calls are sequential; nothing here retries, and a failed request
//! surfaces as an error that aborts the run.

use super::codec::{decode_fields, encode_fields};
use crate::auth::TokenProvider;
use crate::error::{Error, Result};
use crate::store::{Document, DocumentStore, Value, Write};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Documents fetched per list request
const PAGE_SIZE: usize = 300;

/// REST client for one project's `(default)` database
pub struct FirestoreClient {
    http_client: Client,
    tokens: TokenProvider,
    base_url: String,
    /// `projects/{project}/databases/(default)/documents`
    root: String,
}

impl FirestoreClient {
    /// Create a client against the production endpoint
    pub fn new(tokens: TokenProvider) -> Self {
        // DEFAULT_BASE_URL is statically valid
        Self::with_base_url(tokens, DEFAULT_BASE_URL).expect("default base URL is valid")
    }

    /// Create a client against a custom endpoint (emulator, tests)
    pub fn with_base_url(tokens: TokenProvider, base_url: &str) -> Result<Self> {
        let parsed = url::Url::parse(base_url)?;
        let root = format!(
            "projects/{}/databases/(default)/documents",
            tokens.key().project_id
        );
        Ok(Self {
            http_client: Client::new(),
            tokens,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            root,
        })
    }

    /// Full resource name of a document
    fn resource_name(&self, path: &str) -> String {
        format!("{}/{}", self.root, path)
    }

    /// Relative path of a document, from its full resource name
    fn relative_path(&self, name: &str) -> String {
        name.strip_prefix(&self.root)
            .map(|rest| rest.trim_start_matches('/').to_string())
            .unwrap_or_else(|| name.to_string())
    }

    async fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.token().await?;
        Ok(req.bearer_auth(token))
    }

    async fn check(&self, response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::http_status(status, body))
    }

    /// List one page of collection ids under a document (or the root)
    async fn list_collections_page(
        &self,
        parent: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<ListCollectionIdsResponse> {
        let url = match parent {
            Some(path) => format!("{}/{}/{}:listCollectionIds", self.base_url, self.root, path),
            None => format!("{}/{}:listCollectionIds", self.base_url, self.root),
        };
        debug!(%url, "listing collection ids");

        let mut body = json!({ "pageSize": PAGE_SIZE });
        if let Some(token) = page_token {
            body["pageToken"] = json!(token);
        }

        let req = self.http_client.post(&url).json(&body);
        let response = self.authorize(req).await?.send().await.map_err(Error::Http)?;
        let response = self.check(response).await?;
        Ok(response.json().await.map_err(Error::Http)?)
    }

    /// List one page of documents in a collection
    async fn list_documents_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse> {
        let url = format!("{}/{}/{}", self.base_url, self.root, collection);
        debug!(%url, "listing documents");

        let mut query: Vec<(&str, String)> = vec![("pageSize", PAGE_SIZE.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let req = self.http_client.get(&url).query(&query);
        let response = self.authorize(req).await?.send().await.map_err(Error::Http)?;
        let response = self.check(response).await?;
        Ok(response.json().await.map_err(Error::Http)?)
    }

    /// Translate a [`Write`] into its commit wire form
    fn encode_write(&self, write: &Write) -> Result<serde_json::Value> {
        match write {
            Write::Set {
                path,
                fields,
                merge,
            } => {
                let mut wire = json!({
                    "update": {
                        "name": self.resource_name(path),
                        "fields": encode_fields(fields)?,
                    }
                });
                if *merge {
                    let paths: Vec<&String> = fields.keys().collect();
                    wire["updateMask"] = json!({ "fieldPaths": paths });
                }
                Ok(wire)
            }
            Write::Update { path, fields } => {
                let paths: Vec<&String> = fields.keys().collect();
                Ok(json!({
                    "update": {
                        "name": self.resource_name(path),
                        "fields": encode_fields(fields)?,
                    },
                    "updateMask": { "fieldPaths": paths },
                    "currentDocument": { "exists": true },
                }))
            }
            Write::Delete { path } => Ok(json!({ "delete": self.resource_name(path) })),
        }
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn list_collections(&self, parent: Option<&str>) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .list_collections_page(parent, page_token.as_deref())
                .await?;
            ids.extend(page.collection_ids);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(ids)
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self
                .list_documents_page(collection, page_token.as_deref())
                .await?;
            for doc in page.documents {
                let fields = match &doc.fields {
                    Some(map) => decode_fields(map)?,
                    None => BTreeMap::new(),
                };
                documents.push(Document::new(self.relative_path(&doc.name), fields));
            }
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(documents)
    }

    async fn set(&self, path: &str, fields: BTreeMap<String, Value>, merge: bool) -> Result<()> {
        let url = format!("{}/{}/{}", self.base_url, self.root, path);
        debug!(%url, merge, "writing document");

        let mut query: Vec<(&str, String)> = Vec::new();
        if merge {
            for key in fields.keys() {
                query.push(("updateMask.fieldPaths", key.clone()));
            }
        }

        let mut body = serde_json::Map::new();
        body.insert("fields".to_string(), encode_fields(&fields)?);

        let req = self.http_client.patch(&url).query(&query).json(&body);
        let response = self.authorize(req).await?.send().await.map_err(Error::Http)?;
        self.check(response).await?;
        Ok(())
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let url = format!("{}/{}:commit", self.base_url, self.root);
        debug!(%url, count = writes.len(), "committing batch");

        let wire_writes = writes
            .iter()
            .map(|w| self.encode_write(w))
            .collect::<Result<Vec<_>>>()?;
        let body = json!({ "writes": wire_writes });

        let req = self.http_client.post(&url).json(&body);
        let response = self.authorize(req).await?.send().await.map_err(Error::Http)?;
        self.check(response).await?;
        Ok(())
    }
}

// Wire response shapes

#[derive(Debug, Deserialize)]
struct ListCollectionIdsResponse {
    #[serde(rename = "collectionIds", default)]
    collection_ids: Vec<String>,
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<WireDocument>,
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Option<serde_json::Map<String, serde_json::Value>>,
}
