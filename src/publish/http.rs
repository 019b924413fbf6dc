// ABOUTME: HTTP/1.1 publisher for the remote workspace REST API.
// ABOUTME: One connection per request over hyper, with bearer auth and a per-request timeout.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use hyper::{Method, Request, Uri};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::Value;
use tokio::net::TcpStream;

use super::{PublishError, Publisher};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::types::{ArtifactKind, WorkspaceId, WorkspaceName};

const JSON: &str = "application/json";
const OCTET_STREAM: &str = "application/octet-stream";

/// Parsed `http://host[:port][/base]` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
    base_path: String,
}

impl Endpoint {
    pub fn parse(endpoint: &str) -> std::result::Result<Self, PublishError> {
        let invalid = |reason: &str| PublishError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };

        let uri = endpoint
            .parse::<Uri>()
            .map_err(|e| invalid(&e.to_string()))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(invalid(&format!("unsupported scheme {other}"))),
            None => return Err(invalid("missing scheme")),
        }

        let host = uri.host().ok_or_else(|| invalid("missing host"))?;

        Ok(Self {
            host: host.to_string(),
            port: uri.port_u16().unwrap_or(80),
            base_path: uri.path().trim_end_matches('/').to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Value for the `Host` header.
    pub fn authority(&self) -> String {
        if self.port == 80 {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Full request path for an API path.
    pub fn path(&self, api_path: &str) -> String {
        format!("{}{}", self.base_path, api_path)
    }
}

/// Remote collection name for an artifact kind.
fn collection(kind: ArtifactKind) -> std::result::Result<&'static str, PublishError> {
    match kind {
        ArtifactKind::Notebook => Ok("notebooks"),
        ArtifactKind::Pipeline => Ok("pipelines"),
        ArtifactKind::Dataflow => Ok("dataflows"),
        ArtifactKind::SparkJob => Ok("sparkJobDefinitions"),
        ArtifactKind::Unrecognized => Err(PublishError::UnsupportedKind(kind)),
    }
}

fn item_path(workspace: &WorkspaceId, collection: &str, name: &str) -> String {
    format!(
        "/v1/workspaces/{}/{}/{}",
        urlencoding::encode(workspace.as_str()),
        collection,
        urlencoding::encode(name)
    )
}

#[derive(Deserialize)]
struct WorkspaceLookup {
    id: WorkspaceId,
}

/// Publisher talking to the workspace REST API over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    endpoint: Endpoint,
    token: Option<String>,
    timeout: Duration,
    known_workspaces: HashMap<String, WorkspaceId>,
}

impl HttpPublisher {
    pub fn new(endpoint: Endpoint, token: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint,
            token,
            timeout,
            known_workspaces: HashMap::new(),
        }
    }

    /// Build from the `api` section of the config file.
    pub fn from_config(
        api: &ApiConfig,
        known_workspaces: HashMap<String, WorkspaceId>,
    ) -> Result<Self> {
        let endpoint = Endpoint::parse(&api.endpoint)?;
        let token = api.token.as_ref().map(|t| t.resolve()).transpose()?;
        Ok(Self {
            known_workspaces,
            ..Self::new(endpoint, token, api.timeout)
        })
    }

    async fn send(
        &self,
        method: Method,
        api_path: &str,
        content_type: &str,
        body: Bytes,
    ) -> std::result::Result<Bytes, PublishError> {
        let exchange = self.exchange(method, api_path, content_type, body);
        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::Timeout(self.timeout)),
        }
    }

    async fn exchange(
        &self,
        method: Method,
        api_path: &str,
        content_type: &str,
        body: Bytes,
    ) -> std::result::Result<Bytes, PublishError> {
        let authority = self.endpoint.authority();
        let path = self.endpoint.path(api_path);

        let stream = TcpStream::connect((self.endpoint.host(), self.endpoint.port()))
            .await
            .map_err(|e| PublishError::Connect(format!("{}: {}", authority, e)))?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| {
                PublishError::Connect(format!("{}: HTTP handshake failed: {}", authority, e))
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::warn!("workspace API connection error: {}", e);
            }
        });

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(path.as_str())
            .header(HOST, &authority)
            .header(CONTENT_TYPE, content_type);
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = builder
            .body(Full::new(body))
            .map_err(|e| PublishError::Request(format!("failed to build request: {}", e)))?;

        tracing::debug!(%method, %path, "sending workspace API request");

        let resp = sender
            .send_request(req)
            .await
            .map_err(|e| PublishError::Request(e.to_string()))?;

        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .map_err(|e| PublishError::Request(format!("failed to read response: {}", e)))?
            .to_bytes();

        if !status.is_success() {
            return Err(PublishError::Status {
                method: method.to_string(),
                path,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        Ok(bytes)
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn resolve_workspace(
        &self,
        name: &WorkspaceName,
    ) -> std::result::Result<WorkspaceId, PublishError> {
        if let Some(id) = self.known_workspaces.get(name.as_str()) {
            return Ok(id.clone());
        }

        let api_path = format!(
            "/v1/workspaces?displayName={}",
            urlencoding::encode(name.as_str())
        );
        let bytes = match self.send(Method::GET, &api_path, JSON, Bytes::new()).await {
            Ok(bytes) => bytes,
            Err(PublishError::Status { status: 404, .. }) => {
                return Err(PublishError::WorkspaceNotFound(name.to_string()));
            }
            Err(e) => return Err(e),
        };

        let lookup: WorkspaceLookup = serde_json::from_slice(&bytes)
            .map_err(|e| PublishError::InvalidResponse(format!("workspace lookup: {}", e)))?;
        Ok(lookup.id)
    }

    async fn publish_notebook(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        content: &[u8],
    ) -> std::result::Result<(), PublishError> {
        let path = item_path(workspace, "notebooks", name);
        self.send(Method::PUT, &path, OCTET_STREAM, Bytes::copy_from_slice(content))
            .await?;
        Ok(())
    }

    async fn publish_pipeline(
        &self,
        workspace: &WorkspaceId,
        body: &str,
    ) -> std::result::Result<(), PublishError> {
        let path = format!(
            "/v1/workspaces/{}/pipelines",
            urlencoding::encode(workspace.as_str())
        );
        self.send(Method::POST, &path, JSON, Bytes::from(body.to_string()))
            .await?;
        Ok(())
    }

    async fn publish_dataflow(
        &self,
        workspace: &WorkspaceId,
        name: &str,
        body: &Value,
    ) -> std::result::Result<(), PublishError> {
        let path = item_path(workspace, "dataflows", name);
        let payload = serde_json::to_vec(body)
            .map_err(|e| PublishError::Request(format!("failed to encode dataflow: {}", e)))?;
        self.send(Method::PUT, &path, JSON, Bytes::from(payload)).await?;
        Ok(())
    }

    async fn delete_item(
        &self,
        workspace: &WorkspaceId,
        kind: ArtifactKind,
        name: &str,
    ) -> std::result::Result<(), PublishError> {
        let path = item_path(workspace, collection(kind)?, name);
        self.send(Method::DELETE, &path, JSON, Bytes::new()).await?;
        Ok(())
    }

    async fn restore_item(
        &self,
        workspace: &WorkspaceId,
        kind: ArtifactKind,
        name: &str,
        previous_state: &Value,
    ) -> std::result::Result<(), PublishError> {
        let path = item_path(workspace, collection(kind)?, name);
        let payload = serde_json::to_vec(previous_state).map_err(|e| {
            PublishError::Request(format!("failed to encode previous state: {}", e))
        })?;
        self.send(Method::PUT, &path, JSON, Bytes::from(payload)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_endpoint_with_port_and_base_path() {
        let endpoint = Endpoint::parse("http://api.internal:9000/fabric/").unwrap();
        assert_eq!(endpoint.host(), "api.internal");
        assert_eq!(endpoint.port(), 9000);
        assert_eq!(endpoint.authority(), "api.internal:9000");
        assert_eq!(endpoint.path("/v1/workspaces"), "/fabric/v1/workspaces");
    }

    #[test]
    fn default_port_is_omitted_from_authority() {
        let endpoint = Endpoint::parse("http://localhost").unwrap();
        assert_eq!(endpoint.port(), 80);
        assert_eq!(endpoint.authority(), "localhost");
    }

    #[test]
    fn rejects_https_and_missing_scheme() {
        assert!(matches!(
            Endpoint::parse("https://secure.example.com"),
            Err(PublishError::InvalidEndpoint { .. })
        ));
        assert!(Endpoint::parse("localhost:8080/path").is_err());
    }

    #[test]
    fn item_path_encodes_names() {
        let ws = WorkspaceId::new("ws 1");
        assert_eq!(
            item_path(&ws, "notebooks", "daily load"),
            "/v1/workspaces/ws%201/notebooks/daily%20load"
        );
    }

    #[test]
    fn unrecognized_kind_has_no_collection() {
        assert!(matches!(
            collection(ArtifactKind::Unrecognized),
            Err(PublishError::UnsupportedKind(ArtifactKind::Unrecognized))
        ));
    }
}
