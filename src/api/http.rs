use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, Method, RequestBuilder };
use serde::de::DeserializeOwned;
use url::Url;
use super::{ ApiConfig, ConversationApi };
use crate::error::{ DashboardError, Result };
use crate::models::chat::{ ApiMessage, ConversationId, ConversationSummary, SendMessageRequest };

#[derive(Debug, Clone)]
pub struct HttpConversationApi {
    http: HttpClient,
    base_url: Url,
}

impl HttpConversationApi {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|source| DashboardError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(DashboardError::Client)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn request(&self, method: Method, route: &str) -> Result<(RequestBuilder, String)> {
        let endpoint = format!("{} /{}", method, route);
        let url = self.base_url.join(route).map_err(|source| DashboardError::InvalidBaseUrl {
            url: format!("{}{}", self.base_url, route),
            source,
        })?;
        Ok((self.http.request(method, url), endpoint))
    }

    async fn execute(&self, req: RequestBuilder, endpoint: &str) -> Result<String> {
        debug!("-> {}", endpoint);
        let resp = req.send().await.map_err(|source| DashboardError::Network {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|source| DashboardError::Network {
            endpoint: endpoint.to_string(),
            source,
        })?;
        debug!("<- {} ({} bytes)", endpoint, body.len());
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        endpoint: &str
    ) -> Result<T> {
        let body = self.execute(req, endpoint).await?;
        serde_json::from_str(&body).map_err(|source| DashboardError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ConversationApi for HttpConversationApi {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let (req, endpoint) = self.request(Method::GET, "conversations")?;
        self.execute_json(req, &endpoint).await
    }

    async fn create_conversation(&self) -> Result<ConversationSummary> {
        let (req, endpoint) = self.request(Method::POST, "conversations")?;
        self.execute_json(req, &endpoint).await
    }

    async fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<ApiMessage>> {
        let route = format!("conversations/{}/messages", conversation_id);
        let (req, endpoint) = self.request(Method::GET, &route)?;
        self.execute_json(req, &endpoint).await
    }

    async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str
    ) -> Result<Vec<ApiMessage>> {
        let route = format!("conversations/{}/messages", conversation_id);
        let (req, endpoint) = self.request(Method::POST, &route)?;
        let payload = SendMessageRequest { content: text.to_string() };
        self.execute_json(req.json(&payload), &endpoint).await
    }

    async fn delete_conversation(&self, conversation_id: ConversationId) -> Result<()> {
        let route = format!("conversations/{}", conversation_id);
        let (req, endpoint) = self.request(Method::DELETE, &route)?;
        self.execute(req, &endpoint).await?;
        Ok(())
    }
}
