pub mod http;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use log::info;
use crate::error::Result;
use crate::models::chat::{ ApiMessage, ConversationId, ConversationSummary };
use self::http::HttpConversationApi;

/// Remote collaborator that owns persistence and bot replies.
#[async_trait]
pub trait ConversationApi: Send + Sync {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>>;

    async fn create_conversation(&self) -> Result<ConversationSummary>;

    async fn list_messages(&self, conversation_id: ConversationId) -> Result<Vec<ApiMessage>>;

    /// Returns the bot reply batch in server order.
    async fn send_message(
        &self,
        conversation_id: ConversationId,
        text: &str
    ) -> Result<Vec<ApiMessage>>;

    async fn delete_conversation(&self, conversation_id: ConversationId) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub fn new_client(config: &ApiConfig) -> Result<Arc<dyn ConversationApi>> {
    let client = HttpConversationApi::from_config(config)?;
    info!(
        "Conversation API configured: BaseURL={}, Timeout={:?}",
        client.base_url(),
        config.request_timeout
    );
    Ok(Arc::new(client))
}
