use crate::api::client::{build_http_client, execute_json, join_url};
use crate::types::{ChatReply, ChatRequest, Result, Role};
use crate::utils::config::ChatConfig;
use tracing::debug;

/// Client for the HR chat bot, which lives outside the job-board API.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl ChatClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(None)?,
            base_url: config.base_url.clone(),
            user_id: config.user_id.clone(),
        })
    }

    /// Send `prompt` as `role` and return the bot's reply text.
    pub async fn send(&self, prompt: &str, role: Role) -> Result<String> {
        let body = ChatRequest {
            user_id: self.user_id.clone(),
            prompt: prompt.to_string(),
            user_type: role.chat_user_type().to_string(),
        };
        let req = self.http.post(join_url(&self.base_url, "/chat")).json(&body);
        let reply: ChatReply = execute_json(req).await?;
        debug!(chars = reply.message.len(), "Chat reply received");
        Ok(reply.message)
    }
}
