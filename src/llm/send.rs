use super::{decode_reply, ChatBackend, ClientError, SupervisorReply};
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SupervisorRequest {
    pub q: String,
}

pub struct SupervisorClient {
    client: Client,
    endpoint: String,
}

impl SupervisorClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Makes the actual HTTP request to the supervisor-bot endpoint.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn post_question(&self, question: &str) -> Result<SupervisorReply, ClientError> {
        let request = SupervisorRequest { q: question.to_string() };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else if e.is_connect() {
                    ClientError::Connection {
                        endpoint: self.endpoint.clone(),
                    }
                } else {
                    ClientError::Network(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Network(e)
            }
        })?;
        debug!(status = status.as_u16(), bytes = body.len(), "Supervisor-bot responded");

        decode_reply(status.as_u16(), &body)
    }
}

#[async_trait]
impl ChatBackend for SupervisorClient {
    async fn ask(&self, question: &str) -> Result<SupervisorReply, ClientError> {
        self.post_question(question).await
    }
}
