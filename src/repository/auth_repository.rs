use std::time::Duration;

use anyhow::Error;
use async_trait::async_trait;
use log::error;
use serde::{Deserialize, Serialize};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const CHECK_API_KEY_PATH: &str = "api-key/checkApiKeyValid";

/// Remote authorization collaborator. A key counts as valid only when the
/// service answers status 0; transport failures and timeouts count as
/// invalid rather than failing the whole request.
#[async_trait]
pub trait ApiKeyValidator: Send + Sync {
    async fn check_api_key(&self, api_key: &str) -> bool;
}

#[derive(Serialize)]
struct CheckApiKeyRequest<'a> {
    api_key: &'a str,
}

#[derive(Deserialize)]
struct CheckApiKeyResponse {
    status: i32,
}

#[derive(Clone)]
pub struct RemoteApiKeyRepository {
    client: reqwest::Client,
    uri: String,
}

impl RemoteApiKeyRepository {
    pub fn new(base_uri: &str, request_timeout: Option<u64>) -> Result<Self, Error> {
        let timeout = Duration::from_secs(request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS));

        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                return Err(Error::from(e))
            }
        };

        Ok(RemoteApiKeyRepository {
            client,
            uri: format!("{}{}", base_uri, CHECK_API_KEY_PATH),
        })
    }
}

#[async_trait]
impl ApiKeyValidator for RemoteApiKeyRepository {
    async fn check_api_key(&self, api_key: &str) -> bool {
        let request = CheckApiKeyRequest { api_key };

        let response = match self.client.post(&self.uri).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("failed to reach api key validation service: {e}");
                return false;
            }
        };

        let body = match response.json::<CheckApiKeyResponse>().await {
            Ok(body) => body,
            Err(e) => {
                error!("failed to parse api key validation response: {e}");
                return false;
            }
        };

        body.status == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_endpoint_is_joined_onto_base_uri() {
        let repository = RemoteApiKeyRepository::new("https://api.cryptonets.ai/node/", None).unwrap();
        assert_eq!(repository.uri, "https://api.cryptonets.ai/node/api-key/checkApiKeyValid");
    }

    #[test]
    fn test_request_body_shape() {
        let request = CheckApiKeyRequest { api_key: "secret" };
        let serialized = serde_json::to_string(&request).unwrap();
        assert_eq!(serialized, r#"{"api_key":"secret"}"#);
    }
}
