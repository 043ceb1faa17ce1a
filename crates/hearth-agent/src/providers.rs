//! REST adapters for the host platform.
//!
//! Talks to a Home-Assistant-compatible REST API: `GET /api/states` for
//! entity snapshots, `POST /api/services/{domain}/{action}` to execute a
//! command. These are the only pieces of the system that know the host's
//! wire format.

use async_trait::async_trait;
use hearth_core::Command;
use hearth_platform::{CommandExecutor, EntitySnapshot, EntitySource, PlatformError};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Connection details shared by both adapters.
#[derive(Clone, Debug)]
pub struct PlatformApi {
    /// REST base URL, no trailing slash.
    pub base_url: String,
    /// Long-lived access token.
    pub token: String,
}

#[derive(Deserialize)]
struct RawState {
    entity_id: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

fn snapshot_from_state(raw: RawState) -> EntitySnapshot {
    let domain = raw
        .entity_id
        .split_once('.')
        .map_or("unknown", |(domain, _)| domain)
        .to_string();
    let name = raw
        .attributes
        .get("friendly_name")
        .and_then(Value::as_str)
        .unwrap_or(&raw.entity_id)
        .to_string();
    let exposed = raw
        .attributes
        .get("conversation_exposed")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    EntitySnapshot {
        entity_id: raw.entity_id,
        name,
        domain,
        attributes: raw.attributes,
        exposed,
    }
}

/// Entity registry over `GET /api/states`.
pub struct RestEntitySource {
    api: PlatformApi,
    client: reqwest::Client,
}

impl RestEntitySource {
    /// Create a source.
    pub fn new(api: PlatformApi, client: reqwest::Client) -> Self {
        Self { api, client }
    }
}

#[async_trait]
impl EntitySource for RestEntitySource {
    async fn list_entities(&self) -> Result<Vec<EntitySnapshot>, PlatformError> {
        let url = format!("{}/api/states", self.api.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api.token)
            .send()
            .await
            .map_err(|e| PlatformError::Source(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Source(format!("GET /api/states -> {status}")));
        }

        let states: Vec<RawState> = response
            .json()
            .await
            .map_err(|e| PlatformError::Source(e.to_string()))?;
        debug!(count = states.len(), "fetched entity states");
        Ok(states.into_iter().map(snapshot_from_state).collect())
    }
}

/// Command execution over `POST /api/services/{domain}/{action}`.
pub struct RestCommandExecutor {
    api: PlatformApi,
    client: reqwest::Client,
}

impl RestCommandExecutor {
    /// Create an executor.
    pub fn new(api: PlatformApi, client: reqwest::Client) -> Self {
        Self { api, client }
    }
}

#[async_trait]
impl CommandExecutor for RestCommandExecutor {
    async fn execute(&self, command: &Command) -> Result<(), PlatformError> {
        let Some((domain, action)) = command.service.split_once('.') else {
            return Err(PlatformError::Execution(format!(
                "malformed service '{}'",
                command.service
            )));
        };

        let url = format!("{}/api/services/{domain}/{action}", self.api.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api.token)
            .json(&command.data)
            .send()
            .await
            .map_err(|e| PlatformError::Execution(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Execution(format!(
                "{}.{action} -> {status}",
                domain
            )));
        }
        debug!(service = %command.service, "executed command");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer) -> PlatformApi {
        PlatformApi {
            base_url: server.uri(),
            token: "token".to_string(),
        }
    }

    fn command(service: &str, entity_id: &str) -> Command {
        let mut data = Map::new();
        let _ = data.insert("entity_id".to_string(), json!(entity_id));
        Command {
            service: service.to_string(),
            data,
        }
    }

    #[tokio::test]
    async fn list_entities_maps_states() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/states"))
            .and(header("authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "entity_id": "light.office_lamp",
                    "state": "on",
                    "attributes": {"friendly_name": "Office Lamp", "brightness": 180}
                },
                {
                    "entity_id": "camera.doorbell",
                    "state": "idle",
                    "attributes": {"conversation_exposed": false}
                }
            ])))
            .mount(&server)
            .await;

        let source = RestEntitySource::new(api(&server), reqwest::Client::new());
        let entities = source.list_entities().await.unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_id, "light.office_lamp");
        assert_eq!(entities[0].name, "Office Lamp");
        assert_eq!(entities[0].domain, "light");
        assert!(entities[0].exposed);
        assert!(!entities[1].exposed);
        // Missing friendly_name falls back to the entity id.
        assert_eq!(entities[1].name, "camera.doorbell");
    }

    #[tokio::test]
    async fn list_entities_maps_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/states"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let source = RestEntitySource::new(api(&server), reqwest::Client::new());
        assert!(matches!(
            source.list_entities().await.unwrap_err(),
            PlatformError::Source(_)
        ));
    }

    #[tokio::test]
    async fn execute_posts_service_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services/light/turn_on"))
            .and(body_partial_json(json!({"entity_id": "light.office_lamp"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let executor = RestCommandExecutor::new(api(&server), reqwest::Client::new());
        executor
            .execute(&command("light.turn_on", "light.office_lamp"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn execute_rejects_malformed_service() {
        let server = MockServer::start().await;
        let executor = RestCommandExecutor::new(api(&server), reqwest::Client::new());
        assert!(matches!(
            executor.execute(&command("reload", "light.a")).await.unwrap_err(),
            PlatformError::Execution(_)
        ));
    }

    #[tokio::test]
    async fn execute_maps_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services/light/turn_on"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let executor = RestCommandExecutor::new(api(&server), reqwest::Client::new());
        assert!(executor
            .execute(&command("light.turn_on", "light.a"))
            .await
            .is_err());
    }
}
