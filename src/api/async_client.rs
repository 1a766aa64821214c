//! Purpose: Async facade over the blocking client for callers running on tokio.
//! Exports: `AsyncClient`.
//! Role: Same catalogue and binding; relations resolve to futures instead of values.
//! Invariants: Blocking HTTP runs on tokio's blocking pool, never on a runtime worker.
//! Invariants: Instances bound here hold a weak handle to the `AsyncClient`, not the inner one.
use super::client::{Client, ClientConfig, entity_path};
use crate::core::bind::{BindContext, bind};
use crate::core::error::{Error, ErrorKind};
use crate::core::instance::{ClientHandle, Instance};
use crate::core::relation::{EntityKind, Fetch, FetchFuture, FetchRequest};
use crate::models::registry;
use serde_json::Value;
use std::sync::Arc;

pub struct AsyncClient {
    inner: Arc<Client>,
}

impl std::fmt::Debug for AsyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncClient")
            .field("config", self.inner.config())
            .finish()
    }
}

impl AsyncClient {
    pub fn new(config: ClientConfig) -> Arc<Self> {
        Arc::new(Self {
            inner: Client::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    pub fn bind_context(self: &Arc<Self>) -> BindContext<'static> {
        let config = self.inner.config();
        BindContext::new(registry())
            .with_mode(config.mode())
            .with_api_version(config.api_version())
            .with_client(ClientHandle::attach(self))
    }

    pub fn bind(self: &Arc<Self>, payload: &Value, model: &str) -> Result<Instance, Error> {
        bind(payload, model, &self.bind_context())
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, Error> {
        let inner = Arc::clone(&self.inner);
        let path = path.to_string();
        tokio::task::spawn_blocking(move || inner.get_json(&path))
            .await
            .map_err(join_error)?
    }

    pub async fn user(self: &Arc<Self>, id: i64) -> Result<Instance, Error> {
        Arc::clone(self)
            .fetch(FetchRequest {
                entity: EntityKind::User,
                id,
            })
            .await
    }

    pub async fn beatmap(self: &Arc<Self>, id: i64) -> Result<Instance, Error> {
        Arc::clone(self)
            .fetch(FetchRequest {
                entity: EntityKind::Beatmap,
                id,
            })
            .await
    }

    pub async fn beatmapset(self: &Arc<Self>, id: i64) -> Result<Instance, Error> {
        Arc::clone(self)
            .fetch(FetchRequest {
                entity: EntityKind::Beatmapset,
                id,
            })
            .await
    }

    pub async fn score(self: &Arc<Self>, id: i64) -> Result<Instance, Error> {
        let payload = self.get_json(&format!("scores/{id}")).await?;
        self.bind(&payload, "Score")
    }
}

impl Fetch for AsyncClient {
    type Output = FetchFuture;

    fn fetch(self: Arc<Self>, request: FetchRequest) -> Self::Output {
        Box::pin(async move {
            let payload = self.get_json(&entity_path(request)).await?;
            self.bind(&payload, request.entity.model())
        })
    }
}

fn join_error(err: tokio::task::JoinError) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("blocking request task failed")
        .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::AsyncClient;
    use crate::api::client::{Client, ClientConfig};
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn bound_instances_point_at_the_async_client() {
        let client = AsyncClient::new(ClientConfig::new());
        let forum = client
            .bind(&json!({"id": 1, "name": "General", "description": ""}), "Forum")
            .expect("bind");
        assert!(forum.client().upgrade::<AsyncClient>().is_some());
        assert!(forum.client().upgrade::<Client>().is_none());
    }

    #[tokio::test]
    async fn transport_failures_surface_through_the_future() {
        // Port 9 (discard) is closed on loopback in test environments.
        let config = ClientConfig::new()
            .with_base_url("http://127.0.0.1:9/api/v2")
            .expect("base");
        let client = AsyncClient::new(config);
        let err = client.user(2).await.expect_err("no server");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
