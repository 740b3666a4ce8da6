use auth::Authorize;
use backbone::memory::MemoryBackbone;
use backbone::nats::NatsBackbone;
use backbone::Backbone;
use config::{BackboneKind, Config};
use log::info;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod logging;

pub async fn init_backbone(config: &Config) -> Result<Arc<dyn Backbone>, backbone::Error> {
    match config.backbone {
        BackboneKind::Nats => {
            let nats = NatsBackbone::connect(config.nats_url()).await?;
            Ok(Arc::new(nats))
        }
        BackboneKind::Memory => {
            info!("Using the in-memory backbone");
            let memory = MemoryBackbone::new();
            for bucket in config.kv_buckets() {
                memory.create_bucket(bucket);
            }
            Ok(Arc::new(memory))
        }
    }
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub backbone: Arc<dyn Backbone>,
    pub authorizer: Arc<dyn Authorize>,
    pub sse_manager: Arc<sse::Manager>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        app_config: Config,
        backbone: Arc<dyn Backbone>,
        authorizer: Arc<dyn Authorize>,
    ) -> Self {
        Self {
            backbone,
            authorizer,
            sse_manager: Arc::new(sse::Manager::new()),
            config: app_config,
        }
    }

    pub fn backbone_ref(&self) -> &dyn Backbone {
        self.backbone.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use clap::Parser;

    #[tokio::test]
    async fn memory_backbone_starts_with_configured_buckets() {
        let config = Config::parse_from([
            "natssse_gateway",
            "--backbone",
            "memory",
            "--kv-buckets",
            "profiles",
        ]);

        let backbone = init_backbone(&config).await.unwrap();

        let profiles = backbone.key_value("profiles").await.unwrap();
        profiles.put("john", Bytes::from("{}")).await.unwrap();
        assert_eq!(profiles.get("john").await.unwrap(), Bytes::from("{}"));
        assert!(backbone.key_value("sessions").await.is_err());
    }
}
