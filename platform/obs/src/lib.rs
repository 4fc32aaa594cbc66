//! Tracing bootstrap shared by the roster binaries.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "info,tower_http=warn";

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "employee-roster",
            env_filter: None,
            otlp_endpoint: None,
        }
    }
}

impl ObsConfig {
    /// Explicit filter first, then `RUST_LOG`, then the built-in default.
    fn resolve_filter(&self, from_env: Option<String>) -> String {
        self.env_filter
            .clone()
            .or(from_env)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }

    fn resolve_endpoint(&self, from_env: Option<String>) -> Option<String> {
        self.otlp_endpoint
            .clone()
            .or(from_env)
            .filter(|value| !value.trim().is_empty())
    }
}

/// Install the fmt subscriber, plus an OTLP span exporter when an endpoint is configured.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());
    let env_filter = EnvFilter::try_new(filter)?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    match config.resolve_endpoint(std::env::var("OTLP_ENDPOINT").ok()) {
        Some(endpoint) => {
            let tracer = otlp_tracer(config.service_name, endpoint)?;
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .try_init()?;
        }
        None => registry.try_init()?,
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

fn otlp_tracer(service_name: &'static str, endpoint: String) -> Result<sdk::trace::Tracer> {
    let exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(endpoint)
        .build()?;

    let resource = Resource::builder().with_service_name(service_name).build();

    let provider = sdk::trace::SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build();
    Ok(provider.tracer(service_name))
}
