//! Application state: the assembled, read-only block registry.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::blocks::declare_bootstrap_blocks;
use crate::config::{Config, DefaultOverrides};
use crate::content::BlockRegistry;
use crate::lifecycle::{Lifecycle, ReadyContext};
use crate::tap::{TapDispatcher, TapRegistry};
use crate::theme::{TemplateRenderer, ThemeEngine};

/// Shared application state.
///
/// Cheap to clone; everything inside is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: BlockRegistry,
    taps: Arc<TapRegistry>,
}

impl AppState {
    /// Assemble the kernel from configuration.
    ///
    /// Order matters: config overrides are registered as filters, the bundled
    /// blocks subscribe to the ready event, and only then does the event fire.
    pub fn new(config: &Config) -> Result<Self> {
        let taps = Arc::new(TapRegistry::new());
        if let Some(path) = &config.defaults_file {
            DefaultOverrides::load(path)
                .context("failed to load default overrides")?
                .register(&taps);
        }

        let engine = ThemeEngine::new(config.theme_dir.as_deref())
            .context("failed to initialize theme engine")?;

        Self::assemble(taps, Arc::new(engine), |lifecycle, renderer| {
            declare_bootstrap_blocks(lifecycle, renderer);
        })
    }

    /// Build state from pre-registered filters, a renderer, and a declaration step.
    ///
    /// `declare` subscribes block types to the lifecycle; the ready event fires
    /// once it returns. Listener failures are logged and do not abort startup.
    pub fn assemble<F>(
        taps: Arc<TapRegistry>,
        renderer: Arc<dyn TemplateRenderer>,
        declare: F,
    ) -> Result<Self>
    where
        F: FnOnce(&Lifecycle, Arc<dyn TemplateRenderer>),
    {
        let lifecycle = Lifecycle::new();
        declare(&lifecycle, renderer);

        let dispatcher = TapDispatcher::new(Arc::clone(&taps));
        let registry = BlockRegistry::new();
        let report = lifecycle
            .fire_ready(ReadyContext::new(&dispatcher, &registry))
            .context("ready event fired twice")?;

        for (label, error) in &report.failures {
            warn!(listener = %label, error = %error, "block type not registered");
        }
        info!(block_types = registry.len(), "block registry ready");

        Ok(Self {
            inner: Arc::new(AppStateInner { registry, taps }),
        })
    }

    /// Registered block types.
    pub fn registry(&self) -> &BlockRegistry {
        &self.inner.registry
    }

    /// Filter registry used during startup.
    pub fn taps(&self) -> &TapRegistry {
        &self.inner.taps
    }
}
