//! Servo engine preferences.
//!
//! Builds a [`servo::Preferences`] from the `[servo]` config section:
//! - Thread pools sized to available CPU cores (clamped)
//! - HTTP cache size and shader pre-caching
//! - Optional user-agent override

use tracing::info;

use crate::config::ServoConfig;

/// Les valeurs numériques dérivées de la machine et de la configuration,
/// séparées de `servo::Preferences` pour pouvoir être testées.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineTuning {
    pub layout_threads: i64,
    pub async_runtime_workers: i64,
    pub image_cache_workers: i64,
    pub webrender_workers: i64,
    pub resource_workers: i64,
    pub cache_size: i64,
}

impl EngineTuning {
    pub fn new(config: &ServoConfig, cpus: i64) -> Self {
        let cpus = cpus.max(1);
        let layout_threads = if config.layout_threads > 0 {
            config.layout_threads
        } else {
            cpus.min(8)
        };

        Self {
            layout_threads,
            async_runtime_workers: (cpus * 2).min(16),
            image_cache_workers: cpus.min(8),
            webrender_workers: (cpus / 2).clamp(2, 8),
            resource_workers: cpus.min(8),
            cache_size: config.cache_size.max(0),
        }
    }
}

fn available_cpus() -> i64 {
    std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(4)
}

/// Builds Servo `Preferences` tuned for the current machine.
#[allow(clippy::field_reassign_with_default)]
pub fn build_servo_preferences(config: &ServoConfig) -> servo::Preferences {
    let cpus = available_cpus();
    let tuning = EngineTuning::new(config, cpus);

    let mut prefs = servo::Preferences::default();
    prefs.layout_threads = tuning.layout_threads;
    prefs.threadpools_async_runtime_workers_max = tuning.async_runtime_workers;
    prefs.threadpools_image_cache_workers_max = tuning.image_cache_workers;
    prefs.threadpools_webrender_workers_max = tuning.webrender_workers;
    prefs.threadpools_resource_workers_max = tuning.resource_workers;
    prefs.network_http_cache_size = tuning.cache_size;
    prefs.gfx_precache_shaders = config.precache_shaders;

    if !config.user_agent.is_empty() {
        prefs.user_agent = config.user_agent.clone();
    }

    info!(
        cpus,
        layout_threads = prefs.layout_threads,
        network_workers = prefs.threadpools_async_runtime_workers_max,
        cache_size = prefs.network_http_cache_size,
        custom_user_agent = !config.user_agent.is_empty(),
        "Servo preferences configured"
    );

    prefs
}
