//! System info tool definition.

use serde_json::{Value, json};
use sysinfo::System;
use tracing::{info, instrument};

use crate::domains::tools::{NoParams, ToolContext, ToolDefinition, ToolError};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// System info tool - a snapshot of the host the server runs on.
pub struct SystemInfoTool;

#[async_trait::async_trait]
impl ToolDefinition for SystemInfoTool {
    const NAME: &'static str = "system_info";
    const DESCRIPTION: &'static str =
        "Returns OS, CPU, memory, server runtime version and working directory of the host.";

    type Params = NoParams;

    #[instrument(skip_all)]
    async fn execute(_params: NoParams, _ctx: &ToolContext) -> Result<Value, ToolError> {
        // sysinfo reads /proc and friends synchronously.
        let snapshot = tokio::task::spawn_blocking(collect)
            .await
            .map_err(|e| ToolError::internal(format!("system info task failed: {}", e)))?;

        info!("System info collected");
        Ok(snapshot)
    }
}

fn collect() -> Value {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.refresh_cpu_all();

    let cpu = sys
        .cpus()
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string());

    let os = System::long_os_version().unwrap_or_else(|| std::env::consts::OS.to_string());

    let working_directory = std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    json!({
        "os": os,
        "cpu": cpu,
        "cpu_count": sys.cpus().len(),
        "ram_gb": bytes_to_gb(sys.total_memory()),
        "ram_available_gb": bytes_to_gb(sys.available_memory()),
        "runtime_version": format!(
            "{} {} ({})",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::ARCH
        ),
        "working_directory": working_directory,
    })
}

/// Bytes to gigabytes, rounded to two decimals.
fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 100.0).round() / 100.0
}
