//! Process and runtime introspection for `/api/v1/status`
//!
//! Memory and thread counts come from `/proc/self/status` on Linux; other
//! platforms report `None` rather than guessing.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Monotonic process start, captured once at startup
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::start()
    }
}

/// Render a duration as `1h2m3.456s`, dropping leading zero units
pub fn format_uptime(d: Duration) -> String {
    let total = d.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let millis = d.subsec_millis();

    if hours > 0 {
        format!("{}h{}m{}.{:03}s", hours, minutes, seconds, millis)
    } else if minutes > 0 {
        format!("{}m{}.{:03}s", minutes, seconds, millis)
    } else {
        format!("{}.{:03}s", seconds, millis)
    }
}

/// Compiler that built this binary, e.g. `rustc 1.85.0 (4d91de4e4 2025-02-17)`
pub fn rust_version() -> &'static str {
    env!("RUSTC_VERSION")
}

/// Host name of the machine (or container) running the service
pub fn hostname() -> String {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Tasks currently alive on the tokio runtime, if called from inside one
pub fn alive_tasks() -> Option<usize> {
    tokio::runtime::Handle::try_current()
        .ok()
        .map(|handle| handle.metrics().num_alive_tasks())
}

/// Memory figures in whole MiB
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStats {
    pub rss_mb: Option<u64>,
    pub peak_rss_mb: Option<u64>,
    pub virtual_mb: Option<u64>,
}

/// Snapshot of `/proc/self/status`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub threads: Option<u64>,
    pub memory: MemoryStats,
}

impl ProcessStats {
    /// Read the current process stats; empty on platforms without procfs
    pub fn sample() -> Self {
        std::fs::read_to_string("/proc/self/status")
            .map(|content| Self::parse(&content))
            .unwrap_or_default()
    }

    /// Parse the `Key:\tvalue [kB]` lines of a `/proc/<pid>/status` file
    pub fn parse(content: &str) -> Self {
        let mut stats = Self::default();
        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let Some(number) = value
                .split_whitespace()
                .next()
                .and_then(|v| v.parse::<u64>().ok())
            else {
                continue;
            };
            match key {
                "Threads" => stats.threads = Some(number),
                "VmRSS" => stats.memory.rss_mb = Some(kib_to_mb(number)),
                "VmHWM" => stats.memory.peak_rss_mb = Some(kib_to_mb(number)),
                "VmSize" => stats.memory.virtual_mb = Some(kib_to_mb(number)),
                _ => {}
            }
        }
        stats
    }
}

fn kib_to_mb(kib: u64) -> u64 {
    kib / 1024
}

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_tests;
