//! Tests for runtime introspection helpers

use super::*;

const PROC_STATUS_SAMPLE: &str = "Name:\tinfra-deployer
Umask:\t0022
State:\tS (sleeping)
Pid:\t4242
VmPeak:\t  1180092 kB
VmSize:\t  1115904 kB
VmHWM:\t    24576 kB
VmRSS:\t    20480 kB
Threads:\t9
voluntary_ctxt_switches:\t150
";

#[test]
fn test_format_uptime_seconds_only() {
    assert_eq!(format_uptime(Duration::from_millis(2_153)), "2.153s");
    assert_eq!(format_uptime(Duration::ZERO), "0.000s");
}

#[test]
fn test_format_uptime_minutes() {
    assert_eq!(format_uptime(Duration::from_millis(242_007)), "4m2.007s");
}

#[test]
fn test_format_uptime_hours_keeps_zero_minutes() {
    assert_eq!(format_uptime(Duration::from_secs(3_602)), "1h0m2.000s");
}

#[test]
fn test_parse_proc_status() {
    let stats = ProcessStats::parse(PROC_STATUS_SAMPLE);

    assert_eq!(stats.threads, Some(9));
    assert_eq!(stats.memory.rss_mb, Some(20));
    assert_eq!(stats.memory.peak_rss_mb, Some(24));
    assert_eq!(stats.memory.virtual_mb, Some(1089));
}

#[test]
fn test_parse_ignores_garbage() {
    let stats = ProcessStats::parse("nonsense\nThreads:\tmany\n:\n");

    assert_eq!(stats, ProcessStats::default());
}

#[test]
fn test_uptime_is_monotonic() {
    let uptime = Uptime::start();
    let first = uptime.elapsed();
    let second = uptime.elapsed();

    assert!(second >= first);
}

#[test]
fn test_hostname_is_never_empty() {
    assert!(!hostname().is_empty());
}

#[test]
fn test_rust_version_is_stamped() {
    assert!(!rust_version().is_empty());
}

#[tokio::test]
async fn test_alive_tasks_inside_runtime() {
    assert!(alive_tasks().is_some());
}

#[test]
fn test_alive_tasks_outside_runtime() {
    assert_eq!(alive_tasks(), None);
}
