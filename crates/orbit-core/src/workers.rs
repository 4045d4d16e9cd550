//! CPU-load-aware worker-count chooser (spec §4.3/§5).
//!
//! Reads current CPU utilization and picks a worker count from
//! `{ceil(cpus*0.6), cpus-1, cpus-2}` depending on how loaded the machine
//! already is, degrading to a single worker if CPU detection itself fails.
//! Each stage's `rayon` thread pool is sized from this before its
//! per-satellite worker loop starts.

use sysinfo::System;

#[derive(Debug, Clone, Copy)]
pub struct CpuThresholds {
    /// SOURCE: spec.md §4.3 "thresholds cpu_usage_threshold_high/medium
    /// (with cited defaults)" — defaults adopted from the teacher's own
    /// operational practice of leaving headroom for a loaded CI/workstation
    /// host: >85% observed load is treated as "high", >50% as "medium".
    pub high_pct: f32,
    pub medium_pct: f32,
}

impl Default for CpuThresholds {
    fn default() -> Self {
        CpuThresholds {
            high_pct: 85.0,
            medium_pct: 50.0,
        }
    }
}

pub fn choose_worker_count(thresholds: CpuThresholds) -> usize {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    // A single refresh_cpu_usage() call yields 0% on first sample for many
    // backends; sleep briefly so the second sample is meaningful, matching
    // the crate's documented usage pattern.
    std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();

    let cpus = sys.cpus();
    if cpus.is_empty() {
        return 1;
    }

    let logical_cpus = num_cpus::get().max(1);
    let avg_load: f32 = cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32;

    if avg_load >= thresholds.high_pct {
        ((logical_cpus as f64) * 0.6).ceil() as usize
    } else if avg_load >= thresholds.medium_pct {
        logical_cpus.saturating_sub(2).max(1)
    } else {
        logical_cpus.saturating_sub(1).max(1)
    }
}
