//! Heap accounting for per-test memory deltas.
//!
//! [`TrackingAllocator`] wraps the system allocator and keeps a live-byte
//! counter and a high-water mark for the allocating thread. Tests run one at a
//! time on the harness thread, so the counters attribute exactly the
//! allocations a workload makes there, unaffected by other threads (the test
//! runner's, for instance).
//!
//! Install it in the final binary:
//!
//! ```ignore
//! #[global_allocator]
//! static GLOBAL: microbench_suite::memory::TrackingAllocator =
//!     microbench_suite::memory::TrackingAllocator;
//! ```
//!
//! Without it every reading is zero.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Global allocator that tracks live heap bytes per thread.
pub struct TrackingAllocator;

static ACTIVE: AtomicBool = AtomicBool::new(false);

thread_local! {
    // Signed: memory freed here may have been allocated by another thread.
    static LIVE: Cell<i64> = const { Cell::new(0) };
    static PEAK: Cell<i64> = const { Cell::new(0) };
}

fn record(delta: i64) {
    let _ = LIVE.try_with(|live| {
        let now = live.get() + delta;
        live.set(now);
        let _ = PEAK.try_with(|peak| {
            if now > peak.get() {
                peak.set(now);
            }
        });
    });
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ret = System.alloc(layout);
        if !ret.is_null() {
            ACTIVE.store(true, Ordering::Relaxed);
            record(layout.size() as i64);
        }
        ret
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ret = System.alloc_zeroed(layout);
        if !ret.is_null() {
            ACTIVE.store(true, Ordering::Relaxed);
            record(layout.size() as i64);
        }
        ret
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        record(-(layout.size() as i64));
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let ret = System.realloc(ptr, layout, new_size);
        if !ret.is_null() {
            record(new_size as i64 - layout.size() as i64);
        }
        ret
    }
}

/// Whether [`TrackingAllocator`] is the active global allocator.
pub fn tracking_active() -> bool {
    ACTIVE.load(Ordering::Relaxed)
}

/// Net heap bytes allocated by the current thread.
pub fn live_bytes() -> i64 {
    LIVE.try_with(Cell::get).unwrap_or(0)
}

/// Highest [`live_bytes`] value seen since the last [`reset_peak`].
pub fn peak_live_bytes() -> u64 {
    PEAK.try_with(Cell::get).unwrap_or(0).max(0) as u64
}

/// Restarts the high-water mark at the current live value.
pub fn reset_peak() {
    let now = live_bytes();
    let _ = PEAK.try_with(|peak| peak.set(now));
}

/// Clamped difference `after - before`.
pub fn delta(before: i64, after: i64) -> u64 {
    after.saturating_sub(before).max(0) as u64
}

/// Peak resident set size of the process, where the platform reports it.
pub fn peak_resident_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        let status = std::fs::read_to_string("/proc/self/status").ok()?;
        parse_status_kib(&status, "VmHWM:").or_else(|| parse_status_kib(&status, "VmRSS:"))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn parse_status_kib(status: &str, prefix: &str) -> Option<u64> {
    status.lines().find_map(|line| {
        let rest = line.strip_prefix(prefix)?;
        let kib = rest.split_whitespace().next()?.parse::<u64>().ok()?;
        Some(kib.saturating_mul(1024))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_clamps_negative_readings() {
        assert_eq!(delta(4096, 1024), 0);
        assert_eq!(delta(1024, 4096), 3072);
        assert_eq!(delta(-100, 100), 200);
        assert_eq!(delta(7, 7), 0);
    }

    #[test]
    fn parses_proc_status_lines() {
        let status = "Name:\tbench\nVmPeak:\t  20000 kB\nVmHWM:\t    1536 kB\nVmRSS:\t    1024 kB\n";
        assert_eq!(parse_status_kib(status, "VmHWM:"), Some(1536 * 1024));
        assert_eq!(parse_status_kib(status, "VmRSS:"), Some(1024 * 1024));
        assert_eq!(parse_status_kib(status, "VmSwap:"), None);
    }

    #[test]
    fn readings_are_zero_without_the_allocator() {
        // The unit-test binary does not install TrackingAllocator.
        let before = live_bytes();
        let v = vec![0u8; 4096];
        std::hint::black_box(&v);
        assert_eq!(live_bytes(), before);
        assert!(!tracking_active());
    }
}
