// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

//! Available-memory probe used to size the reader's chunk buffer.
//!
//! Every call re-queries the operating system, so long runs see memory
//! pressure as it changes. Platforms without a supported query, and any
//! failure along the way, yield `None`; callers fall back to a fixed
//! chunk size.

/// Returns the operating system's currently available physical memory in
/// bytes, or `None` when it cannot be determined.
pub fn available_memory_bytes() -> Option<u64> {
    read_available_memory()
}

#[cfg(target_os = "linux")]
fn read_available_memory() -> Option<u64> {
    linux::available_memory_bytes()
}

#[cfg(windows)]
fn read_available_memory() -> Option<u64> {
    windows::available_memory_bytes()
}

#[cfg(not(any(target_os = "linux", windows)))]
fn read_available_memory() -> Option<u64> {
    tracing::debug!("no available-memory probe for this platform");
    None
}

#[cfg(target_os = "linux")]
mod linux {
    use tracing::debug;

    /// The `MemAvailable:` figure is the kernel's estimate of memory
    /// usable without swapping, in kibibytes.
    const MEMINFO_PATH: &str = "/proc/meminfo";

    pub(super) fn available_memory_bytes() -> Option<u64> {
        let available = std::fs::read_to_string(MEMINFO_PATH)
            .ok()
            .and_then(|contents| parse_mem_available(&contents));
        if available.is_none() {
            debug!("Could not read available memory from {MEMINFO_PATH}");
        }
        available
    }

    /// Scans meminfo-formatted text for the `MemAvailable:` figure and
    /// converts it to bytes.
    pub(super) fn parse_mem_available(contents: &str) -> Option<u64> {
        for line in contents.lines() {
            if let Some(rest) = line.strip_prefix("MemAvailable:") {
                return rest
                    .split_whitespace()
                    .next()
                    .and_then(|raw| raw.parse::<u64>().ok())
                    .map(|kibibytes| kibibytes * 1024);
            }
        }
        None
    }
}

#[cfg(windows)]
mod windows {
    use tracing::debug;
    use windows_sys::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

    pub(super) fn available_memory_bytes() -> Option<u64> {
        let mut status: MEMORYSTATUSEX = unsafe { std::mem::zeroed() };
        status.dwLength = std::mem::size_of::<MEMORYSTATUSEX>() as u32;
        // SAFETY: `status` is a live MEMORYSTATUSEX with `dwLength` set,
        // as GlobalMemoryStatusEx requires.
        let ok = unsafe { GlobalMemoryStatusEx(&mut status) };
        if ok == 0 {
            debug!("GlobalMemoryStatusEx failed");
            return None;
        }
        Some(status.ullAvailPhys)
    }
}
