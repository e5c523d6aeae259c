//! Live Process Memory Source
//!
//! Read-only memory source for a running game process.

use anyhow::{bail, Context, Result};
use itemscan::{MemoryRegion, MemorySource, ReadError};
use process_memory::{CopyAddress, ProcessHandle, TryIntoProcessHandle};
use std::path::PathBuf;
use sysinfo::System;
use tracing::debug;

/// An attached process
pub struct LiveProcess {
    pub pid: u32,
    pub handle: ProcessHandle,
    pub exe_path: PathBuf,
    pub maps: Vec<MemoryRegion>,
}

// SAFETY: on Linux the handle is a plain pid_t plus an architecture tag. Reads
// go through process_vm_readv, which any thread may call for the same pid.
unsafe impl Send for LiveProcess {}
unsafe impl Sync for LiveProcess {}

impl MemorySource for LiveProcess {
    fn read_bytes(&self, address: usize, size: usize) -> Result<Vec<u8>, ReadError> {
        let mut buffer = vec![0u8; size];
        self.handle
            .copy_address(address, &mut buffer)
            .map_err(|e| ReadError::failed(address, size, e.to_string()))?;
        Ok(buffer)
    }

    fn regions(&self) -> &[MemoryRegion] {
        &self.maps
    }
}

impl LiveProcess {
    /// Attach to a process by pid, or find it by name
    pub fn attach(pid: Option<u32>, name: Option<&str>) -> Result<Self> {
        let pid = match (pid, name) {
            (Some(pid), _) => pid,
            (None, Some(name)) => find_process(name)?,
            (None, None) => bail!(
                "No target process. Pass --pid or --process, or run: itemscan configure --process NAME"
            ),
        };

        let handle = (pid as process_memory::Pid)
            .try_into_process_handle()
            .context("Failed to attach to process. Try running with sudo.")?;

        let maps = parse_maps(pid)?;

        let exe_path = std::fs::read_link(format!("/proc/{}/exe", pid))
            .unwrap_or_else(|_| PathBuf::from("unknown"));

        Ok(LiveProcess {
            pid,
            handle,
            exe_path,
            maps,
        })
    }

    /// Base address of the main module
    pub fn module_base(&self, name: Option<&str>) -> Option<usize> {
        module_base(&self.maps, name)
    }
}

/// Lowest mapping of the module named `name`, or of the first `.exe` image
///
/// Under Proton the process is wine's loader, so the game image is found by
/// its mapped file name rather than /proc/pid/exe.
pub fn module_base(maps: &[MemoryRegion], name: Option<&str>) -> Option<usize> {
    let module = match name {
        Some(name) => name.to_string(),
        None => maps
            .iter()
            .filter(|r| r.is_executable() && r.path_ends_with(".exe"))
            .find_map(|r| r.path.clone())?,
    };

    maps.iter()
        .filter(|r| r.path.as_deref() == Some(module.as_str()) || r.path_ends_with(&module))
        .map(|r| r.start)
        .min()
}

/// Find a running process by name
///
/// Matches the process name or its command line, case-insensitively, and
/// prefers the candidate using the most memory (the game rather than a
/// launcher or crash handler).
pub fn find_process(name: &str) -> Result<u32> {
    let needle = name.to_lowercase();
    let mut system = System::new_all();
    system.refresh_all();

    let mut candidates: Vec<(u32, u64)> = Vec::new();

    for process in system.processes().values() {
        let pid = process.pid().as_u32();
        let memory = process.memory();

        let by_name = process.name().to_string_lossy().to_lowercase().contains(&needle);
        let by_cmdline = std::fs::read_to_string(format!("/proc/{}/cmdline", pid))
            .map(|cmdline| cmdline.to_lowercase().contains(&needle))
            .unwrap_or(false);

        if by_name || by_cmdline {
            let tgid = get_tgid(pid).unwrap_or(pid);
            candidates.push((tgid, memory));
        }
    }

    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.dedup_by(|a, b| a.0 == b.0);

    if let Some((pid, memory)) = candidates.first() {
        debug!(
            "{} candidate process(es) for {}, picked PID {} ({} MB)",
            candidates.len(),
            name,
            pid,
            memory / 1_000_000
        );
        return Ok(*pid);
    }

    bail!("Process '{}' not found. Is the game running?", name)
}

/// Get the thread group ID (main process) for a given PID/TID
pub fn get_tgid(pid: u32) -> Option<u32> {
    let status = std::fs::read_to_string(format!("/proc/{}/status", pid)).ok()?;
    parse_tgid(&status)
}

fn parse_tgid(status: &str) -> Option<u32> {
    status
        .lines()
        .find(|line| line.starts_with("Tgid:"))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

/// Parse /proc/pid/maps to get memory regions
pub fn parse_maps(pid: u32) -> Result<Vec<MemoryRegion>> {
    let maps_path = format!("/proc/{}/maps", pid);
    let contents = std::fs::read_to_string(&maps_path)
        .with_context(|| format!("Failed to open {}. Do you have permission?", maps_path))?;

    Ok(contents.lines().filter_map(MemoryRegion::from_maps_line).collect())
}
