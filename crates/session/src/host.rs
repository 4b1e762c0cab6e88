//! Host resource facts reported in status responses.

use std::sync::{Mutex, PoisonError};
use std::thread;

use sysinfo::System;

/// Total and free physical memory, in bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryInfo {
    pub total: u64,
    pub free: u64,
}

/// Black-box view of the host's compute resources.
pub trait HostFacts: Send + Sync {
    fn core_count(&self) -> u64;
    fn memory(&self) -> MemoryInfo;
}

/// Live host facts backed by `sysinfo`.
pub struct SystemFacts {
    system: Mutex<System>,
}

impl SystemFacts {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemFacts {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFacts for SystemFacts {
    fn core_count(&self) -> u64 {
        thread::available_parallelism()
            .map(|cores| cores.get() as u64)
            .unwrap_or(1)
    }

    fn memory(&self) -> MemoryInfo {
        let mut system = self
            .system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        system.refresh_memory();

        MemoryInfo {
            total: system.total_memory(),
            free: system.free_memory(),
        }
    }
}

/// Fixed host facts, for tests and headless benchmarking.
#[derive(Copy, Clone, Debug, Default)]
pub struct StaticFacts {
    pub cores: u64,
    pub memory: MemoryInfo,
}

impl HostFacts for StaticFacts {
    fn core_count(&self) -> u64 {
        self.cores
    }

    fn memory(&self) -> MemoryInfo {
        self.memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_facts_report_at_least_one_core() {
        let facts = SystemFacts::new();
        assert!(facts.core_count() >= 1);
    }

    #[test]
    fn system_memory_is_consistent() {
        let facts = SystemFacts::new();
        let memory = facts.memory();
        assert!(memory.free <= memory.total);
    }
}
