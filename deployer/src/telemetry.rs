//! Host information for environment reporting

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Facts about the host the deployer runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// OS name, e.g. "Ubuntu" or "Darwin"
    pub os_name: String,

    /// OS release
    pub os_version: String,

    /// Kernel version
    pub kernel_version: String,

    /// Target triple the binary was built for
    pub target: String,
}

impl HostInfo {
    /// "<os name> <os version>", the way JVM-era deployers reported it
    pub fn os_string(&self) -> String {
        format!("{} {}", self.os_name, self.os_version)
            .trim()
            .to_string()
    }

    /// "<target triple> <kernel version>"
    pub fn platform_string(&self) -> String {
        format!("{} {}", self.target, self.kernel_version)
            .trim()
            .to_string()
    }
}

/// Collect host information
pub fn collect_host_info() -> HostInfo {
    HostInfo {
        os_name: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
        os_version: System::os_version().unwrap_or_default(),
        kernel_version: System::kernel_version().unwrap_or_default(),
        target: env!("BUILD_TARGET").to_string(),
    }
}
