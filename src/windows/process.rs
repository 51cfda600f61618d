//! RaceRoom process detection

use crate::source::ProcessProbe;
use tracing::trace;
use windows::Win32::Foundation::CloseHandle;
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPPROCESS,
};

/// Executable names of the RaceRoom client
pub const PRODUCER_PROCESS_NAMES: [&str; 2] = crate::config::DEFAULT_PROCESS_NAMES;

/// Looks for a running process by executable name (case-insensitive).
#[derive(Debug, Clone)]
pub struct ProcessList {
    names: Vec<String>,
}

impl Default for ProcessList {
    fn default() -> Self {
        Self::new(PRODUCER_PROCESS_NAMES.iter().map(|s| s.to_string()).collect())
    }
}

impl ProcessList {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    fn matches(&self, exe: &str) -> bool {
        self.names.iter().any(|name| name.eq_ignore_ascii_case(exe))
    }

    /// Walk the process table once.
    pub fn any_running(&self) -> bool {
        let snapshot = match unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) } {
            Ok(handle) => handle,
            Err(err) => {
                trace!(error = %err, "Process snapshot failed");
                return false;
            }
        };

        let mut entry = PROCESSENTRY32W {
            dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
            ..Default::default()
        };

        let mut found = false;
        let mut more = unsafe { Process32FirstW(snapshot, &mut entry) }.is_ok();
        while more {
            let len = entry.szExeFile.iter().position(|&c| c == 0).unwrap_or(entry.szExeFile.len());
            let exe = String::from_utf16_lossy(&entry.szExeFile[..len]);
            if self.matches(&exe) {
                trace!(exe, pid = entry.th32ProcessID, "Found producer process");
                found = true;
                break;
            }
            more = unsafe { Process32NextW(snapshot, &mut entry) }.is_ok();
        }

        unsafe {
            let _ = CloseHandle(snapshot);
        }
        found
    }
}

impl ProcessProbe for ProcessList {
    fn is_producer_running(&self) -> bool {
        self.any_running()
    }
}
