// src/core/awake.rs
use std::process::{Child, Command, Stdio};

/// Keeps the machine from idling to sleep while a scrape run is in progress.
///
/// Holds a platform inhibitor process for as long as the guard lives; dropping
/// the guard (normal return, `?`, or panic unwind) kills it.
pub struct KeepAwake {
    child: Option<Child>,
}

impl KeepAwake {
    pub fn acquire(reason: &str) -> Self {
        let Some(mut cmd) = inhibitor(reason) else {
            logd!("keep-awake: no inhibitor on this platform");
            return Self::disabled();
        };
        match cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null()).spawn() {
            Ok(child) => {
                logd!("keep-awake: holding inhibitor (pid {})", child.id());
                Self { child: Some(child) }
            }
            Err(e) => {
                logw!("keep-awake: inhibitor unavailable: {e}");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { child: None }
    }

    pub fn is_held(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for KeepAwake {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
            logd!("keep-awake: released");
        }
    }
}

#[cfg(target_os = "macos")]
fn inhibitor(_reason: &str) -> Option<Command> {
    let mut cmd = Command::new("caffeinate");
    cmd.arg("-i").arg("-w").arg(std::process::id().to_string());
    Some(cmd)
}

#[cfg(target_os = "linux")]
fn inhibitor(reason: &str) -> Option<Command> {
    let mut cmd = Command::new("systemd-inhibit");
    cmd.args(["--what=idle:sleep", "--who=review_scrape", "--mode=block"])
        .arg(format!("--why={reason}"))
        .args(["sleep", "infinity"]);
    Some(cmd)
}

#[cfg(target_os = "windows")]
fn inhibitor(_reason: &str) -> Option<Command> {
    // ES_CONTINUOUS | ES_SYSTEM_REQUIRED, re-asserted until killed.
    const SCRIPT: &str = "$sig = '[DllImport(\"kernel32.dll\")] public static extern uint SetThreadExecutionState(uint f);'; \
        $k = Add-Type -MemberDefinition $sig -Name Awake -Namespace Win32 -PassThru; \
        while ($true) { [void]$k::SetThreadExecutionState(0x80000001); Start-Sleep -Seconds 30 }";
    let mut cmd = Command::new("powershell");
    cmd.args(["-NoProfile", "-NonInteractive", "-Command", SCRIPT]);
    Some(cmd)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn inhibitor(_reason: &str) -> Option<Command> {
    None
}
