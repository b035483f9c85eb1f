//! Terminal input injection.
//!
//! Writes the resolved command into the controlling terminal's input queue
//! so it appears as if the user typed it, ready to review, edit and run.
//! The command is never executed here.
//!
//! The mechanism is the `TIOCSTI` ioctl against `/dev/tty` (not stdin or
//! stdout, which may be redirected). Echo and canonical mode are disabled
//! while the bytes go in, and the original settings are restored afterwards
//! no matter what. On Linux 6.2+ the ioctl is disabled by default and needs
//! `sysctl -w dev.tty.legacy_tiocsti=1`.

use log::warn;

/// Pushes `text` into the controlling terminal's input buffer.
///
/// Returns whether the injection fully succeeded. Every failure is logged
/// and swallowed: by this point the command has already been resolved, so
/// the caller can still print it for manual use.
pub fn inject_into_terminal(text: &str) -> bool {
    if text.is_empty() {
        warn!("attempted to inject an empty command");
        return false;
    }

    platform::inject(text)
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
mod platform {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::fd::AsRawFd;

    use log::{debug, error, warn};

    // Terminal I/O Control Simulate Terminal Input; the request code differs
    // per OS family.
    #[cfg(target_os = "linux")]
    const TIOCSTI: libc::c_ulong = 0x5412;
    #[cfg(target_os = "macos")]
    const TIOCSTI: libc::c_ulong = 0x8001_7472;

    pub fn inject(text: &str) -> bool {
        debug!("opening /dev/tty for command injection");
        let tty = match OpenOptions::new().read(true).write(true).open("/dev/tty") {
            Ok(tty) => tty,
            Err(e) => {
                error!("failed to open /dev/tty: {e}");
                return false;
            }
        };
        let fd = tty.as_raw_fd();

        // Save the current line-discipline settings
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &mut original) } != 0 {
            error!(
                "failed to read terminal attributes: {}",
                io::Error::last_os_error()
            );
            return false;
        }

        // Inject with echo and canonical mode off so the bytes land in the
        // input queue without being printed or line-buffered
        let mut modified = original;
        modified.c_lflag &= !(libc::ECHO | libc::ICANON);
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &modified) } != 0 {
            error!(
                "failed to set terminal attributes: {}",
                io::Error::last_os_error()
            );
            return false;
        }

        let mut injected = true;
        for byte in text.as_bytes() {
            let rc = unsafe { libc::ioctl(fd, TIOCSTI as _, byte as *const u8) };
            if rc != 0 {
                error!(
                    "TIOCSTI injection failed: {} (on Linux 6.2+ this needs \
                     `sysctl -w dev.tty.legacy_tiocsti=1`)",
                    io::Error::last_os_error()
                );
                injected = false;
                break;
            }
        }

        // Restore the saved settings even if injection failed part way
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &original) } != 0 {
            warn!(
                "failed to restore terminal attributes: {}",
                io::Error::last_os_error()
            );
        }

        if injected {
            debug!("command injected to terminal ({} byte(s))", text.len());
        }
        injected
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
mod platform {
    use log::error;

    pub fn inject(_text: &str) -> bool {
        error!("terminal injection is not supported on this platform");
        false
    }
}
