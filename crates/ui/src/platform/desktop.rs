use std::process::{Child, Command};

use services::ResourceOpenError;

use super::LinkOpener;

/// Opens links in the system browser.
pub struct DesktopLinkOpener;

impl LinkOpener for DesktopLinkOpener {
    fn open_url(&self, url: &str) -> Result<(), ResourceOpenError> {
        let url = url.trim();
        let child = browser_command(Launcher::current(), url)
            .spawn()
            .map_err(|e| ResourceOpenError::Launch {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        reap(child);
        Ok(())
    }
}

/// How each platform hands a URL to the default browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Launcher {
    Open,
    /// Never `cmd /C start`: cmd would treat `&` in a query as a separator.
    UrlDll,
    XdgOpen,
}

impl Launcher {
    const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Launcher::Open
        } else if cfg!(target_os = "windows") {
            Launcher::UrlDll
        } else {
            Launcher::XdgOpen
        }
    }
}

fn browser_command(launcher: Launcher, url: &str) -> Command {
    let mut command = match launcher {
        Launcher::Open => Command::new("open"),
        Launcher::UrlDll => {
            let mut command = Command::new("rundll32");
            command.arg("url.dll,FileProtocolHandler");
            command
        }
        Launcher::XdgOpen => Command::new("xdg-open"),
    };
    command.arg(url);
    command
}

/// Launchers exit as soon as the browser has the URL; wait for them off the
/// UI thread so they don't linger as zombies.
fn reap(mut child: Child) {
    let spawned = std::thread::Builder::new()
        .name("link-opener-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) if !status.success() => {
                tracing::debug!(%status, "link launcher exited with failure");
            }
            Ok(_) => {}
            Err(err) => tracing::debug!(error = %err, "failed to wait for link launcher"),
        });
    if let Err(err) = spawned {
        tracing::warn!(error = %err, "failed to start link launcher reaper");
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    fn argv(command: &Command) -> Vec<&OsStr> {
        std::iter::once(command.get_program())
            .chain(command.get_args())
            .collect()
    }

    #[test]
    fn windows_url_is_a_single_argument_to_rundll32() {
        let url = "https://x.in/?a=1&calc";
        let command = browser_command(Launcher::UrlDll, url);
        assert_eq!(
            argv(&command),
            [
                OsStr::new("rundll32"),
                OsStr::new("url.dll,FileProtocolHandler"),
                OsStr::new(url),
            ]
        );
    }

    #[test]
    fn unix_launchers_take_the_url_verbatim() {
        let url = "https://www.icai.org/?course=ca&level=1";
        assert_eq!(
            argv(&browser_command(Launcher::XdgOpen, url)),
            [OsStr::new("xdg-open"), OsStr::new(url)]
        );
        assert_eq!(
            argv(&browser_command(Launcher::Open, url)),
            [OsStr::new("open"), OsStr::new(url)]
        );
    }

    #[cfg(unix)]
    #[test]
    fn finished_launchers_are_reaped() {
        let child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        reap(child);

        let proc_entry = std::path::PathBuf::from(format!("/proc/{pid}"));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while proc_entry.exists() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        if cfg!(target_os = "linux") {
            assert!(!proc_entry.exists());
        }
    }
}
