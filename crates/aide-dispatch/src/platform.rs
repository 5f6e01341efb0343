//! Platform seam: applications, browser, audio and display.
//!
//! Handlers only talk to these traits. [`SystemPlatform`] implements them by
//! shelling out to the usual desktop helpers (`gtk-launch`, `xdg-open`,
//! `pactl`, `brightnessctl` on Linux; `open`/`osascript` on macOS;
//! `cmd`/`taskkill`/`powershell` on Windows).

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::error::PlatformError;

/// Launch, close and enumerate local applications.
#[async_trait]
pub trait Apps: Send + Sync {
    /// Names of launchable applications, used for fuzzy matching.
    async fn installed(&self) -> Result<Vec<String>, PlatformError>;

    async fn launch(&self, name: &str) -> Result<(), PlatformError>;

    async fn close(&self, name: &str) -> Result<(), PlatformError>;
}

/// Hand URLs and files to the desktop's default handler.
#[async_trait]
pub trait Opener: Send + Sync {
    async fn open_url(&self, url: &str) -> Result<(), PlatformError>;

    async fn open_path(&self, path: &Path) -> Result<(), PlatformError>;
}

/// Master output volume and microphone mute.
#[async_trait]
pub trait Mixer: Send + Sync {
    /// Current output volume as a scalar in `[0, 1]`.
    async fn volume(&self) -> Result<f32, PlatformError>;

    async fn set_volume(&self, level: f32) -> Result<(), PlatformError>;

    /// Flip the default input's mute state. The resulting state is not reported.
    async fn toggle_mic(&self) -> Result<(), PlatformError>;
}

/// Display brightness in percent.
#[async_trait]
pub trait Backlight: Send + Sync {
    async fn brightness(&self) -> Result<u8, PlatformError>;

    async fn set_brightness(&self, percent: u8) -> Result<(), PlatformError>;
}

/// Effect providers shared by all handlers.
#[derive(Clone)]
pub struct Platform {
    pub apps: Arc<dyn Apps>,
    pub opener: Arc<dyn Opener>,
    pub mixer: Arc<dyn Mixer>,
    pub backlight: Arc<dyn Backlight>,
}

impl Platform {
    /// Providers backed by the host operating system.
    pub fn system() -> Self {
        let system = Arc::new(SystemPlatform);
        Self {
            apps: system.clone(),
            opener: system.clone(),
            mixer: system.clone(),
            backlight: system,
        }
    }
}

/// Shell-command implementation of every platform trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

/// Run a helper to completion and return its stdout.
async fn run(program: &str, args: &[&str]) -> Result<String, PlatformError> {
    debug!(program, ?args, "Running helper");

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| PlatformError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(PlatformError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Start a program without waiting for it to exit.
fn spawn_detached(program: &str, args: &[&str]) -> Result<(), PlatformError> {
    debug!(program, ?args, "Spawning detached");

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| PlatformError::Spawn {
            program: program.to_string(),
            source,
        })
}

/// Longest process name the Linux kernel keeps for matching.
const PROCESS_NAME_LIMIT: usize = 15;

/// Exact, literal `pkill -x` pattern for an application name.
///
/// Matches the process name only, never arguments of other processes.
pub(crate) fn process_name_pattern(name: &str) -> String {
    let name: String = name.trim().chars().take(PROCESS_NAME_LIMIT).collect();
    regex::escape(&name)
}

/// First `NN%` in a helper's output.
pub(crate) fn parse_percent(output: &str) -> Option<u32> {
    static PERCENT: OnceLock<Regex> = OnceLock::new();
    let re = PERCENT.get_or_init(|| Regex::new(r"(\d+)%").expect("percent pattern is valid"));
    re.captures(output)?.get(1)?.as_str().parse().ok()
}

fn parse_plain(program: &str, output: &str) -> Result<u32, PlatformError> {
    output.trim().parse().map_err(|_| PlatformError::Parse {
        program: program.to_string(),
        output: output.trim().to_string(),
    })
}

fn application_roots() -> (Vec<PathBuf>, &'static str) {
    if cfg!(target_os = "macos") {
        let mut roots = vec![
            PathBuf::from("/Applications"),
            PathBuf::from("/System/Applications"),
        ];
        roots.extend(dirs::home_dir().map(|home| home.join("Applications")));
        (roots, "app")
    } else if cfg!(windows) {
        let start_menu = r"Microsoft\Windows\Start Menu\Programs";
        let roots = [
            std::env::var_os("ProgramData").map(|p| PathBuf::from(p).join(start_menu)),
            dirs::data_dir().map(|d| d.join(start_menu)),
        ]
        .into_iter()
        .flatten()
        .collect();
        (roots, "lnk")
    } else {
        let mut roots = vec![
            PathBuf::from("/usr/share/applications"),
            PathBuf::from("/usr/local/share/applications"),
            PathBuf::from("/var/lib/flatpak/exports/share/applications"),
        ];
        roots.extend(dirs::data_dir().map(|data| data.join("applications")));
        (roots, "desktop")
    }
}

/// Collect entry names with `extension` under `roots`, two levels deep.
async fn scan_entries(roots: Vec<PathBuf>, extension: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut pending: Vec<(PathBuf, usize)> = roots.into_iter().map(|r| (r, 0)).collect();

    while let Some((dir, depth)) = pending.pop() {
        let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
            continue;
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));

            if matches {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            } else if depth < 2 && entry.file_type().await.is_ok_and(|t| t.is_dir()) {
                pending.push((path, depth + 1));
            }
        }
    }

    names.sort();
    names.dedup();
    names
}

#[async_trait]
impl Apps for SystemPlatform {
    async fn installed(&self) -> Result<Vec<String>, PlatformError> {
        let (roots, extension) = application_roots();
        Ok(scan_entries(roots, extension).await)
    }

    async fn launch(&self, name: &str) -> Result<(), PlatformError> {
        if cfg!(target_os = "macos") {
            run("open", &["-a", name]).await.map(|_| ())
        } else if cfg!(windows) {
            run("cmd", &["/C", "start", "", name]).await.map(|_| ())
        } else if which::which("gtk-launch").is_ok() {
            run("gtk-launch", &[name]).await.map(|_| ())
        } else {
            spawn_detached(&name.to_lowercase(), &[])
        }
    }

    async fn close(&self, name: &str) -> Result<(), PlatformError> {
        if cfg!(target_os = "macos") {
            let script = format!("quit app \"{}\"", name.replace('"', ""));
            run("osascript", &["-e", script.as_str()]).await.map(|_| ())
        } else if cfg!(windows) {
            let image = format!("{}.exe", name);
            run("taskkill", &["/IM", image.as_str(), "/F"]).await.map(|_| ())
        } else {
            let pattern = process_name_pattern(name);
            run("pkill", &["-i", "-x", pattern.as_str()]).await.map(|_| ())
        }
    }
}

#[async_trait]
impl Opener for SystemPlatform {
    async fn open_url(&self, url: &str) -> Result<(), PlatformError> {
        if cfg!(target_os = "macos") {
            run("open", &[url]).await.map(|_| ())
        } else if cfg!(windows) {
            run("rundll32", &["url.dll,FileProtocolHandler", url]).await.map(|_| ())
        } else {
            spawn_detached("xdg-open", &[url])
        }
    }

    async fn open_path(&self, path: &Path) -> Result<(), PlatformError> {
        let path = path.to_string_lossy().into_owned();
        if cfg!(target_os = "macos") {
            run("open", &[path.as_str()]).await.map(|_| ())
        } else if cfg!(windows) {
            run("cmd", &["/C", "start", "", path.as_str()]).await.map(|_| ())
        } else {
            spawn_detached("xdg-open", &[path.as_str()])
        }
    }
}

#[async_trait]
impl Mixer for SystemPlatform {
    async fn volume(&self) -> Result<f32, PlatformError> {
        let percent = if cfg!(target_os = "macos") {
            let output = run("osascript", &["-e", "output volume of (get volume settings)"]).await?;
            parse_plain("osascript", &output)?
        } else if cfg!(windows) {
            return Err(PlatformError::Unsupported("volume control"));
        } else {
            let output = run("pactl", &["get-sink-volume", "@DEFAULT_SINK@"]).await?;
            parse_percent(&output).ok_or(PlatformError::Parse {
                program: "pactl".to_string(),
                output: output.trim().to_string(),
            })?
        };
        Ok((percent as f32 / 100.0).clamp(0.0, 1.0))
    }

    async fn set_volume(&self, level: f32) -> Result<(), PlatformError> {
        let percent = (level.clamp(0.0, 1.0) * 100.0).round() as u32;
        if cfg!(target_os = "macos") {
            let script = format!("set volume output volume {}", percent);
            run("osascript", &["-e", script.as_str()]).await.map(|_| ())
        } else if cfg!(windows) {
            Err(PlatformError::Unsupported("volume control"))
        } else {
            let level = format!("{}%", percent);
            run("pactl", &["set-sink-volume", "@DEFAULT_SINK@", level.as_str()])
                .await
                .map(|_| ())
        }
    }

    async fn toggle_mic(&self) -> Result<(), PlatformError> {
        if cfg!(target_os = "macos") {
            run(
                "osascript",
                &[
                    "-e",
                    "if input volume of (get volume settings) is 0 then",
                    "-e",
                    "set volume input volume 75",
                    "-e",
                    "else",
                    "-e",
                    "set volume input volume 0",
                    "-e",
                    "end if",
                ],
            )
            .await
            .map(|_| ())
        } else if cfg!(windows) {
            Err(PlatformError::Unsupported("microphone mute"))
        } else {
            run("pactl", &["set-source-mute", "@DEFAULT_SOURCE@", "toggle"])
                .await
                .map(|_| ())
        }
    }
}

const WMI_GET_BRIGHTNESS: &str =
    "(Get-CimInstance -Namespace root/WMI -ClassName WmiMonitorBrightness).CurrentBrightness";

#[async_trait]
impl Backlight for SystemPlatform {
    async fn brightness(&self) -> Result<u8, PlatformError> {
        let percent = if cfg!(target_os = "macos") {
            return Err(PlatformError::Unsupported("brightness control"));
        } else if cfg!(windows) {
            let output = run("powershell", &["-NoProfile", "-Command", WMI_GET_BRIGHTNESS]).await?;
            parse_plain("powershell", &output)?
        } else {
            if which::which("brightnessctl").is_err() {
                return Err(PlatformError::Unsupported("brightness control without brightnessctl"));
            }
            // Machine-readable form: device,class,current,percent%,max
            let output = run("brightnessctl", &["-m"]).await?;
            parse_percent(&output).ok_or(PlatformError::Parse {
                program: "brightnessctl".to_string(),
                output: output.trim().to_string(),
            })?
        };
        Ok(percent.min(100) as u8)
    }

    async fn set_brightness(&self, percent: u8) -> Result<(), PlatformError> {
        let percent = percent.min(100);
        if cfg!(target_os = "macos") {
            Err(PlatformError::Unsupported("brightness control"))
        } else if cfg!(windows) {
            let script = format!(
                "(Get-WmiObject -Namespace root/WMI -Class WmiMonitorBrightnessMethods).WmiSetBrightness(1,{})",
                percent
            );
            run("powershell", &["-NoProfile", "-Command", script.as_str()]).await.map(|_| ())
        } else {
            let level = format!("{}%", percent);
            run("brightnessctl", &["set", level.as_str()]).await.map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pactl_volume() {
        let output = "Volume: front-left: 32768 /  50% / -18.06 dB,   front-right: 32768 /  50% / -18.06 dB\n        balance 0.00\n";
        assert_eq!(parse_percent(output), Some(50));
    }

    #[test]
    fn test_parse_brightnessctl_machine_output() {
        assert_eq!(parse_percent("intel_backlight,backlight,96000,40%,240000\n"), Some(40));
        assert_eq!(parse_percent("no percentages here"), None);
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_plain("osascript", " 63\n").unwrap(), 63);
        assert!(matches!(
            parse_plain("osascript", "missing value"),
            Err(PlatformError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_scan_entries_finds_desktop_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("kde");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("org.gnome.Calculator.desktop"), "").unwrap();
        std::fs::write(nested.join("firefox.desktop"), "").unwrap();
        std::fs::write(dir.path().join("README"), "").unwrap();

        let names = scan_entries(vec![dir.path().to_path_buf()], "desktop").await;
        assert_eq!(names, vec!["firefox".to_string(), "org.gnome.Calculator".to_string()]);
    }

    #[test]
    fn test_process_name_pattern_is_literal() {
        assert_eq!(process_name_pattern(" notepad "), "notepad");
        assert_eq!(process_name_pattern("."), "\\.");
        assert_eq!(process_name_pattern("c++ (ide)"), "c\\+\\+ \\(ide\\)");
        assert_eq!(process_name_pattern("libreoffice-writer"), "libreoffice-wri");
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_close_spares_processes_mentioning_the_name() {
        if which::which("pkill").is_err() {
            return;
        }
        let mut bystander = Command::new("sh")
            .args(["-c", "sleep 30", "editor-for-my-notepad-notes"])
            .spawn()
            .unwrap();

        let _ = SystemPlatform.close("notepad").await;

        assert!(bystander.try_wait().unwrap().is_none());
        bystander.kill().await.unwrap();
    }
}
