//! Headless Chrome/Chromium print engine.
//!
//! Each render call starts its own browser process with a throwaway profile
//! directory, prints one HTML file with `--print-to-pdf`, and waits for the
//! process to exit. The process, the HTML file and the profile are all released
//! when the call returns, whichever way it returns.
//!
//! The PDF is printed into a staging directory next to the output and renamed
//! over it only when the engine succeeded, so a failed run leaves any earlier
//! output untouched.

use super::{PageLayout, Render, RenderError};
use crate::document::FullDocument;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

/// Executable names searched for on `PATH`, in order of preference.
const EXECUTABLE_NAMES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
    "chrome",
    "chrome.exe",
    "msedge.exe",
];

/// Install locations that are usually not on `PATH`.
const WELL_KNOWN_LOCATIONS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Lines of engine stderr kept for error reports.
const STDERR_TAIL_LINES: usize = 12;

#[derive(Debug, Clone)]
pub struct Chrome {
    executable: PathBuf,
    timeout: Option<Duration>,
    sandbox: bool,
}

impl Chrome {
    /// Locate a browser, preferring `explicit` when given.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Chrome, RenderError> {
        let executable = match explicit {
            Some(path) if path.is_file() => path,
            Some(path) => {
                return Err(RenderError::EngineNotFound(format!(
                    "{} is not a file",
                    path.display()
                )))
            }
            None => {
                let path_var = std::env::var_os("PATH").unwrap_or_default();
                find_in_path(EXECUTABLE_NAMES, &path_var)
                    .or_else(|| {
                        WELL_KNOWN_LOCATIONS
                            .iter()
                            .map(PathBuf::from)
                            .find(|p| p.is_file())
                    })
                    .ok_or_else(|| {
                        RenderError::EngineNotFound(
                            "no Chrome or Chromium executable on PATH; use --chrome to point at one"
                                .to_string(),
                        )
                    })?
            }
        };

        log::debug!("using print engine at {}", executable.display());
        Ok(Chrome::new(executable))
    }

    pub fn new<P: AsRef<Path>>(executable: P) -> Chrome {
        Chrome {
            executable: executable.as_ref().to_path_buf(),
            timeout: None,
            sandbox: true,
        }
    }

    /// Kill the browser and fail the render after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Chrome {
        self.timeout = timeout;
        self
    }

    /// Chrome refuses to start sandboxed as root, which is common in containers.
    pub fn with_sandbox(mut self, sandbox: bool) -> Chrome {
        self.sandbox = sandbox;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn args(
        &self,
        page: &Path,
        profile: &Path,
        outfile: &Path,
        layout: &PageLayout,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "--headless",
            "--disable-gpu",
            "--no-first-run",
            "--no-default-browser-check",
            "--hide-scrollbars",
            "--allow-file-access-from-files",
            "--run-all-compositor-stages-before-draw",
            "--virtual-time-budget=10000",
        ]
        .iter()
        .map(OsString::from)
        .collect();

        if !self.sandbox {
            args.push("--no-sandbox".into());
        }
        if !layout.engine_header_footer {
            args.push("--no-pdf-header-footer".into());
        }
        args.push(prefixed("--user-data-dir=", profile));
        args.push(prefixed("--print-to-pdf=", outfile));
        args.push(page.as_os_str().to_os_string());
        args
    }

    fn wait(&self, child: &mut RunningEngine) -> Result<ExitStatus, RenderError> {
        let Some(timeout) = self.timeout else {
            return Ok(child.0.wait()?);
        };

        let started = Instant::now();
        loop {
            if let Some(status) = child.0.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= timeout {
                child.stop();
                return Err(RenderError::Timeout(timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Render for Chrome {
    fn render(
        &self,
        document: &FullDocument,
        outfile: &Path,
        layout: &PageLayout,
    ) -> Result<(), RenderError> {
        let html = document.to_html_with_styles(&layout.page_rules());
        let mut page = tempfile::Builder::new()
            .prefix("paper-press-")
            .suffix(".html")
            .tempfile()?;
        page.write_all(html.as_bytes())?;
        page.flush()?;

        let profile = tempfile::Builder::new()
            .prefix("paper-press-profile-")
            .tempdir()?;
        let mut stderr_log = tempfile::tempfile()?;

        // same directory as the output, so the final rename stays on one filesystem
        let parent = match outfile.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".paper-press-")
            .tempdir_in(parent)?;
        let staged = staging
            .path()
            .join(outfile.file_name().unwrap_or(OsStr::new("output.pdf")));

        let args = self.args(page.path(), profile.path(), &staged, layout);
        log::debug!("{} {:?}", self.executable.display(), args);

        let started = Instant::now();
        let child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_log.try_clone()?))
            .spawn()
            .map_err(|source| RenderError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;
        let mut child = RunningEngine(child);

        let status = self.wait(&mut child)?;
        log::debug!(
            "print engine exited with {status} after {:.2?}",
            started.elapsed()
        );

        if !status.success() {
            let stderr = stderr_tail(&mut stderr_log);
            log::warn!("print engine stderr:\n{stderr}");
            return Err(RenderError::Engine { status, stderr });
        }
        if !staged.is_file() {
            return Err(RenderError::NoOutput(outfile.to_path_buf()));
        }

        std::fs::rename(&staged, outfile)?;
        Ok(())
    }
}

/// Owns the browser process; kills it if it is still running when dropped.
struct RunningEngine(Child);

impl RunningEngine {
    fn stop(&mut self) {
        if let Err(e) = self.0.kill() {
            log::debug!("failed to kill print engine: {e}");
        }
        let _ = self.0.wait();
    }
}

impl Drop for RunningEngine {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            self.stop();
        }
    }
}

fn prefixed(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path.as_os_str());
    arg
}

/// Find the first of `names` in the directories of a `PATH`-style list.
fn find_in_path(names: &[&str], path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

fn stderr_tail(log: &mut File) -> String {
    let mut contents = String::new();
    if log.seek(SeekFrom::Start(0)).is_err() || log.read_to_string(&mut contents).is_err() {
        return String::new();
    }

    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfigBuilder;
    use crate::document;

    fn sample_document() -> FullDocument {
        let config = DocumentConfigBuilder::default()
            .name("sample")
            .input("sample.md")
            .output("sample.pdf")
            .title("Sample")
            .subtitle("Subtitle")
            .footer_text("Footer")
            .build()
            .expect("can build config");
        document::assemble(&config, "<p>hello</p>".to_string())
    }

    #[test]
    fn discover_rejects_missing_explicit_path() {
        let err = Chrome::discover(Some(PathBuf::from("/no/such/chrome")))
            .expect_err("missing executable is rejected");
        assert!(matches!(err, RenderError::EngineNotFound(_)));
    }

    #[test]
    fn can_find_executable_in_path() {
        let first = tempfile::tempdir().expect("can create temp dir");
        let second = tempfile::tempdir().expect("can create temp dir");
        std::fs::write(second.path().join("chromium"), b"").expect("can write fake binary");

        let path_var =
            std::env::join_paths([first.path(), second.path()]).expect("can join paths");
        assert_eq!(
            find_in_path(EXECUTABLE_NAMES, &path_var),
            Some(second.path().join("chromium"))
        );
        assert_eq!(find_in_path(&["nope"], &path_var), None);
    }

    #[test]
    fn args_disable_engine_header_footer() {
        let chrome = Chrome::new("/usr/bin/chromium");
        let args = chrome.args(
            Path::new("/tmp/page.html"),
            Path::new("/tmp/profile"),
            Path::new("/out/doc.pdf"),
            &PageLayout::LETTER,
        );
        assert!(args.contains(&OsString::from("--headless")));
        assert!(args.contains(&OsString::from("--no-pdf-header-footer")));
        assert!(args.contains(&OsString::from("--print-to-pdf=/out/doc.pdf")));
        assert!(args.contains(&OsString::from("--user-data-dir=/tmp/profile")));
        assert!(!args.contains(&OsString::from("--no-sandbox")));
        assert_eq!(args.last(), Some(&OsString::from("/tmp/page.html")));

        let args = chrome.with_sandbox(false).args(
            Path::new("/tmp/page.html"),
            Path::new("/tmp/profile"),
            Path::new("/out/doc.pdf"),
            &PageLayout {
                engine_header_footer: true,
                ..PageLayout::LETTER
            },
        );
        assert!(args.contains(&OsString::from("--no-sandbox")));
        assert!(!args.contains(&OsString::from("--no-pdf-header-footer")));
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let mut file = tempfile::tempfile().expect("can create temp file");
        for i in 0..20 {
            writeln!(file, "line {i}").expect("can write");
        }
        let tail = stderr_tail(&mut file);
        assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
        assert!(tail.ends_with("line 19"));
        assert!(!tail.contains("line 7\n"));
    }

    /// Runs the adapter against small shell scripts standing in for Chrome.
    /// Kept in one test so no script is being written while another is exec'd.
    #[cfg(unix)]
    #[test]
    fn drives_engine_process() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("can create temp dir");
        let script = |name: &str, body: &str| -> PathBuf {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("can write script");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("can make script executable");
            path
        };

        let printing = script(
            "printing",
            r#"for arg in "$@"; do
  case "$arg" in
    --print-to-pdf=*) printf '%%PDF-1.7\n' > "${arg#--print-to-pdf=}" ;;
  esac
done"#,
        );
        let failing = script("failing", "echo 'cannot open display' >&2\nexit 3");
        let silent = script("silent", "exit 0");
        let hanging = script("hanging", "exec sleep 30");

        let doc = sample_document();
        let outfile = dir.path().join("doc.pdf");
        std::fs::write(&outfile, b"stale").expect("can write earlier output");

        Chrome::new(&printing)
            .render(&doc, &outfile, &PageLayout::LETTER)
            .expect("fake engine prints");
        let bytes = std::fs::read(&outfile).expect("output written");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(!bytes.starts_with(b"stale"));

        let err = Chrome::new(&failing)
            .render(&doc, &outfile, &PageLayout::LETTER)
            .expect_err("non-zero exit fails");
        match err {
            RenderError::Engine { status, stderr } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "cannot open display");
            }
            other => panic!("unexpected error: {other}"),
        }

        // the earlier PDF must not count as output of this run
        let err = Chrome::new(&silent)
            .render(&doc, &outfile, &PageLayout::LETTER)
            .expect_err("missing output fails");
        assert!(matches!(err, RenderError::NoOutput(_)));

        // and neither failure touched it
        assert_eq!(std::fs::read(&outfile).expect("earlier output kept"), bytes);

        let started = Instant::now();
        let err = Chrome::new(&hanging)
            .with_timeout(Some(Duration::from_millis(200)))
            .render(&doc, &outfile, &PageLayout::LETTER)
            .expect_err("hung engine times out");
        assert!(matches!(err, RenderError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(10));

        let err = Chrome::new(dir.path().join("missing"))
            .render(&doc, &outfile, &PageLayout::LETTER)
            .expect_err("missing executable fails");
        assert!(matches!(err, RenderError::Spawn { .. }));

        assert_eq!(std::fs::read(&outfile).expect("earlier output kept"), bytes);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .expect("can list output dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(".paper-press-"))
            .collect();
        assert!(leftovers.is_empty(), "staging dirs left behind: {leftovers:?}");
    }
}
