//! Runs the external astrotimes executable and reads its moon transit.
//!
//! The executable is a black box: it is started with
//! `--lat <lat> --lon <lon> --tz <tz> --no-prompt` and the first whitespace
//! delimited token of the first output line mentioning `Moon transit` is
//! taken as the transit time.

use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::config::AstrotimesConfig;
use crate::error::AstrotimesError;
use crate::models::Location;

/// Marker text of the transit line in astrotimes output
pub const TRANSIT_MARKER: &str = "Moon transit";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Full contents of one child pipe, delivered once it reaches EOF
type Captured = Receiver<std::io::Result<String>>;

/// Anything that can report a moon transit time for a location
pub trait TransitSource {
    fn moon_transit(&self, location: &Location) -> Result<String, AstrotimesError>;
}

/// Subprocess wrapper around the astrotimes binary
#[derive(Debug, Clone)]
pub struct AstrotimesRunner {
    program: PathBuf,
    base_args: Vec<OsString>,
    timeout: Duration,
}

impl AstrotimesRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(config: &AstrotimesConfig) -> Self {
        Self::new(&config.program)
            .with_base_args(&config.args)
            .with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    /// Arguments placed before the location flags, e.g. for a wrapper script.
    #[must_use]
    pub fn with_base_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run astrotimes for the given observer and return its transit token.
    #[instrument(skip(self), fields(program = %self.program.display()))]
    pub fn transit_for(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<String, AstrotimesError> {
        let args = [
            "--lat".to_string(),
            latitude.to_string(),
            "--lon".to_string(),
            longitude.to_string(),
            "--tz".to_string(),
            timezone.to_string(),
            "--no-prompt".to_string(),
        ];
        let stdout = self.run(&args)?;

        match extract_moon_transit(&stdout) {
            Some(time) => {
                debug!(time, "found moon transit");
                Ok(time.to_string())
            }
            None => {
                debug!("no '{TRANSIT_MARKER}' line in {} bytes of output", stdout.len());
                Err(AstrotimesError::NoTransit)
            }
        }
    }

    fn run(&self, args: &[String]) -> Result<String, AstrotimesError> {
        let mut child = Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| AstrotimesError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        // Drain both pipes while waiting so the child never blocks on a full buffer.
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        // One deadline covers the child and its pipes; a descendant may keep them open.
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    debug!("killing astrotimes after {:?}", self.timeout);
                    reap(&mut child);
                    return Err(AstrotimesError::Timeout(self.timeout));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    reap(&mut child);
                    return Err(e.into());
                }
            }
        };

        let stdout = self.collect(stdout, deadline)?;
        let stderr = self.collect(stderr, deadline)?;

        if !status.success() {
            debug!(stderr = stderr.trim(), "astrotimes exited with {status}");
            return Err(AstrotimesError::Exit(status));
        }

        Ok(stdout)
    }

    fn collect(
        &self,
        reader: Option<Captured>,
        deadline: Instant,
    ) -> Result<String, AstrotimesError> {
        let Some(rx) = reader else {
            return Ok(String::new());
        };
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(text) => Ok(text?),
            Err(RecvTimeoutError::Timeout) => {
                debug!("astrotimes output still open after {:?}", self.timeout);
                Err(AstrotimesError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(std::io::Error::other("output reader panicked").into())
            }
        }
    }
}

impl TransitSource for AstrotimesRunner {
    fn moon_transit(&self, location: &Location) -> Result<String, AstrotimesError> {
        self.transit_for(location.latitude, location.longitude, &location.timezone)
    }
}

/// First token of the first line containing [`TRANSIT_MARKER`].
#[must_use]
pub fn extract_moon_transit(output: &str) -> Option<&str> {
    output
        .lines()
        .find(|line| line.contains(TRANSIT_MARKER))
        .and_then(|line| line.split_whitespace().next())
}

/// Read a pipe to the end on a detached thread.
fn drain<R: Read + Send + 'static>(mut reader: R) -> Captured {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let text = reader
            .read_to_end(&mut buf)
            .map(|_| String::from_utf8_lossy(&buf).into_owned());
        let _ = tx.send(text);
    });
    rx
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
