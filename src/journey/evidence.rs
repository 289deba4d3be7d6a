use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::browser::driver::PageDriver;

/// Writes run-scoped, full-page screenshots and counts the ones that landed.
///
/// Capture never fails the caller: errors are logged and reported as `None`.
/// A name used twice in a run gets a `-2`, `-3`, ... suffix.
#[derive(Debug)]
pub struct EvidenceCapturer {
    dir: PathBuf,
    captured: usize,
    used: HashMap<String, usize>,
}

impl EvidenceCapturer {
    /// Screenshots go to `<root>/<run_id>/`. A directory that cannot be
    /// created only means every later capture will fail.
    pub fn new(root: &Path, run_id: &str) -> Self {
        let dir = root.join(run_id);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(dir = %dir.display(), error = %e, "could not create screenshot directory");
        }
        Self {
            dir,
            captured: 0,
            used: HashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.captured
    }

    pub fn capture(&mut self, driver: &mut dyn PageDriver, name: &str) -> Option<PathBuf> {
        let file_name = format!("{}.png", self.unique_name(name));
        let path = self.dir.join(file_name);
        match driver.screenshot(&path) {
            Ok(()) => {
                self.captured += 1;
                debug!(path = %path.display(), "screenshot captured");
                Some(path)
            }
            Err(e) => {
                warn!(name, error = %e, "screenshot failed");
                None
            }
        }
    }

    fn unique_name(&mut self, name: &str) -> String {
        let seen = self.used.entry(name.to_string()).or_insert(0);
        *seen += 1;
        match *seen {
            1 => name.to_string(),
            n => format!("{}-{}", name, n),
        }
    }
}

pub fn step_shot_name(step_number: u32) -> String {
    format!("step-{:02}", step_number)
}
