//! Progress reporting and advisory output.
//!
//! The [`Reporter`] is a side-channel sink: nothing in the pipeline branches
//! on it. Advisory guidance (where to re-authenticate, how to get added to a
//! site) goes through the same sink so tests can observe emissions.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

pub trait Reporter: Send + Sync {
    /// An upload run is starting against `endpoint` with `total` items.
    fn sync_started(&self, endpoint: &str, total: usize);

    /// A batch finished; `processed` items are done out of `total`.
    fn batch_uploaded(&self, processed: usize, total: usize);

    /// The registry rejected one item of the current batch.
    fn item_failed(&self, package: &str, reason: &str);

    /// Terminal status: every batch went through.
    fn sync_succeeded(&self, endpoint: &str);

    /// Terminal status: the run stopped on an error.
    fn sync_failed(&self);

    /// Guidance after a 401/403 response.
    fn auth_advisory(&self, host: &str, remote_message: Option<&str>);

    /// Guidance after the registry returned an empty site list.
    fn no_sites_advisory(&self, host: &str);
}

/// Terminal reporter: an indicatif bar for progress, plain stderr for
/// failures and advisory text.
pub struct ConsoleReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    /// Print a line without tearing the progress bar, if one is running.
    fn emit(&self, line: &str) {
        match &*self.bar.lock().unwrap() {
            Some(bar) => bar.println(line),
            None => eprintln!("{line}"),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn sync_started(&self, endpoint: &str, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=> "),
        );
        bar.set_message(format!("Sync to {endpoint}"));
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn batch_uploaded(&self, processed: usize, _total: usize) {
        if let Some(bar) = &*self.bar.lock().unwrap() {
            bar.set_position(processed as u64);
        }
    }

    fn item_failed(&self, package: &str, reason: &str) {
        self.emit(&format!("✗ {package}: {reason}"));
    }

    fn sync_succeeded(&self, _endpoint: &str) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
        println!("✓ Material upload complete");
    }

    fn sync_failed(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.abandon();
        }
        eprintln!("✗ Material upload failed");
    }

    fn auth_advisory(&self, host: &str, remote_message: Option<&str>) {
        self.emit("");
        self.emit(&format!(
            "Authentication failed. Get a new token from {host}, or ask the site owner to add you as a member, then re-run the command."
        ));
        self.emit(&format!("  token docs:  {host}/help.html#/dev-create-site"));
        self.emit(&format!("  member docs: {host}/help.html#/site-user-management"));
        if let Some(message) = remote_message {
            self.emit(&format!("  registry says: {message}"));
        }
        self.emit("");
    }

    fn no_sites_advisory(&self, host: &str) {
        self.emit("");
        self.emit("No sites are available for this token. Create a site, or ask an existing site to add you as a member.");
        self.emit(&format!("  create-site docs: {host}/help.html#/dev-create-site"));
        self.emit(&format!("  member docs:      {host}/help.html#/site-user-management"));
        self.emit("");
    }
}
