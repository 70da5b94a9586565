// ABOUTME: Ephemeral per-deploy image tags scoped to one application.
// ABOUTME: Format is <registry>/<app>:deployment-<n> with n strictly increasing per process.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

use super::AppName;

const TAG_PREFIX: &str = "deployment-";

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeploymentTagError {
    #[error("deployment tag cannot be empty")]
    Empty,
}

/// A tag applied to a local image solely to carry it through one push.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentTag(String);

impl DeploymentTag {
    /// Generate a fresh tag for `app` on `registry`.
    ///
    /// The numeric suffix is a millisecond timestamp, bumped when two tags are
    /// generated within the same millisecond so a tag is never reused.
    pub fn generate(registry: &str, app: &AppName) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let stamp = next_stamp(now);
        Self(format!("{}{}", Self::prefix(registry, app), stamp))
    }

    /// Wrap an existing tag string. Empty strings are rejected.
    pub fn parse(value: &str) -> Result<Self, DeploymentTagError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(DeploymentTagError::Empty);
        }
        Ok(Self(value.to_string()))
    }

    /// Common prefix of every deployment tag for `app` on `registry`.
    pub fn prefix(registry: &str, app: &AppName) -> String {
        format!("{}/{}:{}", registry, app, TAG_PREFIX)
    }

    /// Whether `candidate` is a deployment tag for `app` on `registry`.
    pub fn belongs_to(candidate: &str, registry: &str, app: &AppName) -> bool {
        candidate
            .strip_prefix(&Self::prefix(registry, app))
            .is_some_and(|suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Repository part (everything before the final `:`).
    pub fn repository(&self) -> &str {
        match self.0.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => repo,
            _ => &self.0,
        }
    }

    /// Tag part (after the final `:`), if present.
    pub fn tag(&self) -> Option<&str> {
        match self.0.rsplit_once(':') {
            Some((_, tag)) if !tag.contains('/') => Some(tag),
            _ => None,
        }
    }
}

fn next_stamp(now: i64) -> i64 {
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let candidate = if now > last { now } else { last + 1 };
        match LAST_STAMP.compare_exchange_weak(last, candidate, Ordering::SeqCst, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

impl fmt::Display for DeploymentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
