use std::fmt;
use std::sync::LazyLock;
use regex::Regex;
use crate::error::{Result, UploadError};

static SSH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@gitee\.com:([^/]+)/([^/]+?)(?:\.git)?$").expect("valid ssh locator regex")
});

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://|git://)?gitee\.com/([^/]+)/([^/]+?)(?:\.git)?$").expect("valid url locator regex")
});

/// Owner/repository pair of a Gitee repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepositoryLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl RepositoryLocator {
    /// Accepts `owner/repo`, `git@gitee.com:owner/repo[.git]` and
    /// `[https://|http://|git://]gitee.com/owner/repo[.git]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = raw.trim().trim_matches('/');

        if url.contains('/') && !url.contains(':') && !url.contains('@') && !url.contains("gitee.com") {
            let mut parts = url.split('/');
            if let (Some(owner), Some(repo)) = (parts.next(), parts.next()) {
                if !owner.is_empty() && !repo.is_empty() {
                    return Ok(Self::new(owner, repo));
                }
            }
        }

        for pattern in [&*SSH_PATTERN, &*URL_PATTERN] {
            if let Some(caps) = pattern.captures(url) {
                return Ok(Self::new(&caps[1], &caps[2]));
            }
        }

        Err(UploadError::InvalidLocatorFormat { input: raw.to_string() })
    }

    fn new(owner: &str, repo: &str) -> Self {
        Self { owner: owner.to_string(), repo: repo.to_string() }
    }
}

impl std::str::FromStr for RepositoryLocator {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
