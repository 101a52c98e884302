use std::sync::LazyLock;
use regex::Regex;

/// Direct links as rendered in the share box: `https://i.postimg.cc/<token>/<name>`.
static DIRECT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://i\.postimg\.cc/\w+/\S+").expect("valid direct link regex")
});

pub const DOWNLOAD_SUFFIX: &str = "?dl=1";

/// Every direct link in `text`, in the order the page printed them.
pub fn extract_direct_links(text: &str) -> Vec<String> {
    DIRECT_LINK.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Forces the host to serve the file as a download.
pub fn with_download_suffix(url: &str) -> String {
    if url.ends_with(DOWNLOAD_SUFFIX) {
        url.to_string()
    } else {
        format!("{}{}", url, DOWNLOAD_SUFFIX)
    }
}
