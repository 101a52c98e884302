#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use imgdrop::error::{Result, UploadError};
use imgdrop::gitee::client::ImageUploader;
use imgdrop::postimage::driver::UploadFormDriver;
use imgdrop::runtime::logger::WorkflowLogger;
use imgdrop::upload::{UploadResult, UploadSlot};
use imgdrop::upload::locator::RepositoryLocator;

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

/// Minimal HTTP/1.1 server answering each connection with the next canned
/// `(status, body)` pair.
pub struct MockApi {
    pub base: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockApi {
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn spawn_api(responses: Vec<(u16, String)>) -> MockApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock api");
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut socket, _)) = listener.accept().await else { return };
            let request = read_request(&mut socket).await;
            captured.lock().unwrap().push(request);

            let reply = format!(
                "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    MockApi {
        base: format!("http://{}", addr),
        requests,
    }
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head.lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    CapturedRequest { method, path, body }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Uploader that succeeds with a fake URL, except on the given attempt
/// (1-based).
#[derive(Debug, Default)]
pub struct ScriptedUploader {
    pub fail_on_attempt: Option<usize>,
    attempts: AtomicUsize,
    pub seen: Mutex<Vec<usize>>,
}

impl ScriptedUploader {
    pub fn failing_on(attempt: usize) -> Self {
        Self { fail_on_attempt: Some(attempt), ..Default::default() }
    }

    pub fn seen(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageUploader for ScriptedUploader {
    async fn upload(
        &self,
        slot: &UploadSlot,
        repo: &RepositoryLocator,
        target_dir: &str,
        logger: &dyn WorkflowLogger,
    ) -> UploadResult {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().unwrap().push(slot.index);
        if self.fail_on_attempt == Some(attempt) {
            let msg = format!("Failed to upload image {} ({}): simulated outage", slot.index, slot.file_name());
            logger.error(&msg);
            return UploadResult::failure(slot.index, msg);
        }
        UploadResult::success(
            slot.index,
            format!("https://gitee.com/{}/{}/raw/master/{}/{}", repo.owner, repo.repo, target_dir, slot.file_name()),
        )
    }
}

/// Form driver returning a fixed set of links.
#[derive(Debug, Default)]
pub struct CannedDriver {
    pub links: Vec<String>,
    pub fail_with_timeout: bool,
    pub fail_to_launch: bool,
    pub submitted: Mutex<Vec<Vec<String>>>,
}

impl CannedDriver {
    pub fn returning(links: &[&str]) -> Self {
        Self { links: links.iter().map(|s| s.to_string()).collect(), ..Default::default() }
    }

    pub fn submissions(&self) -> Vec<Vec<String>> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl UploadFormDriver for CannedDriver {
    async fn submit_files(&self, paths: &[String]) -> Result<Vec<String>> {
        self.submitted.lock().unwrap().push(paths.to_vec());
        if self.fail_to_launch {
            return Err(UploadError::BrowserLaunch("could not auto detect a chrome executable".to_string()));
        }
        if self.fail_with_timeout {
            return Err(UploadError::TimeoutExceeded { what: "form.share".to_string(), secs: 120 });
        }
        Ok(self.links.clone())
    }
}

/// Writes small placeholder images into `dir`; returns their absolute paths.
pub fn write_images(dir: &Path, names: &[&str]) -> Vec<String> {
    names.iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, name.as_bytes()).unwrap();
            fs::canonicalize(&path).unwrap().to_string_lossy().into_owned()
        })
        .collect()
}
