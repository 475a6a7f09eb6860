use std::thread;
use std::time::Duration;

use reqwest::{Method, StatusCode};

use crate::error::{ApiError, Result};
use crate::http::{oauth_headers, read_json, HttpClient};
use crate::operation::{wait_operation_success, PollPolicy};
use crate::types::{Folder, FromResponse, Link};

pub const YANDEX_DISK_BASE: &str = "https://cloud-api.yandex.net/v1/disk";

/// Retry for remote-fetch uploads. One attempt means no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 1,
            initial_delay: Duration::from_secs(1),
        }
    }
}

/// Yandex Disk client.
///
/// Folders created through it are removed again when it is dropped, whatever
/// happened in between.
pub struct DiskClient {
    http: HttpClient,
    poll: PollPolicy,
    retry: RetryPolicy,
    created_folders: Vec<String>,
}

impl DiskClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_headers(base_url, oauth_headers(token)?),
            poll: PollPolicy::default(),
            retry: RetryPolicy::default(),
            created_folders: Vec::new(),
        })
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn created_folders(&self) -> &[String] {
        &self.created_folders
    }

    pub fn create_folder(&mut self, path: &str) -> Result<()> {
        let resp = self.http.send(Method::PUT, "/resources", None, &[("path", path)])?;
        let link: Link = read_json(resp)?;
        wait_operation_success(&self.http, &link, &self.poll, &format!("create {}", path))?;
        log::info!("created folder {}", path);
        self.created_folders.push(path.to_string());
        Ok(())
    }

    /// Has the disk fetch `url` into `/{folder}/{name}` and waits for it.
    pub fn upload_from_url(&self, folder: &str, url: &str, name: &str) -> Result<()> {
        let target = format!("/{}/{}", folder.trim_matches('/'), name);
        let mut delay = self.retry.initial_delay;
        let mut attempt = 1;
        loop {
            match self.upload_once(&target, url) {
                Err(e) if e.is_transient() && attempt < self.retry.attempts => {
                    log::warn!(
                        "upload of {} failed ({}), retry {} / {} in {:?}",
                        target,
                        e,
                        attempt,
                        self.retry.attempts - 1,
                        delay
                    );
                    thread::sleep(delay);
                    delay *= 2;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn upload_once(&self, target: &str, url: &str) -> Result<()> {
        let resp = self.http.send(
            Method::POST,
            "/resources/upload",
            None,
            &[("path", target), ("url", url), ("overwrite", "true")],
        )?;
        let link: Link = read_json(resp)?;
        wait_operation_success(&self.http, &link, &self.poll, &format!("upload {}", target))
    }

    pub fn get_folder(&self, path: &str) -> Result<Folder> {
        let resp = self.http.send(Method::GET, "/resources", None, &[("path", path)])?;
        Folder::from_response(read_json(resp)?)
    }

    /// Re-reads `path` until it holds at least `expected` items.
    pub fn wait_for_folder_size(&self, path: &str, expected: usize) -> Result<Folder> {
        for attempt in 1..=self.poll.attempts {
            let folder = self.get_folder(path)?;
            let count = folder.items().len();
            if count >= expected {
                return Ok(folder);
            }
            log::info!(
                "{} holds {} / {} items, attempt {} / {}",
                path,
                count,
                expected,
                attempt,
                self.poll.attempts
            );
            if attempt < self.poll.attempts {
                thread::sleep(self.poll.interval);
            }
        }
        Err(ApiError::Timeout(format!(
            "{} did not reach {} items",
            path, expected
        )))
    }

    /// Permanently deletes every folder this client created.
    ///
    /// All folders are attempted; the first error is returned. Deleted paths
    /// are forgotten, so calling this twice is harmless.
    pub fn clean_up(&mut self) -> Result<()> {
        let mut first_err = None;
        for folder in std::mem::take(&mut self.created_folders) {
            if let Err(e) = self.delete_permanently(&folder) {
                log::error!("failed to delete {}: {}", folder, e);
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn delete_permanently(&self, path: &str) -> Result<()> {
        let resp = self.http.send(
            Method::DELETE,
            "/resources",
            None,
            &[("path", path), ("permanently", "true")],
        )?;
        if resp.status() != StatusCode::NO_CONTENT {
            let link: Link = read_json(resp)?;
            wait_operation_success(&self.http, &link, &self.poll, &format!("delete {}", path))?;
        }
        log::info!("deleted folder {}", path);
        Ok(())
    }
}

impl Drop for DiskClient {
    fn drop(&mut self) {
        if self.created_folders.is_empty() {
            return;
        }
        if let Err(e) = self.clean_up() {
            log::error!("cleanup incomplete: {}", e);
        }
    }
}
