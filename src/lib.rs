//! End-to-end harness: fetch dog pictures from Dog CEO, have Yandex Disk
//! download them into a folder, then check what the folder ended up holding.

pub mod assertions;
pub mod config;
pub mod disk;
pub mod dog_ceo;
pub mod error;
pub mod http;
pub mod operation;
pub mod scenario;
pub mod types;

#[cfg(test)]
mod test_support;

pub use assertions::{verify_breed_folder, AssertionFailures, SoftAssertions};
pub use config::Config;
pub use disk::{DiskClient, RetryPolicy};
pub use dog_ceo::DogCeoApi;
pub use error::{ApiError, Result};
pub use operation::PollPolicy;
pub use scenario::{image_name, upload_breed_photos, UploadReport};
pub use types::{Folder, FolderItem, ResourceType};
