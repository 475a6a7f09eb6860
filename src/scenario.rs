use url::Url;

use crate::disk::DiskClient;
use crate::dog_ceo::DogCeoApi;
use crate::error::{ApiError, Result};
use crate::types::Folder;

/// What one breed run put on the disk.
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub breed: String,
    pub sub_breeds: Vec<String>,
    pub uploaded: Vec<String>,
    pub folder: Folder,
}

impl UploadReport {
    /// One image per sub-breed, or one for the breed itself.
    pub fn expected_count(&self) -> usize {
        self.sub_breeds.len().max(1)
    }
}

/// Disk file name for an image: its last two path segments joined by `_`.
///
/// `https://images.dog.ceo/breeds/bulldog-boston/n02096585_1.jpg` becomes
/// `bulldog-boston_n02096585_1.jpg`.
pub fn image_name(image_url: &str) -> Result<String> {
    let invalid = || ApiError::InvalidImageUrl(image_url.to_string());
    let url = Url::parse(image_url).map_err(|_| invalid())?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        [.., dir, file] => Ok(format!("{}_{}", dir, file)),
        _ => Err(invalid()),
    }
}

/// Fetches images for `breed`, uploads them into `folder` and waits until
/// the disk lists all of them.
pub fn upload_breed_photos(
    dog: &mut DogCeoApi,
    disk: &mut DiskClient,
    breed: &str,
    folder: &str,
) -> Result<UploadReport> {
    let sub_breeds = dog.get_sub_breeds(breed)?;
    let urls = dog.get_urls(breed, &sub_breeds)?;
    log::info!("{}: {} image(s) to upload", breed, urls.len());

    disk.create_folder(folder)?;
    let mut uploaded = Vec::with_capacity(urls.len());
    for url in &urls {
        let name = image_name(url)?;
        disk.upload_from_url(folder, url, &name)?;
        uploaded.push(name);
    }

    let folder = disk.wait_for_folder_size(&format!("/{}", folder.trim_matches('/')), urls.len())?;
    Ok(UploadReport {
        breed: breed.to_string(),
        sub_breeds,
        uploaded,
        folder,
    })
}
