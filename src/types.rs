use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

// ============================================================================
// Response mapping
// ============================================================================

/// Records that can be built from a decoded API response.
pub trait FromResponse: Sized {
    fn from_response(res: serde_json::Value) -> Result<Self>;
}

impl<T: DeserializeOwned> FromResponse for T {
    fn from_response(res: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(res)?)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Disk resources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Dir,
    File,
}

/// Fields shared by every disk resource.
///
/// `type` and the timestamps are typed here, so a record that deserialized
/// at all already holds the converted values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub path: String,
    pub name: String,
    pub revision: u64,
    pub resource_id: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub created: DateTime<FixedOffset>,
    pub modified: DateTime<FixedOffset>,
    #[serde(default)]
    pub comment_ids: HashMap<String, String>,
    #[serde(default)]
    pub exif: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewSize {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderItem {
    #[serde(flatten)]
    pub node: Node,
    pub antivirus_status: String,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<PreviewSize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedded {
    pub sort: String,
    pub path: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<FolderItem>,
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    #[serde(flatten)]
    pub node: Node,
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
}

impl Folder {
    pub fn items(&self) -> &[FolderItem] {
        &self.embedded.items
    }
}

// ============================================================================
// Asynchronous operations
// ============================================================================

/// Body of every mutating disk call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub templated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Success,
    Failed,
    InProgress(String),
}

impl<'de> Deserialize<'de> for OperationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "success" => OperationStatus::Success,
            "failed" => OperationStatus::Failed,
            _ => OperationStatus::InProgress(raw),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationState {
    pub status: OperationStatus,
}

// ============================================================================
// Dog CEO
// ============================================================================

/// Every Dog CEO answer wraps its payload in `message`.
#[derive(Debug, Deserialize)]
pub struct DogResponse<T> {
    pub message: Option<T>,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn item_json(name: &str) -> serde_json::Value {
        json!({
            "antivirus_status": "clean",
            "file": format!("https://downloader.disk.yandex.ru/disk/{name}"),
            "sha256": "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            "name": name,
            "exif": {},
            "created": "2024-03-01T10:15:30+00:00",
            "resource_id": format!("12345:{name}"),
            "modified": "2024-03-01T10:15:31+00:00",
            "path": format!("disk:/test_folder/{name}"),
            "comment_ids": {"private_resource": "12345:abc", "public_resource": "12345:abc"},
            "type": "file",
            "revision": 1709288131000000u64,
            "media_type": "image",
            "md5": "d41d8cd98f00b204e9800998ecf8427e",
            "mime_type": "image/jpeg",
            "size": 34567,
            "sizes": [{"url": "https://downloader.disk.yandex.ru/preview/1", "name": "DEFAULT"}]
        })
    }

    fn folder_json(items: serde_json::Value) -> serde_json::Value {
        json!({
            "_embedded": {
                "sort": "",
                "items": items,
                "limit": 20,
                "offset": 0,
                "path": "disk:/test_folder",
                "total": 2
            },
            "name": "test_folder",
            "exif": {},
            "resource_id": "12345:folder",
            "created": "2024-03-01T10:15:00+03:00",
            "modified": "2024-03-01T10:15:00+03:00",
            "path": "disk:/test_folder",
            "comment_ids": {},
            "type": "dir",
            "revision": 1709288100000000u64
        })
    }

    #[test]
    fn folder_maps_nested_items() {
        let raw = folder_json(json!([
            item_json("bulldog-boston_n02096585_1.jpg"),
            item_json("bulldog-french_n02108915_2.jpg"),
        ]));
        let folder = Folder::from_response(raw.clone()).unwrap();

        assert_eq!(folder.node.path, raw["path"]);
        assert_eq!(folder.node.name, raw["name"]);
        assert_eq!(folder.node.revision, raw["revision"].as_u64().unwrap());
        assert_eq!(folder.node.resource_type, ResourceType::Dir);
        assert_eq!(folder.embedded.total, 2);
        assert_eq!(folder.items().len(), 2);

        let first = &folder.items()[0];
        assert_eq!(first.node.resource_type, ResourceType::File);
        assert_eq!(first.node.name, "bulldog-boston_n02096585_1.jpg");
        assert_eq!(first.size, Some(34567));
        assert_eq!(first.sizes.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn dates_keep_their_offset() {
        let folder = Folder::from_response(folder_json(json!([]))).unwrap();
        let created = folder.node.created;
        assert_eq!(created.offset().local_minus_utc(), 3 * 3600);
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 1));
        assert_eq!((created.hour(), created.minute()), (10, 15));
    }

    #[test]
    fn reserializing_keeps_converted_values() {
        let folder = Folder::from_response(folder_json(json!([item_json("doberman_1.jpg")]))).unwrap();
        let again = Folder::from_response(serde_json::to_value(&folder).unwrap()).unwrap();
        assert_eq!(again.node.created, folder.node.created);
        assert_eq!(again.node.resource_type, ResourceType::Dir);
        assert_eq!(again.items()[0].node.modified, folder.items()[0].node.modified);
    }

    #[test]
    fn null_items_map_to_empty_listing() {
        let folder = Folder::from_response(folder_json(serde_json::Value::Null)).unwrap();
        assert!(folder.items().is_empty());
    }

    #[test]
    fn optional_item_fields_may_be_absent() {
        let mut raw = item_json("collie_1.jpg");
        let obj = raw.as_object_mut().unwrap();
        for key in ["media_type", "md5", "sha256", "mime_type", "size", "sizes"] {
            obj.remove(key);
        }
        let item = FolderItem::from_response(raw).unwrap();
        assert!(item.md5.is_none());
        assert!(item.size.is_none());
    }

    #[test]
    fn missing_required_field_fails() {
        let mut raw = folder_json(json!([]));
        raw.as_object_mut().unwrap().remove("resource_id");
        let err = Folder::from_response(raw).unwrap_err();
        assert!(matches!(err, ApiError::Mapping(_)));
    }

    #[test]
    fn unknown_resource_type_fails() {
        let mut raw = item_json("spaniel_1.jpg");
        raw["type"] = json!("symlink");
        assert!(FolderItem::from_response(raw).is_err());
    }

    #[test]
    fn bad_timestamp_fails() {
        let mut raw = item_json("spaniel_1.jpg");
        raw["created"] = json!("yesterday");
        assert!(FolderItem::from_response(raw).is_err());
    }

    #[test]
    fn operation_status_variants() {
        let parse = |s: &str| -> OperationStatus {
            OperationState::from_response(json!({ "status": s })).unwrap().status
        };
        assert_eq!(parse("success"), OperationStatus::Success);
        assert_eq!(parse("failed"), OperationStatus::Failed);
        assert_eq!(parse("in-progress"), OperationStatus::InProgress("in-progress".into()));
    }
}
