use std::fmt;

use crate::scenario::UploadReport;
use crate::types::{Folder, ResourceType};

/// Every check that failed in one [`SoftAssertions`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailures(pub Vec<String>);

impl fmt::Display for AssertionFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} assertion(s) failed:", self.0.len())?;
        for failure in &self.0 {
            writeln!(f, "  - {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AssertionFailures {}

/// Checks that record a failure and keep going; [`finish`](Self::finish)
/// reports all of them together.
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: Vec<String>,
}

impl SoftAssertions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, condition: bool, message: impl Into<String>) -> bool {
        if !condition {
            let message = message.into();
            log::warn!("soft assertion failed: {}", message);
            self.failures.push(message);
        }
        condition
    }

    pub fn check_eq<T: PartialEq + fmt::Debug>(&mut self, left: T, right: T, what: &str) -> bool {
        let ok = left == right;
        self.check(ok, format!("{}: expected {:?}, got {:?}", what, right, left))
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn finish(self) -> Result<(), AssertionFailures> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(AssertionFailures(self.failures))
        }
    }
}

/// Checks `folder` against what uploading `report.breed` should have produced.
pub fn verify_breed_folder(folder: &Folder, report: &UploadReport, folder_name: &str) -> SoftAssertions {
    let mut soft = SoftAssertions::new();
    soft.check_eq(folder.node.resource_type, ResourceType::Dir, "folder type");
    soft.check_eq(folder.node.name.as_str(), folder_name, "folder name");
    soft.check_eq(folder.items().len(), report.expected_count(), "item count");
    for item in folder.items() {
        let name = &item.node.name;
        soft.check_eq(item.node.resource_type, ResourceType::File, &format!("type of {}", name));
        soft.check(
            name.starts_with(&report.breed),
            format!("{} does not start with {}", name, report.breed),
        );
    }
    soft
}
