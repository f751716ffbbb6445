//! Project records.
//!
//! A project groups tasks by id. Its `task_count` is a running counter bumped
//! whenever a task is created for it; it is never recomputed from the task
//! collection, so it can drift from the real number of tasks.

use serde::{Deserialize, Serialize};

use crate::ids;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub task_count: u64,
    #[serde(default)]
    pub image_url: String,
}

impl Project {
    /// Create a new project with a fresh id and a zero task count.
    pub fn new(name: &str) -> Self {
        Project {
            id: ids::project_id(name),
            name: name.to_string(),
            task_count: 0,
            image_url: placeholder_image_url(name),
        }
    }
}

/// Placeholder cover image with the project name as its caption.
pub fn placeholder_image_url(name: &str) -> String {
    format!("https://placehold.co/600x400?text={}", urlencoding::encode(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project() {
        let p = Project::new("Mobile App");
        assert!(p.id.starts_with("mobile-app-"));
        assert_eq!(p.name, "Mobile App");
        assert_eq!(p.task_count, 0);
        assert_eq!(p.image_url, "https://placehold.co/600x400?text=Mobile%20App");
    }

    #[test]
    fn test_project_json_shape() {
        let p = Project::new("Ops");
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["taskCount"], 0);
        assert!(v["imageUrl"].as_str().unwrap().contains("text=Ops"));
    }
}
