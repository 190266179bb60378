use serde::{Deserialize, Serialize};

/// Project attributes as entered in the form, already normalised.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    /// Set semantics; first occurrence wins and display order is preserved.
    pub technologies: Vec<String>,
    pub license: Option<String>,
}

impl ProjectDescriptor {
    pub fn set_features(&mut self, raw: &str) {
        self.features = split_list(raw);
    }

    pub fn set_technologies(&mut self, raw: &str) {
        let mut technologies: Vec<String> = Vec::new();
        for entry in split_list(raw) {
            if !technologies.contains(&entry) {
                technologies.push(entry);
            }
        }
        self.technologies = technologies;
    }

    pub fn set_license(&mut self, raw: &str) {
        let trimmed = raw.trim();
        self.license = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    /// Form-side check: name and description must be filled in.
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Body of a generation call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub project_name: String,
    pub description: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Pure mapping from form state to a generation request. Never fails.
pub fn to_request(descriptor: &ProjectDescriptor) -> GenerationRequest {
    GenerationRequest {
        project_name: descriptor.name.trim().to_string(),
        description: descriptor.description.trim().to_string(),
        features: clean(&descriptor.features),
        technologies: clean(&descriptor.technologies),
        license: descriptor
            .license
            .as_deref()
            .map(str::trim)
            .filter(|license| !license.is_empty())
            .map(ToOwned::to_owned),
    }
}

/// Split a comma-separated field, trimming entries and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

// Descriptors built directly (not via the setters) still get normalised.
fn clean(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{split_list, to_request, ProjectDescriptor};

    #[test]
    fn split_list_trims_and_drops_empty_entries() {
        assert_eq!(split_list(" a, b ,,c , "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn technologies_keep_first_occurrence_order() {
        let mut descriptor = ProjectDescriptor::default();
        descriptor.set_technologies("Rust, tokio, Rust, serde");
        assert_eq!(descriptor.technologies, vec!["Rust", "tokio", "serde"]);
    }

    #[test]
    fn blank_license_is_none() {
        let mut descriptor = ProjectDescriptor::default();
        descriptor.set_license("   ");
        assert_eq!(descriptor.license, None);
        descriptor.set_license(" MIT ");
        assert_eq!(descriptor.license.as_deref(), Some("MIT"));
    }

    #[test]
    fn to_request_normalises_hand_built_descriptors() {
        let descriptor = ProjectDescriptor {
            name: "  tool ".to_string(),
            description: "does things".to_string(),
            features: vec![" fast ".to_string(), String::new()],
            technologies: Vec::new(),
            license: Some("  ".to_string()),
        };
        let request = to_request(&descriptor);
        assert_eq!(request.project_name, "tool");
        assert_eq!(request.features, vec!["fast"]);
        assert!(request.technologies.is_empty());
        assert_eq!(request.license, None);
    }

    #[test]
    fn submittable_requires_name_and_description() {
        let mut descriptor = ProjectDescriptor::default();
        assert!(!descriptor.is_submittable());
        descriptor.name = "x".to_string();
        assert!(!descriptor.is_submittable());
        descriptor.description = "y".to_string();
        assert!(descriptor.is_submittable());
    }
}
