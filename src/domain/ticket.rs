use serde::Deserialize;

/// Everything GitLab needs to open an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIssue {
    #[serde(default)]
    pub iid: Option<u64>,
    pub web_url: String,
}

/// Keeps the catalog labels whose name was computed for the incident, in catalog order.
pub fn existing_labels(catalog: &[Label], wanted: &[String]) -> Vec<String> {
    catalog
        .iter()
        .filter(|label| wanted.contains(&label.name))
        .map(|label| label.name.clone())
        .collect()
}
