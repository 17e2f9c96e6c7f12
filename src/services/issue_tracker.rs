use async_trait::async_trait;

use crate::domain::ticket::{CreatedIssue, IssueDraft, Label, Project};
use crate::error::GitlabError;

/// The three GitLab calls a ticket creation needs.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    async fn find_project(&self, namespace_and_name: &str) -> Result<Project, GitlabError>;
    async fn list_labels(&self, project: &Project) -> Result<Vec<Label>, GitlabError>;
    async fn create_issue(
        &self,
        project: &Project,
        draft: &IssueDraft,
    ) -> Result<CreatedIssue, GitlabError>;
}
