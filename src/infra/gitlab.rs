use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{ACCEPT, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use crate::domain::ticket::{CreatedIssue, IssueDraft, Label, Project};
use crate::error::GitlabError;
use crate::services::IssueTracker;

const PRIVATE_TOKEN: HeaderName = HeaderName::from_static("private-token");
const NEXT_PAGE: &str = "x-next-page";
const LABELS_PER_PAGE: &str = "100";

/// GitLab REST v4 client authenticated with a private token.
///
/// Construction does no network I/O.
pub struct GitlabClient {
    http: Client,
    base_url: Url,
}

impl GitlabClient {
    pub fn new(endpoint: &str, token: &str) -> Result<Self, GitlabError> {
        let base_url = Self::parse_endpoint(endpoint)?;

        let mut token_value = HeaderValue::from_str(token).map_err(|_| GitlabError::InvalidToken)?;
        token_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(PRIVATE_TOKEN, token_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, base_url })
    }

    fn parse_endpoint(endpoint: &str) -> Result<Url, GitlabError> {
        let invalid = |reason: String| GitlabError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let mut url = Url::parse(endpoint.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        // Keep any path prefix (e.g. https://host/gitlab) when joining API paths.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    fn api_url(&self, path: &str) -> Result<Url, GitlabError> {
        self.base_url
            .join(&format!("api/v4/{path}"))
            .map_err(|err| GitlabError::InvalidEndpoint {
                endpoint: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }

    fn project_url(project: &Project, suffix: &str) -> String {
        format!("projects/{}/{suffix}", project.id)
    }
}

#[async_trait]
impl IssueTracker for GitlabClient {
    async fn find_project(&self, namespace_and_name: &str) -> Result<Project, GitlabError> {
        let url = self.api_url(&format!(
            "projects/{}",
            urlencoding::encode(namespace_and_name.trim_matches('/'))
        ))?;
        debug!(%url, "resolving GitLab project");

        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn list_labels(&self, project: &Project) -> Result<Vec<Label>, GitlabError> {
        let url = self.api_url(&Self::project_url(project, "labels"))?;
        let mut labels = Vec::new();
        let mut page = "1".to_string();
        let mut visited = HashSet::new();

        loop {
            visited.insert(page.clone());
            debug!(%url, page = %page, "listing GitLab labels");
            let response = self
                .http
                .get(url.clone())
                .query(&[("per_page", LABELS_PER_PAGE), ("page", page.as_str())])
                .send()
                .await?;

            let next_page = response
                .headers()
                .get(NEXT_PAGE)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let batch: Vec<Label> = read_json(response).await?;
            labels.extend(batch);

            // Never fetch the same page twice.
            match next_page {
                Some(next) if !visited.contains(&next) => page = next,
                Some(next) => {
                    warn!(%url, page = %next, "GitLab pagination revisits a page, stopping");
                    break;
                }
                None => break,
            }
        }

        Ok(labels)
    }

    async fn create_issue(
        &self,
        project: &Project,
        draft: &IssueDraft,
    ) -> Result<CreatedIssue, GitlabError> {
        let url = self.api_url(&Self::project_url(project, "issues"))?;
        debug!(%url, labels = ?draft.labels, "creating GitLab issue");

        let response = self
            .http
            .post(url)
            .json(&CreateIssueRequest::from(draft))
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GitlabError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        return Err(GitlabError::Status { status, body });
    }

    response
        .json::<T>()
        .await
        .map_err(|err| GitlabError::Decode(err.to_string()))
}

#[derive(Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    description: &'a str,
    labels: String,
}

impl<'a> From<&'a IssueDraft> for CreateIssueRequest<'a> {
    fn from(draft: &'a IssueDraft) -> Self {
        Self {
            title: &draft.title,
            description: &draft.description,
            labels: draft.labels.join(","),
        }
    }
}
