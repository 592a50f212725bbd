//! Azure DevOps retrieval adapter.
//!
//! Implements [`WorkItemSource`] against the Test Plans and Work Item
//! Tracking REST APIs: the suite listing of a plan, each suite's test case
//! listing (followed through the `_links` the service hands back), and the
//! expanded work item per test case. Every call carries the client timeout;
//! non-success responses surface as [`RetrievalError::Http`] with status and
//! body so the engine can report and move on.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use featsync_ports::{RetrievalError, WorkItemSource};
use featsync_schema::{
    AutomationStatus, MissingFieldError, SuiteRef, TestCaseRecord, TestCaseRef,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Work item API version the expand-relations query is pinned to.
const API_VERSION: &str = "7.1-preview.3";

#[derive(Clone, Debug)]
pub struct AzureTestPlanClient {
    pub organization: String,
    pub project: String,
    pub token: String,
    /// Service base URL (overridable for on-prem servers and tests).
    pub api_base: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AzureTestPlanClient {
    pub fn new(organization: String, project: String, token: String) -> Self {
        Self {
            organization,
            project,
            token,
            api_base: "https://dev.azure.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    fn client(&self) -> Result<Client, RetrievalError> {
        Client::builder()
            .user_agent("featsync/0.1")
            .timeout(self.timeout)
            .build()
            .map_err(|e| RetrievalError::Transport(e.to_string()))
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/_apis{}",
            self.api_base.trim_end_matches('/'),
            self.organization,
            self.project,
            path
        )
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        client: &Client,
        url: &str,
    ) -> Result<T, RetrievalError> {
        let resp = client
            .get(url)
            .header("Authorization", basic_auth_header(&self.token))
            .header("Content-Type", "application/json")
            .send()
            .map_err(|e| RetrievalError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(RetrievalError::Http { status, body });
        }

        resp.json::<T>()
            .map_err(|e| RetrievalError::Decode(e.to_string()))
    }
}

impl WorkItemSource for AzureTestPlanClient {
    fn fetch_suites(&self, plan_id: u64) -> Result<Vec<SuiteRef>, RetrievalError> {
        let client = self.client()?;
        let url = self.api_url(&format!("/testplan/Plans/{plan_id}/suites"));
        let listing: SuiteListResponse = self.get_json(&client, &url)?;

        let mut suites = Vec::with_capacity(listing.value.len());
        for item in listing.value {
            // The service hands back the test case listing URL; follow it
            // rather than reconstructing it.
            let cases: TestCaseListResponse =
                self.get_json(&client, &item.links.test_cases.href)?;
            let test_cases = cases
                .value
                .into_iter()
                .map(|c| TestCaseRef {
                    id: c.work_item.id,
                    name: c.work_item.name,
                })
                .collect();
            suites.push(SuiteRef {
                id: item.id,
                name: item.name,
                test_cases,
            });
        }
        Ok(suites)
    }

    fn fetch_test_case(&self, id: u64) -> Result<TestCaseRecord, RetrievalError> {
        let client = self.client()?;
        let url = format!(
            "{}?$expand=relations&api-version={API_VERSION}",
            self.api_url(&format!("/wit/workitems/{id}"))
        );
        let item: WorkItemResponse = self.get_json(&client, &url)?;
        record_from_work_item(id, item)
    }
}

fn basic_auth_header(token: &str) -> String {
    // PAT as the user name, empty password: the service's convention.
    format!("Basic {}", STANDARD.encode(format!("{token}:")))
}

/// Shape a raw work item response into the canonical record.
fn record_from_work_item(
    id: u64,
    item: WorkItemResponse,
) -> Result<TestCaseRecord, RetrievalError> {
    let fields = item.fields;
    let title = fields.title.ok_or(MissingFieldError("System.Title"))?;
    let raw_steps = fields
        .steps
        .ok_or(MissingFieldError("Microsoft.VSTS.TCM.Steps"))?;

    let related_work_items = item
        .relations
        .unwrap_or_default()
        .iter()
        .filter_map(|r| trailing_id(&r.url))
        .collect();

    Ok(TestCaseRecord {
        id,
        title,
        automation_status: AutomationStatus::from_field(fields.automation_status.as_deref()),
        raw_steps,
        raw_parameters: fields.parameters,
        raw_example_data: fields.local_data_source,
        related_work_items,
    })
}

/// Work item id from a relation URL: the trailing integer path segment.
/// Relations pointing anywhere else are skipped.
fn trailing_id(relation_url: &str) -> Option<u64> {
    let parsed = Url::parse(relation_url).ok()?;
    parsed.path_segments()?.next_back()?.parse().ok()
}

#[derive(Debug, Deserialize)]
struct SuiteListResponse {
    value: Vec<SuiteItem>,
}

#[derive(Debug, Deserialize)]
struct SuiteItem {
    id: u64,
    name: String,
    #[serde(rename = "_links")]
    links: SuiteLinks,
}

#[derive(Debug, Deserialize)]
struct SuiteLinks {
    #[serde(rename = "testCases")]
    test_cases: LinkRef,
}

#[derive(Debug, Deserialize)]
struct LinkRef {
    href: String,
}

#[derive(Debug, Deserialize)]
struct TestCaseListResponse {
    value: Vec<TestCaseItem>,
}

#[derive(Debug, Deserialize)]
struct TestCaseItem {
    #[serde(rename = "workItem")]
    work_item: WorkItemRef,
}

#[derive(Debug, Deserialize)]
struct WorkItemRef {
    id: u64,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct WorkItemResponse {
    fields: WorkItemFields,
    relations: Option<Vec<WorkItemRelation>>,
}

/// The duck-typed field bag of the source API, made explicit: title and steps
/// are required downstream, everything else is genuinely optional.
#[derive(Debug, Deserialize)]
struct WorkItemFields {
    #[serde(rename = "System.Title")]
    title: Option<String>,
    #[serde(rename = "Microsoft.VSTS.TCM.Steps")]
    steps: Option<String>,
    #[serde(rename = "Microsoft.VSTS.TCM.Parameters")]
    parameters: Option<String>,
    #[serde(rename = "Microsoft.VSTS.TCM.LocalDataSource")]
    local_data_source: Option<String>,
    #[serde(rename = "Custom.AutomationStatus")]
    automation_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorkItemRelation {
    url: String,
}
