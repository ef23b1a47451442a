//! CRM client trait and its REST implementation

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::CrmError;
use crate::types::{ApiFault, DescribeResponse, SobjectListResponse};

/// REST API version used for metadata reads.
pub const API_VERSION: &str = "v59.0";

/// Per-request access data for a CRM call, taken from the caller's session.
#[derive(Debug, Clone)]
pub struct CrmAccess {
    pub access_token: String,
    pub instance_url: String,
}

/// CRM metadata operations.
///
/// Handlers depend on this trait, not on [`RestCrm`], so integration tests
/// can substitute an in-memory implementation.
#[async_trait]
pub trait Crm: Send + Sync {
    /// List all sObject names in the org, in API order.
    async fn list_objects(&self, access: &CrmAccess) -> Result<Vec<String>, CrmError>;

    /// Field-name → field-type map for one sObject, in ascending lexical
    /// order of field name.
    async fn describe_object(
        &self,
        access: &CrmAccess,
        name: &str,
    ) -> Result<BTreeMap<String, String>, CrmError>;
}

/// CRM client over the Salesforce REST API.
pub struct RestCrm {
    http: reqwest::Client,
    api_version: String,
}

impl RestCrm {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_version: API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(api_version: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_version: api_version.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        access: &CrmAccess,
        path: &str,
    ) -> Result<T, CrmError> {
        let url = format!(
            "{}/services/data/{}/{}",
            access.instance_url.trim_end_matches('/'),
            self.api_version,
            path
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&access.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_fault(status, &body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CrmError::Decode(e.to_string()))
    }
}

impl Default for RestCrm {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a non-2xx response to a fault, preserving the API's error code and
/// message when the body parses.
fn api_fault(status: reqwest::StatusCode, body: &str) -> CrmError {
    match serde_json::from_str::<Vec<ApiFault>>(body) {
        Ok(faults) if !faults.is_empty() => CrmError::Api {
            kind: faults[0].error_code.clone(),
            message: faults[0].message.clone(),
        },
        _ => CrmError::Api {
            kind: format!("HTTP_{}", status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        },
    }
}

#[async_trait]
impl Crm for RestCrm {
    async fn list_objects(&self, access: &CrmAccess) -> Result<Vec<String>, CrmError> {
        let response: SobjectListResponse = self.get_json(access, "sobjects").await?;
        Ok(response.sobjects.into_iter().map(|s| s.name).collect())
    }

    async fn describe_object(
        &self,
        access: &CrmAccess,
        name: &str,
    ) -> Result<BTreeMap<String, String>, CrmError> {
        let response: DescribeResponse = self
            .get_json(access, &format!("sobjects/{}/describe", name))
            .await?;

        Ok(response
            .fields
            .into_iter()
            .map(|f| (f.name, f.field_type))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_fault_prefers_body_error_code() {
        let err = api_fault(
            reqwest::StatusCode::NOT_FOUND,
            r#"[{"errorCode":"NOT_FOUND","message":"The requested resource does not exist"}]"#,
        );
        match err {
            CrmError::Api { kind, message } => {
                assert_eq!(kind, "NOT_FOUND");
                assert_eq!(message, "The requested resource does not exist");
            }
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn api_fault_falls_back_to_status() {
        let err = api_fault(reqwest::StatusCode::BAD_GATEWAY, "<html>gateway</html>");
        match err {
            CrmError::Api { kind, .. } => assert_eq!(kind, "HTTP_502"),
            other => panic!("unexpected fault: {other:?}"),
        }
    }

    #[test]
    fn describe_collects_into_sorted_map() {
        // BTreeMap gives the ascending field-name order the describe view
        // relies on, regardless of API order.
        let fields = vec![
            ("Name".to_string(), "string".to_string()),
            ("AccountNumber".to_string(), "string".to_string()),
            ("Id".to_string(), "id".to_string()),
        ];
        let map: BTreeMap<String, String> = fields.into_iter().collect();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["AccountNumber", "Id", "Name"]);
    }
}
