//! Wire types for the Salesforce REST metadata endpoints

use serde::Deserialize;

/// Response body of `GET /services/data/{version}/sobjects`.
#[derive(Debug, Deserialize)]
pub struct SobjectListResponse {
    pub sobjects: Vec<SobjectStub>,
}

/// One entry in the sObject list. Only the name is displayed.
#[derive(Debug, Deserialize)]
pub struct SobjectStub {
    pub name: String,
}

/// Response body of `GET /services/data/{version}/sobjects/{name}/describe`.
#[derive(Debug, Deserialize)]
pub struct DescribeResponse {
    pub fields: Vec<FieldDescribe>,
}

/// One field of a describe result.
#[derive(Debug, Deserialize)]
pub struct FieldDescribe {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiFault {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    pub message: String,
}
