//! Salesforce metadata client for metabrowse
//!
//! Exposes the two metadata reads the browser UI needs: the list of sObject
//! names in an org, and the field-name → field-type map of one sObject.
//! Both are fetched fresh on every call; nothing is cached.

pub mod client;
pub mod error;
pub mod types;

pub use client::{Crm, CrmAccess, RestCrm, API_VERSION};
pub use error::CrmError;
