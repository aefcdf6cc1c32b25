//! # API Route Modules
//!
//! - `crossings`: crossing lifecycle: create, list, register entry,
//!   upload documents, authorize exit.
//! - `documents`: document inspection, patch, deletion, anomaly reports.
//! - `anomalies`: administrator anomaly listing and deletion.
//! - `persons`: traveler registration and face search.
//! - `toll_offices`: border checkpoints.
//! - `required_documents`: entry-document links by country.
//! - `traffic`: road traffic between two countries.

pub mod anomalies;
pub mod crossings;
pub mod documents;
pub mod persons;
pub mod required_documents;
pub mod toll_offices;
pub mod traffic;
