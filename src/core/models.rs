//! Wire types for the Rainforest API.
//!
//! Field names follow the API's snake_case JSON. Optional fields are skipped
//! when serializing so request bodies only carry what the user supplied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Listable Resources
// =============================================================================

/// A resource kind with its own listing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Sites,
    Environments,
    Folders,
    Filters,
    Browsers,
    Features,
    RunGroups,
}

impl ResourceKind {
    /// All listable kinds, in help order.
    pub const ALL: &'static [Self] = &[
        Self::Sites,
        Self::Environments,
        Self::Folders,
        Self::Filters,
        Self::Browsers,
        Self::Features,
        Self::RunGroups,
    ];

    /// Subcommand name that lists this kind.
    #[must_use]
    pub const fn command_name(self) -> &'static str {
        match self {
            Self::Sites => "sites",
            Self::Environments => "environments",
            Self::Folders => "folders",
            Self::Filters => "filters",
            Self::Browsers => "browsers",
            Self::Features => "features",
            Self::RunGroups => "run-groups",
        }
    }

    /// API path relative to the base URL.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Sites => "sites",
            Self::Environments => "environments",
            Self::Folders => "folders",
            Self::Filters => "filters",
            Self::Browsers => "browsers",
            Self::Features => "features",
            Self::RunGroups => "run_groups",
        }
    }

    /// Look up a kind by subcommand name.
    #[must_use]
    pub fn from_command(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.command_name() == name)
    }
}

/// A row from one of the listing endpoints.
///
/// Different endpoints label their rows differently; `label` picks the first
/// one present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource {
    /// Display label for the row.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}

// =============================================================================
// Runs
// =============================================================================

/// Which tests a run covers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TestSelection {
    /// Explicit test ids.
    Ids(Vec<i64>),
    /// A keyword such as `all`.
    Keyword(String),
}

/// Body of `POST runs`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestSelection>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rfml_ids: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_folder_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_group_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_id: Option<i64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub browsers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowd: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
}

/// Progress counters reported while a run executes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunProgress {
    pub percent: u32,
    pub total: u32,
    pub complete: u32,
    pub passed: u32,
    pub failed: u32,
    pub no_result: u32,
}

/// A run as returned by `POST runs` and `GET runs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Run {
    pub id: i64,

    #[serde(default)]
    pub state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_progress: Option<RunProgress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Run {
    /// States after which a run no longer changes.
    pub const TERMINAL_STATES: &'static [&'static str] =
        &["complete", "aborted", "error", "validation_failed"];

    /// Whether the run has finished, successfully or not.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL_STATES.contains(&self.state.as_str())
    }

    /// Whether the run finished with a passing result.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result.as_deref() == Some("passed")
    }

    /// Result if known, otherwise the state.
    #[must_use]
    pub fn outcome(&self) -> &str {
        self.result.as_deref().unwrap_or(&self.state)
    }
}

/// Per-test result inside a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunTest {
    pub id: i64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub result: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RunTest {
    /// Whether the test failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.result == "failed"
    }

    /// Wall time between creation and last update, in seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        match (self.created_at, self.updated_at) {
            #[allow(clippy::cast_precision_loss)]
            (Some(start), Some(end)) if end >= start => {
                (end - start).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

/// Mapping of a remote test id to its RFML id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestIdMapping {
    pub id: i64,
    pub rfml_id: String,
}

/// Summary row from `GET tests`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestSummary {
    pub id: i64,

    #[serde(default)]
    pub rfml_id: Option<String>,

    #[serde(default)]
    pub title: String,
}

/// Filters for `GET tests`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFilters {
    pub tags: Vec<String>,
    pub site_id: Option<i64>,
    pub smart_folder_id: Option<i64>,
}

impl TestFilters {
    /// Query pairs for the request URL.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        if let Some(site_id) = self.site_id {
            pairs.push(("site_id", site_id.to_string()));
        }
        if let Some(folder) = self.smart_folder_id {
            pairs.push(("smart_folder_id", folder.to_string()));
        }
        pairs
    }
}

// =============================================================================
// Tabular Variables
// =============================================================================

/// A column of a tabular variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratorColumn {
    pub id: i64,
    pub name: String,
}

/// A server-side tabular variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Generator {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub columns: Vec<GeneratorColumn>,
}

/// Body of `POST generators`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewGenerator {
    pub name: String,
    pub description: String,
    pub columns: Vec<String>,
}

// =============================================================================
// Mobile Apps
// =============================================================================

/// Response of the mobile presign endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MobilePresign {
    /// Where to `PUT` the app binary.
    pub url: String,
    /// Value to confirm the upload with.
    pub mobile_app_url: String,
}

/// Body confirming an uploaded app.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MobileAppConfirmation {
    pub app_slot: i64,
    pub mobile_app_url: String,
}

// =============================================================================
// Releases
// =============================================================================

/// Release manifest for the update check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub version: String,

    #[serde(default)]
    pub url: Option<String>,
}
