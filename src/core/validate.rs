//! Purpose: Serializable report of drift tolerated during lenient binds.
//! Exports: `DriftReport`, `DriftStatus`, `DriftIssue`, `DriftCode`.
//! Role: Shared contract for CLI diagnostics and callers that monitor provider drift.
//! Invariants: Reports are additive-only; issues carry a JSON path, never payload bodies.
//! Invariants: A strict bind never produces issues; it fails instead.
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    Clean,
    Drifted,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftCode {
    UnknownField,
    MissingField,
    UnknownEnumValue,
    UnknownFlagBits,
}

impl DriftCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DriftCode::UnknownField => "unknown_field",
            DriftCode::MissingField => "missing_field",
            DriftCode::UnknownEnumValue => "unknown_enum_value",
            DriftCode::UnknownFlagBits => "unknown_flag_bits",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DriftIssue {
    pub code: DriftCode,
    pub path: String,
    pub model: String,
    pub detail: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DriftReport {
    pub model: String,
    pub status: DriftStatus,
    pub issue_count: usize,
    pub issues: Vec<DriftIssue>,
}

impl DriftReport {
    pub fn clean(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            status: DriftStatus::Clean,
            issue_count: 0,
            issues: Vec::new(),
        }
    }

    pub fn set_issues(mut self, issues: Vec<DriftIssue>) -> Self {
        self.issue_count = issues.len();
        self.issues = issues;
        self.status = if self.issue_count == 0 {
            DriftStatus::Clean
        } else {
            DriftStatus::Drifted
        };
        self
    }

    pub fn is_clean(&self) -> bool {
        self.status == DriftStatus::Clean
    }

    pub fn count(&self, code: DriftCode) -> usize {
        self.issues.iter().filter(|issue| issue.code == code).count()
    }
}
