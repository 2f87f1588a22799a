use crate::domain::values::priority::Priority;
use crate::domain::values::step_status::StepStatus;
use crate::domain::values::trade_kind::TradeKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed confirmation workflow, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    TradeCapture,
    TradeValidation,
    KycCheck,
    ConfirmationDrafting,
    MakerReview,
    CheckerReview,
    QaApproval,
    SendToClient,
    ClientMatching,
    ClientSignature,
    BreakResolution,
    SettlementInstruction,
}

impl StepKind {
    pub const ALL: [StepKind; 12] = [
        StepKind::TradeCapture,
        StepKind::TradeValidation,
        StepKind::KycCheck,
        StepKind::ConfirmationDrafting,
        StepKind::MakerReview,
        StepKind::CheckerReview,
        StepKind::QaApproval,
        StepKind::SendToClient,
        StepKind::ClientMatching,
        StepKind::ClientSignature,
        StepKind::BreakResolution,
        StepKind::SettlementInstruction,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            StepKind::TradeCapture => "trade-capture",
            StepKind::TradeValidation => "trade-validation",
            StepKind::KycCheck => "kyc-check",
            StepKind::ConfirmationDrafting => "confirmation-drafting",
            StepKind::MakerReview => "maker-review",
            StepKind::CheckerReview => "checker-review",
            StepKind::QaApproval => "qa-approval",
            StepKind::SendToClient => "send-to-client",
            StepKind::ClientMatching => "client-matching",
            StepKind::ClientSignature => "client-signature",
            StepKind::BreakResolution => "break-resolution",
            StepKind::SettlementInstruction => "settlement-instruction",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StepKind::TradeCapture => "Trade Capture",
            StepKind::TradeValidation => "Trade Validation",
            StepKind::KycCheck => "KYC & Sanctions Check",
            StepKind::ConfirmationDrafting => "Confirmation Drafting",
            StepKind::MakerReview => "Maker Review",
            StepKind::CheckerReview => "Checker Review",
            StepKind::QaApproval => "QA Approval",
            StepKind::SendToClient => "Send to Client",
            StepKind::ClientMatching => "Client Matching",
            StepKind::ClientSignature => "Client Signature",
            StepKind::BreakResolution => "Break Resolution",
            StepKind::SettlementInstruction => "Settlement Instruction",
        }
    }

    pub fn assignee(&self) -> &'static str {
        match self {
            StepKind::TradeCapture => "Front Office",
            StepKind::TradeValidation
            | StepKind::ClientMatching
            | StepKind::BreakResolution => "Middle Office",
            StepKind::KycCheck => "Compliance",
            StepKind::ConfirmationDrafting | StepKind::MakerReview | StepKind::SendToClient => {
                "Confirmations Team"
            }
            StepKind::CheckerReview => "Confirmations Supervisor",
            StepKind::QaApproval => "Quality Assurance",
            StepKind::ClientSignature => "Client Services",
            StepKind::SettlementInstruction => "Settlements",
        }
    }

    pub fn position(&self) -> usize {
        StepKind::ALL.iter().position(|k| k == self).unwrap_or(0) + 1
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for StepKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| format!("Unknown workflow step: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: StepKind,
    pub name: String,
    pub status: StepStatus,
    pub assigned_to: String,
}

impl WorkflowStep {
    pub fn new(kind: StepKind, status: StepStatus) -> Self {
        Self {
            id: kind,
            name: kind.name().to_string(),
            status,
            assigned_to: kind.assignee().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeWorkflow {
    pub trade_id: String,
    pub trade_type: TradeKind,
    pub current_step: StepKind,
    pub priority: Priority,
    pub steps: Vec<WorkflowStep>,
}

impl TradeWorkflow {
    pub fn step(&self, kind: StepKind) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Review,
    Matching,
    Resolution,
    Escalation,
}

/// Something a person has to do, derived from a step that needs attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowAction {
    pub id: String,
    pub trade_id: String,
    pub step_id: StepKind,
    pub step_name: String,
    pub action_type: ActionType,
    pub description: String,
    pub assigned_to: String,
    pub due_at: DateTime<Utc>,
    pub priority: Priority,
}
