use crate::domain::entities::trade::Trade;
use crate::domain::entities::workflow::{ActionType, StepKind, TradeWorkflow, WorkflowAction, WorkflowStep};
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::priority::Priority;
use crate::domain::values::step_status::StepStatus;
use chrono::{DateTime, Duration, Utc};

/// How an FX trade gets matched with the client. Equity trades have no method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matching {
    Electronic,
    Manual,
    NotApplicable,
}

fn matching(trade: &Trade) -> Matching {
    match trade {
        Trade::Fx(t) if t.is_electronic_confirmation() => Matching::Electronic,
        Trade::Fx(_) => Matching::Manual,
        Trade::Equity(_) => Matching::NotApplicable,
    }
}

fn step_status(kind: StepKind, status: ConfirmationStatus, matching: Matching, sent: bool) -> StepStatus {
    use StepStatus::*;
    let pos = kind.position();
    match status {
        ConfirmationStatus::Settled => Completed,
        ConfirmationStatus::Confirmed => match kind {
            StepKind::SettlementInstruction if sent => Completed,
            StepKind::SettlementInstruction => InProgress,
            _ => Completed,
        },
        ConfirmationStatus::Pending => match kind {
            _ if pos <= 5 => Completed,
            StepKind::CheckerReview => RequiresAction,
            StepKind::ClientMatching => match matching {
                Matching::Electronic => InProgress,
                Matching::Manual => RequiresAction,
                Matching::NotApplicable => Pending,
            },
            StepKind::ClientSignature if matching == Matching::Electronic => Completed,
            _ => Pending,
        },
        ConfirmationStatus::Failed | ConfirmationStatus::Disputed => match kind {
            _ if pos <= 6 => Completed,
            StepKind::QaApproval => Failed,
            StepKind::ClientMatching if matching == Matching::Manual => RequiresAction,
            StepKind::ClientSignature if matching == Matching::Electronic => Completed,
            StepKind::BreakResolution => RequiresAction,
            _ => Pending,
        },
    }
}

fn current_step(status: ConfirmationStatus) -> StepKind {
    match status {
        ConfirmationStatus::Pending => StepKind::CheckerReview,
        ConfirmationStatus::Failed | ConfirmationStatus::Disputed => StepKind::BreakResolution,
        ConfirmationStatus::Confirmed | ConfirmationStatus::Settled => StepKind::SettlementInstruction,
    }
}

fn priority(trade: &Trade) -> Priority {
    match trade {
        Trade::Equity(t) => {
            let by_value = if t.trade_value > 5_000_000.0 {
                Priority::Urgent
            } else if t.trade_value > 1_000_000.0 {
                Priority::High
            } else if t.trade_value > 100_000.0 {
                Priority::Medium
            } else {
                Priority::Low
            };
            if t.confirmation_status == ConfirmationStatus::Failed {
                by_value.max(Priority::High)
            } else {
                by_value
            }
        }
        Trade::Fx(t) => {
            if t.confirmation_status == ConfirmationStatus::Disputed {
                Priority::Urgent
            } else if t.amendment_flag {
                Priority::High
            } else if t.confirmation_status == ConfirmationStatus::Pending {
                Priority::Medium
            } else {
                Priority::Low
            }
        }
    }
}

/// Projects a trade onto the twelve-step confirmation workflow.
pub fn derive_workflow(trade: &Trade) -> TradeWorkflow {
    let status = trade.confirmation_status();
    let matching = matching(trade);
    let sent = trade.sent_to_settlements();
    TradeWorkflow {
        trade_id: trade.trade_id().to_string(),
        trade_type: trade.kind(),
        current_step: current_step(status),
        priority: priority(trade),
        steps: StepKind::ALL
            .into_iter()
            .map(|kind| WorkflowStep::new(kind, step_status(kind, status, matching, sent)))
            .collect(),
    }
}

fn action_for(kind: StepKind) -> (ActionType, Duration) {
    match kind {
        StepKind::CheckerReview => (ActionType::Review, Duration::hours(4)),
        StepKind::ClientMatching => (ActionType::Matching, Duration::hours(12)),
        StepKind::BreakResolution => (ActionType::Resolution, Duration::days(1)),
        _ => (ActionType::Review, Duration::days(1)),
    }
}

/// One action per step that needs attention: `requires-action` steps inherit the
/// workflow priority, `failed` steps escalate as urgent.
pub fn generate_actions(workflows: &[TradeWorkflow], now: DateTime<Utc>) -> Vec<WorkflowAction> {
    let mut actions = Vec::new();
    for wf in workflows {
        for step in &wf.steps {
            let (action_type, due_in, priority, description) = match step.status {
                StepStatus::RequiresAction => {
                    let (action_type, due_in) = action_for(step.id);
                    let description = format!("{} required for trade {}", step.name, wf.trade_id);
                    (action_type, due_in, wf.priority, description)
                }
                StepStatus::Failed => (
                    ActionType::Escalation,
                    Duration::hours(2),
                    Priority::Urgent,
                    format!("{} failed for trade {}; escalate", step.name, wf.trade_id),
                ),
                _ => continue,
            };
            actions.push(WorkflowAction {
                id: format!("{}:{}", wf.trade_id, step.id),
                trade_id: wf.trade_id.clone(),
                step_id: step.id,
                step_name: step.name.clone(),
                action_type,
                description,
                assigned_to: step.assigned_to.clone(),
                due_at: now + due_in,
                priority,
            });
        }
    }
    actions
}
