use super::{lock, SharedConnection};
use crate::domain::entities::workflow::{StepKind, TradeWorkflow, WorkflowStep};
use crate::domain::error::DomainError;
use crate::domain::ports::workflow_repository::{StoredStep, StoredWorkflow, WorkflowRepository};
use crate::domain::values::priority::Priority;
use crate::domain::values::step_status::StepStatus;
use crate::domain::values::trade_kind::TradeKind;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use std::collections::HashMap;
use tracing::warn;

pub struct SqliteWorkflowRepo {
    conn: SharedConnection,
}

impl SqliteWorkflowRepo {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn row_to_step(row: &Row) -> Result<StoredStep, rusqlite::Error> {
        let step_id: String = row.get("step_id")?;
        let status: String = row.get("status")?;
        let kind = step_id.parse::<StepKind>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, e.into())
        })?;
        Ok(StoredStep {
            id: row.get("id")?,
            workflow_id: row.get("workflow_id")?,
            trade_id: row.get("trade_id")?,
            position: row.get::<_, i64>("position")? as usize,
            step: WorkflowStep {
                id: kind,
                name: row.get("name")?,
                status: status.parse().unwrap_or_else(|_| {
                    warn!(step = %kind, raw = %status, "invalid stored step status");
                    StepStatus::Pending
                }),
                assigned_to: row.get("assigned_to")?,
            },
        })
    }

    fn row_to_workflow(row: &Row) -> Result<StoredWorkflow, rusqlite::Error> {
        let conversion = |e: String| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, e.into())
        };
        let trade_type: String = row.get("trade_type")?;
        let current_step: String = row.get("current_step")?;
        let priority: String = row.get("priority")?;
        let created_at: String = row.get("created_at")?;
        Ok(StoredWorkflow {
            id: row.get("id")?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            workflow: TradeWorkflow {
                trade_id: row.get("trade_id")?,
                trade_type: trade_type.parse::<TradeKind>().map_err(conversion)?,
                current_step: current_step.parse::<StepKind>().map_err(conversion)?,
                priority: priority.parse::<Priority>().map_err(conversion)?,
                steps: Vec::new(),
            },
        })
    }
}

impl WorkflowRepository for SqliteWorkflowRepo {
    fn add_workflow(&self, workflow: &TradeWorkflow) -> Result<i64, DomainError> {
        let mut conn = lock(&self.conn)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO trade_workflows (trade_id, trade_type, current_step, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                workflow.trade_id,
                workflow.trade_type.to_string(),
                workflow.current_step.id(),
                workflow.priority.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add workflow for {}: {e}", workflow.trade_id)))?;
        let workflow_id = tx.last_insert_rowid();

        for step in &workflow.steps {
            tx.execute(
                "INSERT INTO workflow_steps (workflow_id, step_id, trade_id, position, name, status, assigned_to)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    workflow_id,
                    step.id.id(),
                    workflow.trade_id,
                    step.id.position() as i64,
                    step.name,
                    step.status.to_string(),
                    step.assigned_to,
                ],
            )
            .map_err(|e| DomainError::Database(format!("Failed to add step {}: {e}", step.id)))?;
        }
        tx.commit()?;
        Ok(workflow_id)
    }

    fn list_workflows(&self) -> Result<Vec<StoredWorkflow>, DomainError> {
        let mut workflows: Vec<StoredWorkflow> = {
            let conn = lock(&self.conn)?;
            let mut stmt = conn.prepare(
                "SELECT id, trade_id, trade_type, current_step, priority, created_at
                 FROM trade_workflows ORDER BY id",
            )?;
            let rows = stmt.query_map([], Self::row_to_workflow)?;
            rows.filter_map(|r| r.ok()).collect()
        };

        let mut steps_by_workflow: HashMap<i64, Vec<WorkflowStep>> = HashMap::new();
        for stored in self.list_steps()? {
            steps_by_workflow
                .entry(stored.workflow_id)
                .or_default()
                .push(stored.step);
        }
        for wf in &mut workflows {
            wf.workflow.steps = steps_by_workflow.remove(&wf.id).unwrap_or_default();
        }
        Ok(workflows)
    }

    fn list_steps(&self) -> Result<Vec<StoredStep>, DomainError> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT id, workflow_id, step_id, trade_id, position, name, status, assigned_to
             FROM workflow_steps ORDER BY workflow_id, position",
        )?;
        let steps = stmt
            .query_map([], Self::row_to_step)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(steps)
    }

    fn count_workflows(&self) -> Result<usize, DomainError> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM trade_workflows", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
