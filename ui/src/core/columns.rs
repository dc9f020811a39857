//! Fixed dictionary of known export columns.
//!
//! Task exports arrive with Portuguese display headers (`"Fechada em"`,
//! `"Já registradas h"`, ...). Each known header maps to one [`Field`] whose
//! canonical name is what the prepared table exposes. Canonical names map to
//! themselves, so renaming an already-normalized table is a no-op.

use serde::{Deserialize, Serialize};

/// How a known column is coerced during preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Label,
    Date,
    Number,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Board,
    Client,
    Group,
    Project,
    TaskId,
    TaskTitle,
    TaskType,
    Team,
    CostCenter,
    Assignee,
    SubtaskId,
    Task,
    Urgent,
    Priority,
    OpenedBy,
    CreatedAt,
    DesiredDelivery,
    EstimatedDelivery,
    ClosedAt,
    EstimatedHours,
    FirstEstimateHours,
    LoggedHours,
    LoggedSubtaskHours,
    PercentComplete,
    Stage,
    Phase,
    Reopened,
    Tags,
    ClientCode,
    RemainingHours,
}

impl Field {
    pub const ALL: [Field; 30] = [
        Field::Board,
        Field::Client,
        Field::Group,
        Field::Project,
        Field::TaskId,
        Field::TaskTitle,
        Field::TaskType,
        Field::Team,
        Field::CostCenter,
        Field::Assignee,
        Field::SubtaskId,
        Field::Task,
        Field::Urgent,
        Field::Priority,
        Field::OpenedBy,
        Field::CreatedAt,
        Field::DesiredDelivery,
        Field::EstimatedDelivery,
        Field::ClosedAt,
        Field::EstimatedHours,
        Field::FirstEstimateHours,
        Field::LoggedHours,
        Field::LoggedSubtaskHours,
        Field::PercentComplete,
        Field::Stage,
        Field::Phase,
        Field::Reopened,
        Field::Tags,
        Field::ClientCode,
        Field::RemainingHours,
    ];

    /// Header used by the task-tracking export.
    pub fn source_header(self) -> &'static str {
        match self {
            Field::Board => "Quadro",
            Field::Client => "Cliente",
            Field::Group => "Grupo",
            Field::Project => "Projeto",
            Field::TaskId => "ID da tarefa principal",
            Field::TaskTitle => "Título da tarefa principal",
            Field::TaskType => "Tipo de tarefa",
            Field::Team => "Equipe",
            Field::CostCenter => "Centro de custo",
            Field::Assignee => "Para",
            Field::SubtaskId => "ID da Tarefa",
            Field::Task => "Tarefa",
            Field::Urgent => "Urgente",
            Field::Priority => "Prioridade",
            Field::OpenedBy => "Aberta por",
            Field::CreatedAt => "Criada em",
            Field::DesiredDelivery => "Entrega desejada",
            Field::EstimatedDelivery => "Entrega estimada",
            Field::ClosedAt => "Fechada em",
            Field::EstimatedHours => "Esforço estimado h",
            Field::FirstEstimateHours => "Primeiro esforço estimado h",
            Field::LoggedHours => "Já registradas h",
            Field::LoggedSubtaskHours => "Já registradas em subtarefas",
            Field::PercentComplete => "%",
            Field::Stage => "Etapa",
            Field::Phase => "Fase",
            Field::Reopened => "Reaberta?",
            Field::Tags => "Tags",
            Field::ClientCode => "Código customizado de cliente",
            Field::RemainingHours => "Horas restantes h",
        }
    }

    /// Column name in the prepared table.
    pub fn canonical(self) -> &'static str {
        match self {
            Field::Board => "board",
            Field::Client => "client",
            Field::Group => "group",
            Field::Project => "project",
            Field::TaskId => "task_id",
            Field::TaskTitle => "task_title",
            Field::TaskType => "task_type",
            Field::Team => "team",
            Field::CostCenter => "cost_center",
            Field::Assignee => "assignee",
            Field::SubtaskId => "subtask_id",
            Field::Task => "task",
            Field::Urgent => "urgent",
            Field::Priority => "priority",
            Field::OpenedBy => "opened_by",
            Field::CreatedAt => "created_at",
            Field::DesiredDelivery => "desired_delivery",
            Field::EstimatedDelivery => "estimated_delivery",
            Field::ClosedAt => "closed_at",
            Field::EstimatedHours => "estimated_hours",
            Field::FirstEstimateHours => "first_estimate_hours",
            Field::LoggedHours => "logged_hours",
            Field::LoggedSubtaskHours => "logged_subtask_hours",
            Field::PercentComplete => "percent_complete",
            Field::Stage => "stage",
            Field::Phase => "phase",
            Field::Reopened => "reopened",
            Field::Tags => "tags",
            Field::ClientCode => "client_code",
            Field::RemainingHours => "remaining_hours",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::CreatedAt | Field::DesiredDelivery | Field::EstimatedDelivery | Field::ClosedAt => {
                FieldKind::Date
            }
            Field::EstimatedHours
            | Field::FirstEstimateHours
            | Field::LoggedHours
            | Field::LoggedSubtaskHours
            | Field::PercentComplete
            | Field::RemainingHours => FieldKind::Number,
            Field::Urgent | Field::Reopened => FieldKind::Flag,
            _ => FieldKind::Label,
        }
    }

    /// Resolve an already-trimmed column name, accepting both the export
    /// header and the canonical name.
    pub fn lookup(name: &str) -> Option<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.source_header() == name || field.canonical() == name)
    }
}

/// Rename a single column: trim, then map known headers to canonical names.
pub fn canonical_name(raw: &str) -> String {
    let trimmed = raw.trim();
    match Field::lookup(trimmed) {
        Some(field) => field.canonical().to_string(),
        None => trimmed.to_string(),
    }
}
