use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261016_000001_sector_user::{AppUser, Sector};

static IDX_CHECKLIST_EXECUTION_UNIQUE: &str = "idx-checklist_execution-assignment_date_period";
static IDX_CHECKLIST_TASK_EXECUTION_UNIQUE: &str = "idx-checklist_task_execution-execution_task";
static FK_CHECKLIST_TEMPLATE_SECTOR_ID: &str = "fk-checklist_template-sector_id";
static FK_CHECKLIST_TEMPLATE_CREATED_BY: &str = "fk-checklist_template-created_by";
static FK_CHECKLIST_TASK_TEMPLATE_ID: &str = "fk-checklist_task-template_id";
static FK_CHECKLIST_ASSIGNMENT_TEMPLATE_ID: &str = "fk-checklist_assignment-template_id";
static FK_CHECKLIST_ASSIGNMENT_ASSIGNED_TO: &str = "fk-checklist_assignment-assigned_to";
static FK_CHECKLIST_ASSIGNMENT_ASSIGNED_BY: &str = "fk-checklist_assignment-assigned_by";
static FK_CHECKLIST_EXECUTION_ASSIGNMENT_ID: &str = "fk-checklist_execution-assignment_id";
static FK_CHECKLIST_EXECUTION_APPROVED_BY: &str = "fk-checklist_execution-approved_by";
static FK_CHECKLIST_TASK_EXECUTION_EXECUTION_ID: &str = "fk-checklist_task_execution-execution_id";
static FK_CHECKLIST_TASK_EXECUTION_TASK_ID: &str = "fk-checklist_task_execution-task_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChecklistTemplate::Table)
                    .if_not_exists()
                    .col(pk_auto(ChecklistTemplate::Id))
                    .col(string(ChecklistTemplate::Name))
                    .col(text(ChecklistTemplate::Description))
                    .col(integer(ChecklistTemplate::SectorId))
                    .col(integer(ChecklistTemplate::CreatedBy))
                    .col(boolean(ChecklistTemplate::IsActive).default(true))
                    .col(timestamp(ChecklistTemplate::CreatedAt))
                    .col(timestamp(ChecklistTemplate::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_TEMPLATE_SECTOR_ID)
                            .from(ChecklistTemplate::Table, ChecklistTemplate::SectorId)
                            .to(Sector::Table, Sector::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_TEMPLATE_CREATED_BY)
                            .from(ChecklistTemplate::Table, ChecklistTemplate::CreatedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChecklistTask::Table)
                    .if_not_exists()
                    .col(pk_auto(ChecklistTask::Id))
                    .col(integer(ChecklistTask::TemplateId))
                    .col(string(ChecklistTask::Title))
                    .col(text(ChecklistTask::Description))
                    .col(integer(ChecklistTask::SortOrder).default(0))
                    .col(boolean(ChecklistTask::IsRequired).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_TASK_TEMPLATE_ID)
                            .from(ChecklistTask::Table, ChecklistTask::TemplateId)
                            .to(ChecklistTemplate::Table, ChecklistTemplate::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChecklistAssignment::Table)
                    .if_not_exists()
                    .col(pk_auto(ChecklistAssignment::Id))
                    .col(integer(ChecklistAssignment::TemplateId))
                    .col(integer(ChecklistAssignment::AssignedTo))
                    .col(integer(ChecklistAssignment::AssignedBy))
                    .col(string_len(ChecklistAssignment::ScheduleType, 20))
                    .col(text(ChecklistAssignment::CustomDates))
                    .col(date(ChecklistAssignment::StartDate))
                    .col(date(ChecklistAssignment::EndDate))
                    .col(string_len(ChecklistAssignment::Period, 10))
                    .col(boolean(ChecklistAssignment::IsActive).default(true))
                    .col(timestamp(ChecklistAssignment::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_ASSIGNMENT_TEMPLATE_ID)
                            .from(ChecklistAssignment::Table, ChecklistAssignment::TemplateId)
                            .to(ChecklistTemplate::Table, ChecklistTemplate::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_ASSIGNMENT_ASSIGNED_TO)
                            .from(ChecklistAssignment::Table, ChecklistAssignment::AssignedTo)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_ASSIGNMENT_ASSIGNED_BY)
                            .from(ChecklistAssignment::Table, ChecklistAssignment::AssignedBy)
                            .to(AppUser::Table, AppUser::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChecklistExecution::Table)
                    .if_not_exists()
                    .col(pk_auto(ChecklistExecution::Id))
                    .col(integer(ChecklistExecution::AssignmentId))
                    .col(date(ChecklistExecution::ExecutionDate))
                    .col(string_len(ChecklistExecution::Period, 10))
                    .col(string_len(ChecklistExecution::Status, 20))
                    .col(timestamp_null(ChecklistExecution::StartedAt))
                    .col(timestamp_null(ChecklistExecution::SubmittedAt))
                    .col(timestamp_null(ChecklistExecution::CompletedAt))
                    .col(integer_null(ChecklistExecution::ApprovedBy))
                    .col(timestamp_null(ChecklistExecution::ApprovedAt))
                    .col(text_null(ChecklistExecution::RejectionNote))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_EXECUTION_ASSIGNMENT_ID)
                            .from(ChecklistExecution::Table, ChecklistExecution::AssignmentId)
                            .to(ChecklistAssignment::Table, ChecklistAssignment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_EXECUTION_APPROVED_BY)
                            .from(ChecklistExecution::Table, ChecklistExecution::ApprovedBy)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHECKLIST_EXECUTION_UNIQUE)
                    .table(ChecklistExecution::Table)
                    .col(ChecklistExecution::AssignmentId)
                    .col(ChecklistExecution::ExecutionDate)
                    .col(ChecklistExecution::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChecklistTaskExecution::Table)
                    .if_not_exists()
                    .col(pk_auto(ChecklistTaskExecution::Id))
                    .col(integer(ChecklistTaskExecution::ExecutionId))
                    .col(integer(ChecklistTaskExecution::TaskId))
                    .col(boolean(ChecklistTaskExecution::IsCompleted).default(false))
                    .col(timestamp_null(ChecklistTaskExecution::CompletedAt))
                    .col(text(ChecklistTaskExecution::Notes))
                    .col(string_null(ChecklistTaskExecution::EvidenceImage))
                    .col(string_null(ChecklistTaskExecution::EvidenceVideo))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_TASK_EXECUTION_EXECUTION_ID)
                            .from(
                                ChecklistTaskExecution::Table,
                                ChecklistTaskExecution::ExecutionId,
                            )
                            .to(ChecklistExecution::Table, ChecklistExecution::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_CHECKLIST_TASK_EXECUTION_TASK_ID)
                            .from(ChecklistTaskExecution::Table, ChecklistTaskExecution::TaskId)
                            .to(ChecklistTask::Table, ChecklistTask::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_CHECKLIST_TASK_EXECUTION_UNIQUE)
                    .table(ChecklistTaskExecution::Table)
                    .col(ChecklistTaskExecution::ExecutionId)
                    .col(ChecklistTaskExecution::TaskId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChecklistTaskExecution::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ChecklistExecution::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ChecklistAssignment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ChecklistTask::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ChecklistTemplate::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ChecklistTemplate {
    Table,
    Id,
    Name,
    Description,
    SectorId,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ChecklistTask {
    Table,
    Id,
    TemplateId,
    Title,
    Description,
    SortOrder,
    IsRequired,
}

#[derive(DeriveIden)]
enum ChecklistAssignment {
    Table,
    Id,
    TemplateId,
    AssignedTo,
    AssignedBy,
    ScheduleType,
    CustomDates,
    StartDate,
    EndDate,
    Period,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ChecklistExecution {
    Table,
    Id,
    AssignmentId,
    ExecutionDate,
    Period,
    Status,
    StartedAt,
    SubmittedAt,
    CompletedAt,
    ApprovedBy,
    ApprovedAt,
    RejectionNote,
}

#[derive(DeriveIden)]
enum ChecklistTaskExecution {
    Table,
    Id,
    ExecutionId,
    TaskId,
    IsCompleted,
    CompletedAt,
    Notes,
    EvidenceImage,
    EvidenceVideo,
}
