use chrono::{NaiveDate, Utc};
use entity::sea_orm_active_enums::{AssignmentPeriod, ScheduleType};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct NewAssignment {
    pub template_id: i32,
    pub assigned_to: i32,
    pub assigned_by: i32,
    pub schedule_type: ScheduleType,
    /// JSON array of `YYYY-MM-DD` strings
    pub custom_dates: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period: AssignmentPeriod,
}

pub struct AssignmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AssignmentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        assignment: NewAssignment,
    ) -> Result<entity::checklist_assignment::Model, DbErr> {
        let assignment = entity::checklist_assignment::ActiveModel {
            template_id: ActiveValue::Set(assignment.template_id),
            assigned_to: ActiveValue::Set(assignment.assigned_to),
            assigned_by: ActiveValue::Set(assignment.assigned_by),
            schedule_type: ActiveValue::Set(assignment.schedule_type),
            custom_dates: ActiveValue::Set(assignment.custom_dates),
            start_date: ActiveValue::Set(assignment.start_date),
            end_date: ActiveValue::Set(assignment.end_date),
            period: ActiveValue::Set(assignment.period),
            is_active: ActiveValue::Set(true),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        assignment.insert(self.db).await
    }

    pub async fn get_by_id(
        &self,
        assignment_id: i32,
    ) -> Result<Option<entity::checklist_assignment::Model>, DbErr> {
        entity::prelude::ChecklistAssignment::find_by_id(assignment_id)
            .one(self.db)
            .await
    }

    /// Active assignments whose date range contains `date`
    pub async fn list_active_on(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<entity::checklist_assignment::Model>, DbErr> {
        entity::prelude::ChecklistAssignment::find()
            .filter(entity::checklist_assignment::Column::IsActive.eq(true))
            .filter(entity::checklist_assignment::Column::StartDate.lte(date))
            .filter(entity::checklist_assignment::Column::EndDate.gte(date))
            .order_by_asc(entity::checklist_assignment::Column::Id)
            .all(self.db)
            .await
    }
}
