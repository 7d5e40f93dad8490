use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::Hierarchy;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String)]
    pub hierarchy: Hierarchy,
    pub sector_id: Option<i32>,
    /// Credit balance in cents of C$
    pub balance_cents: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl From<entity::app_user::Model> for UserDto {
    fn from(user: entity::app_user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            hierarchy: user.hierarchy,
            sector_id: user.sector_id,
            balance_cents: user.balance_cents,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String)]
    pub hierarchy: Hierarchy,
    pub sector_id: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SectorDto {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl From<entity::sector::Model> for SectorDto {
    fn from(sector: entity::sector::Model) -> Self {
        Self {
            id: sector.id,
            name: sector.name,
            description: sector.description,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSectorDto {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Only users of this sector
    pub sector_id: Option<i32>,
}
