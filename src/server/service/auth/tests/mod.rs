
use chamados_test_utils::prelude::*;
use entity::sea_orm_active_enums::Hierarchy;

use super::*;
