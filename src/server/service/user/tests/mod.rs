mod create_user;

use chamados_test_utils::prelude::*;

use super::*;

fn new_user(email: &str, hierarchy: Hierarchy, sector_id: Option<i32>) -> CreateUserDto {
    CreateUserDto {
        email: email.to_string(),
        password: "longenough".to_string(),
        first_name: "Maria".to_string(),
        last_name: "Silva".to_string(),
        hierarchy,
        sector_id,
    }
}
