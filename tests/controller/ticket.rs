use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chamados::{
    model::ticket::CreateTicketDto,
    server::{controller::ticket::create_ticket, model::session::user::SessionUserId},
};
use entity::sea_orm_active_enums::{Hierarchy, TicketStatus};
use sea_orm::EntityTrait;

use super::*;

fn request(sector_id: i32, category_id: i32) -> Json<CreateTicketDto> {
    Json(CreateTicketDto {
        title: "Broken badge reader".to_string(),
        description: "The reader at the main entrance rejects every badge".to_string(),
        sector_id,
        category_id,
        priority: None,
    })
}

/// Expect 201 and an open ticket stored for the logged in user
#[tokio::test]
async fn creates_ticket() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = create_ticket(
        State(test.into_app_state()),
        test.session.clone(),
        request(sector.id, category.id),
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().into_response().status(), StatusCode::CREATED);

    let tickets = entity::prelude::Ticket::find().all(&test.db).await?;
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].status, TicketStatus::Aberto);
    assert_eq!(tickets[0].created_by, user.id);

    Ok(())
}

/// Expect 400 when the category belongs to another sector
#[tokio::test]
async fn rejects_category_from_other_sector() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let it = test.user().insert_sector("TI").await?;
    let hr = test.user().insert_sector("RH").await?;
    let category = test.ticket().insert_category(hr.id, "Payroll").await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(it.id))
        .await?;
    SessionUserId::insert(&test.session, user.id).await.unwrap();

    let result = create_ticket(
        State(test.into_app_state()),
        test.session.clone(),
        request(it.id, category.id),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::BAD_REQUEST
    );
    assert!(entity::prelude::Ticket::find().all(&test.db).await?.is_empty());

    Ok(())
}

/// Expect 401 when nobody is logged in
#[tokio::test]
async fn requires_login() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_all_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    let category = test.ticket().insert_category(sector.id, "Hardware").await?;

    let result = create_ticket(
        State(test.into_app_state()),
        test.session.clone(),
        request(sector.id, category.id),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(
        result.err().unwrap().into_response().status(),
        StatusCode::UNAUTHORIZED
    );

    Ok(())
}
