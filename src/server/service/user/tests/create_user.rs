use super::*;

/// Expect a supervisor to create a PADRAO user with a verifiable password and audit entry
#[tokio::test]
async fn supervisor_creates_user() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let sector = test.user().insert_sector("TI").await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;

    let user_service = UserService::new(&test.db);
    let result = user_service
        .create_user(
            &supervisor,
            new_user(" Maria@Example.com ", Hierarchy::Padrao, Some(sector.id)),
        )
        .await;

    assert!(result.is_ok());
    let created = result.unwrap();
    assert_eq!(created.email, "maria@example.com");
    assert_eq!(created.balance_cents, 0);

    let stored = UserRepository::new(&test.db)
        .get_by_id(created.id)
        .await?
        .unwrap();
    assert!(crate::server::service::auth::verify_password(
        "longenough",
        &stored.password_hash
    ));

    let logs = AuditRepository::new(&test.db)
        .list(Some(ActionType::UserCreate), 10)
        .await?;
    assert_eq!(logs.len(), 1);

    Ok(())
}

/// Expect PADRAO users to be refused
#[tokio::test]
async fn padrao_cannot_create_users() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let actor = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, None)
        .await?;

    let result = UserService::new(&test.db)
        .create_user(&actor, new_user("bob@example.com", Hierarchy::Padrao, None))
        .await;

    assert!(matches!(
        result,
        Err(Error::AuthError(AuthError::PermissionDenied(_)))
    ));

    Ok(())
}

/// Expect only SUPERADMIN to create SUPERADMIN users
#[tokio::test]
async fn superadmin_creation_is_restricted() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, None)
        .await?;
    let root = test
        .user()
        .insert_user("root@example.com", Hierarchy::Superadmin, None)
        .await?;
    let user_service = UserService::new(&test.db);

    let denied = user_service
        .create_user(&admin, new_user("x@example.com", Hierarchy::Superadmin, None))
        .await;
    assert!(matches!(
        denied,
        Err(Error::AuthError(AuthError::PermissionDenied(_)))
    ));

    let allowed = user_service
        .create_user(&root, new_user("x@example.com", Hierarchy::Superadmin, None))
        .await;
    assert!(allowed.is_ok());

    Ok(())
}

/// Expect duplicate emails and short passwords to be rejected as bad input
#[tokio::test]
async fn validates_input() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let root = test
        .user()
        .insert_user("root@example.com", Hierarchy::Superadmin, None)
        .await?;
    let user_service = UserService::new(&test.db);

    let duplicate = user_service
        .create_user(&root, new_user("root@example.com", Hierarchy::Padrao, None))
        .await;
    assert!(matches!(
        duplicate,
        Err(Error::UserError(UserError::EmailTaken(_)))
    ));

    let mut short = new_user("new@example.com", Hierarchy::Padrao, None);
    short.password = "short".to_string();
    let short = user_service.create_user(&root, short).await;
    assert!(matches!(
        short,
        Err(Error::UserError(UserError::InvalidInput(_)))
    ));

    let missing_sector = user_service
        .create_user(&root, new_user("new@example.com", Hierarchy::Padrao, Some(99)))
        .await;
    assert!(matches!(
        missing_sector,
        Err(Error::UserError(UserError::SectorNotFound(99)))
    ));

    Ok(())
}

/// Expect supervisors to only see their own sector when listing users
#[tokio::test]
async fn supervisor_list_is_sector_scoped() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_user_tables().build().await?;
    let ti = test.user().insert_sector("TI").await?;
    let rh = test.user().insert_sector("RH").await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(ti.id))
        .await?;
    test.user()
        .insert_user("rh@example.com", Hierarchy::Padrao, Some(rh.id))
        .await?;

    let users = UserService::new(&test.db)
        .list_users(&supervisor, Some(rh.id))
        .await;

    assert!(users.is_ok_and(|users| users.iter().all(|user| user.sector_id == Some(ti.id))));

    Ok(())
}
