use super::*;

/// Expect a credit adjustment to update the balance, ledger and audit trail
#[tokio::test]
async fn adjusts_credits() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let sector = test.user().insert_sector("Loja").await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(sector.id))
        .await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(sector.id))
        .await?;

    let notifier = Notifier::new();
    let result = PrizeService::new(&test.db, &notifier)
        .adjust_credits(
            &supervisor,
            AdjustCreditsDto {
                user_id: user.id,
                amount_cents: 2_550,
                description: "Meta de outubro".to_string(),
            },
        )
        .await;

    assert!(result.is_ok());
    let transaction = result.unwrap();
    assert_eq!(transaction.transaction_type, TransactionType::Credit);
    assert_eq!(transaction.created_by, Some(supervisor.id));

    let user = UserRepository::new(&test.db).get_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance_cents, 2_550);

    let audit = AuditRepository::new(&test.db)
        .list(Some(ActionType::CsChange), 10)
        .await?;
    assert_eq!(audit.len(), 1);
    assert!(audit[0].description.contains("C$ 0,00 to C$ 25,50"));

    Ok(())
}

/// Expect a debit below zero to be refused and leave the balance alone
#[tokio::test]
async fn balance_never_negative() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 1_000)
        .await?;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, None)
        .await?;

    let notifier = Notifier::new();
    let result = PrizeService::new(&test.db, &notifier)
        .adjust_credits(
            &admin,
            AdjustCreditsDto {
                user_id: user.id,
                amount_cents: -1_001,
                description: "Correção".to_string(),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::PrizeError(PrizeError::NegativeBalance { .. }))
    ));
    let user = UserRepository::new(&test.db).get_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance_cents, 1_000);

    Ok(())
}

/// Expect PADRAO users and supervisors of other sectors to be refused
#[tokio::test]
async fn adjustment_permissions() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let loja = test.user().insert_sector("Loja").await?;
    let estoque = test.user().insert_sector("Estoque").await?;
    let user = test
        .user()
        .insert_user("ana@example.com", Hierarchy::Padrao, Some(loja.id))
        .await?;
    let outsider = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, Some(estoque.id))
        .await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);
    let request = || AdjustCreditsDto {
        user_id: user.id,
        amount_cents: 100,
        description: "Bonus".to_string(),
    };

    assert!(matches!(
        prize_service.adjust_credits(&user, request()).await,
        Err(Error::AuthError(_))
    ));
    assert!(matches!(
        prize_service.adjust_credits(&outsider, request()).await,
        Err(Error::AuthError(_))
    ));

    Ok(())
}

/// Expect amounts to render with two decimals and a sign
#[test]
fn formats_credits() {
    assert_eq!(format_credits(0), "C$ 0,00");
    assert_eq!(format_credits(2_550), "C$ 25,50");
    assert_eq!(format_credits(-5), "-C$ 0,05");
}

/// Expect a credit past the largest representable balance to be refused, not wrapped
#[tokio::test]
async fn credit_overflow_is_refused() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 1_000)
        .await?;
    let admin = test
        .user()
        .insert_user("adm@example.com", Hierarchy::Administrativo, None)
        .await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);

    let result = prize_service
        .adjust_credits(
            &admin,
            AdjustCreditsDto {
                user_id: user.id,
                amount_cents: i64::MAX,
                description: "Correção".to_string(),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::PrizeError(PrizeError::InvalidAmount(_)))
    ));

    let user = UserRepository::new(&test.db).get_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance_cents, 1_000);
    assert!(AuditRepository::new(&test.db)
        .list(Some(ActionType::CsChange), 10)
        .await?
        .is_empty());

    Ok(())
}
