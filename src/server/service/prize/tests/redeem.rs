use super::*;

/// Expect redemption to debit the balance, take one item from stock and write the ledger
#[tokio::test]
async fn redeems_prize() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 5_000)
        .await?;
    let prize = test.prize().insert_prize("Vale cinema", 3_000, 2, false).await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);

    let result = prize_service.redeem(&user, prize.id).await;

    assert!(result.is_ok());
    let redemption = result.unwrap();
    assert_eq!(redemption.status, RedemptionStatus::Pendente);

    let user = UserRepository::new(&test.db).get_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance_cents, 2_000);
    let prize = PrizeRepository::new(&test.db).get_by_id(prize.id).await?.unwrap();
    assert_eq!(prize.stock, 1);

    let ledger = CreditTransactionRepository::new(&test.db)
        .list_for_user(user.id)
        .await?;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount_cents, -3_000);
    assert_eq!(ledger[0].transaction_type, TransactionType::Redemption);
    assert_eq!(ledger[0].redemption_id, Some(redemption.id));

    let audit = AuditRepository::new(&test.db)
        .list(Some(ActionType::PrizeRedeem), 10)
        .await?;
    assert_eq!(audit.len(), 1);

    Ok(())
}

/// Expect insufficient balance and empty stock to be refused without side effects
#[tokio::test]
async fn refuses_unaffordable_or_unavailable() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 1_000)
        .await?;
    let expensive = test.prize().insert_prize("Bicicleta", 50_000, 1, false).await?;
    let sold_out = test.prize().insert_prize("Caneca", 500, 0, false).await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);

    assert!(matches!(
        prize_service.redeem(&user, expensive.id).await,
        Err(Error::PrizeError(PrizeError::InsufficientBalance {
            balance: 1_000,
            required: 50_000
        }))
    ));
    assert!(matches!(
        prize_service.redeem(&user, sold_out.id).await,
        Err(Error::PrizeError(PrizeError::Unavailable(_)))
    ));

    let user = UserRepository::new(&test.db).get_by_id(user.id).await?.unwrap();
    assert_eq!(user.balance_cents, 1_000);
    assert!(CreditTransactionRepository::new(&test.db)
        .list_for_user(user.id)
        .await?
        .is_empty());

    Ok(())
}

/// Expect unlimited prizes to stay available regardless of stock
#[tokio::test]
async fn unlimited_stock_is_untouched() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 1_000)
        .await?;
    let prize = test.prize().insert_prize("Folga", 500, 0, true).await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);

    assert!(prize_service.redeem(&user, prize.id).await.is_ok());
    assert!(prize_service.redeem(&user, prize.id).await.is_ok());

    let prize = PrizeRepository::new(&test.db).get_by_id(prize.id).await?.unwrap();
    assert_eq!(prize.stock, 0);

    Ok(())
}

/// Expect cancelling to refund the balance and restore stock, once
#[tokio::test]
async fn cancellation_refunds() -> Result<(), TestError> {
    let mut test = TestBuilder::new().with_prize_tables().build().await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 3_000)
        .await?;
    let other = test
        .user()
        .insert_user("bob@example.com", Hierarchy::Padrao, None)
        .await?;
    let prize = test.prize().insert_prize("Vale cinema", 3_000, 1, false).await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);
    let redemption = prize_service.redeem(&user, prize.id).await;
    assert!(redemption.is_ok());
    let redemption = redemption.unwrap();

    assert!(matches!(
        prize_service.cancel_redemption(&other, redemption.id).await,
        Err(Error::PrizeError(PrizeError::NotOwner))
    ));

    let cancelled = prize_service.cancel_redemption(&user, redemption.id).await;
    assert!(cancelled.is_ok_and(|dto| dto.status == RedemptionStatus::Cancelado));

    let refreshed = UserRepository::new(&test.db).get_by_id(user.id).await?.unwrap();
    assert_eq!(refreshed.balance_cents, 3_000);
    let prize = PrizeRepository::new(&test.db).get_by_id(prize.id).await?.unwrap();
    assert_eq!(prize.stock, 1);

    assert!(matches!(
        prize_service.cancel_redemption(&user, redemption.id).await,
        Err(Error::PrizeError(PrizeError::InvalidStatusChange { .. }))
    ));

    Ok(())
}

/// Expect managers to move redemptions forward and never out of a delivered state
#[tokio::test]
async fn manager_updates_status() -> Result<(), TestError> {
    let mut test = TestBuilder::new()
        .with_prize_tables()
        .with_notification_tables()
        .build()
        .await?;
    let user = test
        .user()
        .insert_user_with_balance("ana@example.com", Hierarchy::Padrao, None, 3_000)
        .await?;
    let supervisor = test
        .user()
        .insert_user("sup@example.com", Hierarchy::Supervisor, None)
        .await?;
    let prize = test.prize().insert_prize("Vale cinema", 1_000, 5, false).await?;

    let notifier = Notifier::new();
    let prize_service = PrizeService::new(&test.db, &notifier);
    let redemption = prize_service.redeem(&user, prize.id).await;
    assert!(redemption.is_ok());
    let redemption = redemption.unwrap();

    let update = |status| UpdateRedemptionStatusDto {
        status,
        notes: "Retirar no RH".to_string(),
    };

    assert!(matches!(
        prize_service
            .update_redemption_status(&user, redemption.id, update(RedemptionStatus::Aprovado))
            .await,
        Err(Error::AuthError(_))
    ));

    let delivered = prize_service
        .update_redemption_status(&supervisor, redemption.id, update(RedemptionStatus::Entregue))
        .await;
    assert!(delivered.is_ok());
    let delivered = delivered.unwrap();
    assert!(delivered.delivered_at.is_some());
    assert_eq!(delivered.approved_by, Some(supervisor.id));
    assert_eq!(delivered.notes, "Retirar no RH");

    assert!(matches!(
        prize_service
            .update_redemption_status(&supervisor, redemption.id, update(RedemptionStatus::Cancelado))
            .await,
        Err(Error::PrizeError(PrizeError::InvalidStatusChange { .. }))
    ));

    Ok(())
}
