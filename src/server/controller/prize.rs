use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        prize::{
            AdjustCreditsDto, CreatePrizeDto, CreditTransactionDto, PrizeDto, PrizeQuery,
            RedemptionDto, UpdateRedemptionStatusDto,
        },
    },
    server::{
        controller::util::get_user::get_user_from_session, error::Error, model::app::AppState,
        service::prize::PrizeService,
    },
};

pub static PRIZE_TAG: &str = "prize";

#[utoipa::path(
    get,
    path = "/api/prizes",
    tag = PRIZE_TAG,
    params(PrizeQuery),
    responses(
        (status = 200, description = "Prizes", body = Vec<PrizeDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_prizes(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PrizeQuery>,
) -> Result<impl IntoResponse, Error> {
    get_user_from_session(&state, &session).await?;

    let prizes = PrizeService::new(&state.db, &state.notifier)
        .list_prizes(query.active)
        .await?;

    Ok((StatusCode::OK, Json(prizes)))
}

#[utoipa::path(
    post,
    path = "/api/prizes",
    tag = PRIZE_TAG,
    request_body = CreatePrizeDto,
    responses(
        (status = 201, description = "Prize created", body = PrizeDto),
        (status = 400, description = "Invalid prize", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_prize(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreatePrizeDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let prize = PrizeService::new(&state.db, &state.notifier)
        .create_prize(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(prize)))
}

/// Redeem a prize with the user's credits
#[utoipa::path(
    post,
    path = "/api/prizes/{id}/redeem",
    tag = PRIZE_TAG,
    params(("id" = i32, Path, description = "Prize ID")),
    responses(
        (status = 201, description = "Redemption pending", body = RedemptionDto),
        (status = 400, description = "Prize unavailable or insufficient balance", body = ErrorDto),
        (status = 404, description = "Prize not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn redeem_prize(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let redemption = PrizeService::new(&state.db, &state.notifier)
        .redeem(&user, id)
        .await?;

    Ok((StatusCode::CREATED, Json(redemption)))
}

/// The user's redemptions, or every redemption for prize managers
#[utoipa::path(
    get,
    path = "/api/redemptions",
    tag = PRIZE_TAG,
    responses(
        (status = 200, description = "Redemptions", body = Vec<RedemptionDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_redemptions(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let redemptions = PrizeService::new(&state.db, &state.notifier)
        .list_redemptions(&user)
        .await?;

    Ok((StatusCode::OK, Json(redemptions)))
}

#[utoipa::path(
    post,
    path = "/api/redemptions/{id}/status",
    tag = PRIZE_TAG,
    params(("id" = i32, Path, description = "Redemption ID")),
    request_body = UpdateRedemptionStatusDto,
    responses(
        (status = 200, description = "Status changed", body = RedemptionDto),
        (status = 400, description = "Transition not allowed", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 404, description = "Redemption not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_redemption_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRedemptionStatusDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let redemption = PrizeService::new(&state.db, &state.notifier)
        .update_redemption_status(&user, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(redemption)))
}

/// Cancel a pending or approved redemption, refunding its credits
#[utoipa::path(
    post,
    path = "/api/redemptions/{id}/cancel",
    tag = PRIZE_TAG,
    params(("id" = i32, Path, description = "Redemption ID")),
    responses(
        (status = 200, description = "Redemption cancelled", body = RedemptionDto),
        (status = 400, description = "Redemption can no longer be cancelled", body = ErrorDto),
        (status = 403, description = "Not the owner", body = ErrorDto),
        (status = 404, description = "Redemption not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_redemption(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let redemption = PrizeService::new(&state.db, &state.notifier)
        .cancel_redemption(&user, id)
        .await?;

    Ok((StatusCode::OK, Json(redemption)))
}

#[utoipa::path(
    post,
    path = "/api/credits/adjust",
    tag = PRIZE_TAG,
    request_body = AdjustCreditsDto,
    responses(
        (status = 201, description = "Ledger entry created", body = CreditTransactionDto),
        (status = 400, description = "Zero amount or balance would turn negative", body = ErrorDto),
        (status = 403, description = "Permission denied", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn adjust_credits(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AdjustCreditsDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let transaction = PrizeService::new(&state.db, &state.notifier)
        .adjust_credits(&user, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/api/credits/transactions",
    tag = PRIZE_TAG,
    responses(
        (status = 200, description = "The user's credit ledger, newest first", body = Vec<CreditTransactionDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_user_from_session(&state, &session).await?;

    let transactions = PrizeService::new(&state.db, &state.notifier)
        .list_transactions(&user)
        .await?;

    Ok((StatusCode::OK, Json(transactions)))
}
