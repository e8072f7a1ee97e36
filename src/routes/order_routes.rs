use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::order_controller::OrderController;
use crate::dto::reservation_dto::{ReservationRequest, ReservationResponse};
use crate::models::{Order, OrderCollection};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:order_id", get(get_order))
}

fn controller(state: &AppState) -> OrderController {
    OrderController::new(state.orders.clone(), state.reservation_service())
}

async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<ReservationRequest>, JsonRejection>,
) -> Result<Json<ReservationResponse>, AppError> {
    let Json(request) = payload?;
    let response = controller(&state).create(request).await?;
    Ok(Json(response))
}

async fn list_orders(State(state): State<AppState>) -> Result<Json<OrderCollection>, AppError> {
    let response = controller(&state).list().await?;
    Ok(Json(response))
}

async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = controller(&state).get_by_id(&order_id).await?;
    Ok(Json(order))
}
