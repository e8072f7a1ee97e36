use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::catalog_controller::CatalogController;
use crate::dto::api_response::ApiResponse;
use crate::dto::catalog_dto::{
    CarFilterQuery, CarsResponse, FilterOptionsResponse, SuggestionQuery, SuggestionsResponse,
    UpdateAvailabilityRequest,
};
use crate::models::Car;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars))
        .route("/filters", get(filter_options))
        .route("/suggestions", get(suggestions))
        .route("/availability", post(update_availability))
        .route("/:vin", get(get_car))
}

fn controller(state: &AppState) -> CatalogController {
    CatalogController::new(state.cars.clone(), state.config.lock_wait())
}

async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<CarFilterQuery>,
) -> Result<Json<CarsResponse>, AppError> {
    let response = controller(&state).list(query).await?;
    Ok(Json(response))
}

async fn filter_options(
    State(state): State<AppState>,
) -> Result<Json<FilterOptionsResponse>, AppError> {
    let response = controller(&state).filter_options().await?;
    Ok(Json(response))
}

async fn suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let response = controller(&state).suggestions(&query.term).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<Car>, AppError> {
    let car = controller(&state).get_by_vin(&vin).await?;
    Ok(Json(car))
}

async fn update_availability(
    State(state): State<AppState>,
    payload: Result<Json<UpdateAvailabilityRequest>, JsonRejection>,
) -> Result<Json<ApiResponse>, AppError> {
    let Json(request) = payload?;
    let response = controller(&state).update_availability(request).await?;
    Ok(Json(response))
}
