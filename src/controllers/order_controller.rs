use crate::dto::reservation_dto::{ReservationRequest, ReservationResponse};
use crate::models::{Order, OrderCollection};
use crate::repositories::OrderRepository;
use crate::services::ReservationService;
use crate::utils::errors::{not_found_error, AppError};

pub struct OrderController {
    repository: OrderRepository,
    reservations: ReservationService,
}

impl OrderController {
    pub fn new(repository: OrderRepository, reservations: ReservationService) -> Self {
        Self {
            repository,
            reservations,
        }
    }

    pub async fn create(&self, request: ReservationRequest) -> Result<ReservationResponse, AppError> {
        let order = self.reservations.submit_reservation(request).await?;
        Ok(ReservationResponse::confirmed(order.order_id))
    }

    // Sin filtrado por cliente: "mis reservas" lista todos los pedidos,
    // también los que no tienen el formato actual
    pub async fn list(&self) -> Result<OrderCollection, AppError> {
        Ok(self.repository.load_collection().await?.value)
    }

    /// Búsqueda para la página de confirmación (igualdad exacta de orderId)
    pub async fn get_by_id(&self, order_id: &str) -> Result<Order, AppError> {
        self.repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| not_found_error("Order", order_id))
    }
}
