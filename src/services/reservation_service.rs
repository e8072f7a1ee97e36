//! Flujo de reserva
//!
//! Valida la petición, toma el lock de coches y después el de pedidos,
//! relee ambos documentos bajo lock, comprueba disponibilidad, crea el pedido,
//! marca el coche como no disponible y confirma ambos ficheros en dos fases.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, SubsecRound, Utc};
use validator::{Validate, ValidationErrors};

use crate::dto::reservation_dto::{CustomerInfo, ReservationRequest};
use crate::models::{
    CarCollection, CarSnapshot, CustomerSnapshot, Order, OrderCollection, OrderStatus,
    RentalSnapshot,
};
use crate::repositories::{CarRepository, CollectionGuard, DocumentState, OrderRepository};
use crate::utils::errors::{field_error, not_found_error, AppError, AppResult};
use crate::utils::order_id::generate_unique_order_id;
use crate::utils::validation::{
    validate_date, validate_not_before, validate_not_empty, validate_positive_price, validate_range,
};

/// Petición ya validada
#[derive(Debug, Clone)]
struct ValidatedReservation {
    car_vin: String,
    customer: CustomerSnapshot,
    start_date: NaiveDate,
    rental_period: u32,
}

#[derive(Debug, Clone)]
pub struct ReservationService {
    cars: CarRepository,
    orders: OrderRepository,
    max_rental_days: i64,
    lock_wait: Duration,
}

impl ReservationService {
    pub fn new(
        cars: CarRepository,
        orders: OrderRepository,
        max_rental_days: i64,
        lock_wait: Duration,
    ) -> Self {
        Self {
            cars,
            orders,
            max_rental_days,
            lock_wait,
        }
    }

    /// Crear un pedido con la hora local actual
    pub async fn submit_reservation(&self, request: ReservationRequest) -> AppResult<Order> {
        self.submit_reservation_at(request, Local::now()).await
    }

    pub async fn submit_reservation_at(
        &self,
        request: ReservationRequest,
        now: DateTime<Local>,
    ) -> AppResult<Order> {
        // orderDate se guarda con precisión de segundos
        let now = now.trunc_subsecs(0);
        let reservation = self.validate(request, now.date_naive())?;

        // Siempre coches primero, después pedidos
        let cars_guard = self.cars.lock(self.lock_wait).await?;
        let orders_guard = self.orders.lock(self.lock_wait).await?;

        // Nada leído antes del lock es fiable
        let cars_loaded = self.cars.load_collection().await?;
        let orders_loaded = self.orders.load_collection().await?;

        let previous_cars = cars_loaded.value.clone();
        let mut cars = cars_loaded.value;
        let mut orders = orders_loaded.value;

        let car = cars
            .find_by_vin_mut(&reservation.car_vin)
            .ok_or_else(|| not_found_error("Selected car with VIN", &reservation.car_vin))?;

        if !car.available {
            return Err(AppError::Conflict(
                "Sorry, this car was just rented out. Please choose another.".to_string(),
            ));
        }

        // Un precio inválido en el seed no debe producir un pedido
        if validate_positive_price(car.price_per_day).is_err() {
            return Err(AppError::Internal(format!(
                "Car {} has an invalid pricePerDay: {}",
                car.vin, car.price_per_day
            )));
        }

        let total_price = car.price_per_day * f64::from(reservation.rental_period);
        let order_id = generate_unique_order_id(now.with_timezone(&Utc), |id| orders.contains_id(id));

        let order = Order {
            order_id,
            customer: reservation.customer,
            car: CarSnapshot {
                vin: car.vin.clone(),
                brand: car.brand.clone(),
                car_model: car.car_model.clone(),
                price_per_day: Some(car.price_per_day),
            },
            rental: RentalSnapshot {
                start_date: reservation.start_date.format("%Y-%m-%d").to_string(),
                rental_period: reservation.rental_period,
                order_date: now.naive_local(),
                total_price,
            },
            status: Some(OrderStatus::Confirmed),
        };

        car.available = false;
        orders.add(order.clone());

        if orders_loaded.state == DocumentState::Corrupt {
            self.orders.document().backup_corrupt().await?;
        }

        self.commit(&cars_guard, &orders_guard, &cars, &previous_cars, &orders)
            .await?;

        log::info!(
            "✅ Reserva {} confirmada: {} x {} días = {}",
            order.order_id,
            order.car.vin,
            order.rental.rental_period,
            order.rental.total_price
        );
        Ok(order)
    }

    /// Confirmación en dos fases de ambos documentos.
    ///
    /// Si el rename de pedidos falla tras el de coches, se restaura el catálogo anterior.
    async fn commit(
        &self,
        cars_guard: &CollectionGuard<CarCollection>,
        orders_guard: &CollectionGuard<OrderCollection>,
        cars: &CarCollection,
        previous_cars: &CarCollection,
        orders: &OrderCollection,
    ) -> AppResult<()> {
        self.cars.verify_guard(cars_guard)?;
        self.orders.verify_guard(orders_guard)?;

        let cars_write = self.cars.document().prepare(cars).await?;
        let orders_write = match self.orders.document().prepare(orders).await {
            Ok(prepared) => prepared,
            Err(e) => {
                cars_write.discard().await;
                return Err(e);
            }
        };

        if let Err(e) = cars_write.commit().await {
            orders_write.discard().await;
            return Err(e);
        }

        if let Err(e) = orders_write.commit().await {
            log::error!("❌ orders.json no se pudo confirmar tras actualizar cars.json, restaurando catálogo");
            if let Err(rollback) = self.cars.document().write(previous_cars).await {
                log::error!(
                    "❌ Inconsistencia: el coche quedó no disponible sin pedido guardado: {}",
                    rollback
                );
            }
            return Err(e);
        }

        Ok(())
    }

    fn validate(&self, request: ReservationRequest, today: NaiveDate) -> AppResult<ValidatedReservation> {
        let mut errors = ValidationErrors::new();

        if let Err(customer_errors) = request.customer.validate() {
            for (field, field_errors) in customer_errors.field_errors() {
                for error in field_errors {
                    errors.add(api_field_name(field), error.clone());
                }
            }
        }

        if validate_not_empty(&request.car_vin).is_err() {
            errors.add("carVin", field_error("carVin", "Please select a car to reserve."));
        }

        let start_date = match validate_date(&request.rental.start_date) {
            Ok(date) => match validate_not_before(date, today) {
                Ok(()) => Some(date),
                Err(mut error) => {
                    error.message = Some("Start date cannot be in the past.".into());
                    errors.add("startDate", error);
                    None
                }
            },
            Err(mut error) => {
                error.message = Some("Please enter a valid start date (YYYY-MM-DD).".into());
                errors.add("startDate", error);
                None
            }
        };

        let rental_period = match request.rental.rental_period {
            Some(days) => match validate_range(days, 1, self.max_rental_days) {
                Ok(()) => u32::try_from(days).ok(),
                Err(mut error) => {
                    error.message = Some("Rental period is outside the allowed number of days.".into());
                    errors.add("rentalPeriod", error);
                    None
                }
            },
            None => {
                errors.add(
                    "rentalPeriod",
                    field_error("rentalPeriod", "Rental period must be a whole number of days."),
                );
                None
            }
        };

        match (start_date, rental_period) {
            (Some(start_date), Some(rental_period)) if errors.errors().is_empty() => Ok(ValidatedReservation {
                car_vin: request.car_vin.trim().to_string(),
                customer: customer_snapshot(request.customer),
                start_date,
                rental_period,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn customer_snapshot(customer: CustomerInfo) -> CustomerSnapshot {
    CustomerSnapshot {
        name: customer.name.trim().to_string(),
        phone_number: customer.phone_number.trim().to_string(),
        email: customer.email.trim().to_string(),
        drivers_license_number: customer.drivers_license_number.trim().to_string(),
    }
}

/// Nombre del campo tal como aparece en el JSON del cliente
fn api_field_name(field: &'static str) -> &'static str {
    match field {
        "phone_number" => "phoneNumber",
        "drivers_license_number" => "driversLicenseNumber",
        other => other,
    }
}
