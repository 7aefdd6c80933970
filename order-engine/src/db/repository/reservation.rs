//! Reservation Repository
//!
//! Table bookings live in their own `reservation` collection but follow
//! the same append-then-patch lifecycle as orders.

use super::{BaseRepository, PersistenceError, RepoResult};
use chrono::{Local, NaiveDate};
use shared::error::ValidationError;
use shared::models::{Reservation, ReservationStatus};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("rejected before write: {0}")]
    Rejected(#[from] ValidationError),
    #[error("reservation not found: {0}")]
    NotFound(String),
    #[error("cannot move reservation from '{from:?}' to '{to:?}'")]
    Transition {
        from: ReservationStatus,
        to: ReservationStatus,
    },
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl From<surrealdb::Error> for ReservationError {
    fn from(err: surrealdb::Error) -> Self {
        ReservationError::Persistence(PersistenceError::from(err))
    }
}

/// Fields the guest fills in; everything else is stamped at creation.
#[derive(Debug, Clone)]
pub struct ReservationRequest {
    pub owner_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub party_size: u32,
    pub table_choice: String,
    pub special_request: String,
}

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a reservation under a store-generated key.
    ///
    /// Always starts in `pending` with a fresh `created_at`, whatever the
    /// caller supplies.
    pub async fn create(&self, request: ReservationRequest) -> Result<Reservation, ReservationError> {
        validate_request(&request)?;

        let draft = Reservation {
            id: None,
            owner_id: request.owner_id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            date: request.date,
            time: request.time,
            party_size: request.party_size,
            table_choice: request.table_choice,
            special_request: request.special_request,
            status: ReservationStatus::Pending,
            created_at: now_millis(),
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $created = (CREATE reservation CONTENT $draft);
                SELECT *, <string>id AS id FROM $created;
            "#,
            )
            .bind(("draft", draft))
            .await
            .map_err(PersistenceError::from)?;
        // slot 0 belongs to the LET statement; the projection is slot 1
        let created: Vec<Reservation> = result.take(1).map_err(PersistenceError::from)?;
        let reservation = created
            .into_iter()
            .next()
            .ok_or(PersistenceError::MissingKey)?;
        tracing::info!(
            reservation_id = ?reservation.id,
            date = %reservation.date,
            party_size = reservation.party_size,
            "reservation created"
        );
        Ok(reservation)
    }

    /// All reservations for one guest, soonest date first.
    pub async fn find_by_owner(&self, owner_id: &str) -> RepoResult<Vec<Reservation>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, <string>id AS id FROM reservation \
                 WHERE owner_id = $owner ORDER BY date, time",
            )
            .bind(("owner", owner_id.to_string()))
            .await?;
        let reservations: Vec<Reservation> = result.take(0)?;
        Ok(reservations)
    }

    /// Patch the status field, enforcing the reservation state machine.
    pub async fn update_status(
        &self,
        reservation_id: &str,
        next: ReservationStatus,
    ) -> Result<Reservation, ReservationError> {
        let record_id: RecordId = reservation_id
            .parse()
            .map_err(|_| ReservationError::NotFound(reservation_id.to_string()))?;

        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM reservation WHERE id = $id")
            .bind(("id", record_id.clone()))
            .await?;
        let current: Vec<Reservation> = result.take(0)?;
        let current = current
            .into_iter()
            .next()
            .ok_or_else(|| ReservationError::NotFound(reservation_id.to_string()))?;

        if !current.status.can_transition_to(next) {
            return Err(ReservationError::Transition {
                from: current.status,
                to: next,
            });
        }

        self.base
            .db()
            .query("UPDATE $id SET status = $status")
            .bind(("id", record_id))
            .bind(("status", next))
            .await?;

        Ok(Reservation {
            status: next,
            ..current
        })
    }
}

fn validate_request(request: &ReservationRequest) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    if request.name.trim().is_empty() {
        violations.push("guest name is required".to_string());
    }
    if request.phone.trim().is_empty() {
        violations.push("phone number is required".to_string());
    }
    if request.party_size == 0 {
        violations.push("party size must be at least one".to_string());
    }
    match NaiveDate::parse_from_str(&request.date, "%Y-%m-%d") {
        Ok(date) => {
            if date < Local::now().date_naive() {
                violations.push("reservation date must not be in the past".to_string());
            }
        }
        Err(_) => violations.push("reservation date must be YYYY-MM-DD".to_string()),
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}
