use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ServiceType;

/// Default treatment length when the booking form leaves it blank.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_type: ServiceType,
    pub price: Decimal,
    pub start_time: NaiveDateTime,
    pub duration_minutes: u32,
    pub notes: String,
    pub is_completed: bool,
}

/// Status derived from the completion flag and the current time.
/// Not stored — recomputed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Planned,
    InProgress,
    Completed,
}

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Planned => "מתוכנן",
            Self::InProgress => "בטיפול",
            Self::Completed => "הושלם",
        }
    }
}

impl Appointment {
    pub fn end_time(&self) -> NaiveDateTime {
        self.start_time + Duration::minutes(self.duration_minutes as i64)
    }

    /// The completion flag wins; otherwise "in progress" while `now` falls
    /// inside [start, start + duration], else "planned".
    pub fn status_at(&self, now: NaiveDateTime) -> AppointmentStatus {
        if self.is_completed {
            return AppointmentStatus::Completed;
        }
        if self.start_time <= now && now <= self.end_time() {
            return AppointmentStatus::InProgress;
        }
        AppointmentStatus::Planned
    }
}
