//! Dashboard data — single fetch for the landing screen.
//!
//! Today's schedule, income for today and the running week, and a zodiac
//! card per distinct client visiting today.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{self, AppointmentWithClient, DatabaseError};
use crate::finance;
use crate::models::enums::RecordType;
use crate::zodiac::{zodiac_for, Zodiac};

/// A zodiac greeting card for one client visiting today.
#[derive(Debug, Clone, Serialize)]
pub struct ZodiacCard {
    pub client_name: String,
    #[serde(flatten)]
    pub zodiac: Zodiac,
    pub appointment_time: String,
}

/// Dashboard data — single fetch for all landing-screen content.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub today: NaiveDate,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub today_appointments: Vec<AppointmentWithClient>,
    pub zodiac_cards: Vec<ZodiacCard>,
    pub income_today: Decimal,
    pub income_week: Decimal,
}

pub fn fetch_dashboard(conn: &Connection, today: NaiveDate) -> Result<DashboardData, DatabaseError> {
    let (week_start, week_end) = finance::week_bounds(today);

    let today_appointments = db::list_appointments_on(conn, today)?;
    let income_today = finance::sum_between(conn, RecordType::Income, today, today)?;
    let income_week = finance::sum_between(conn, RecordType::Income, week_start, week_end)?;

    // One card per distinct client with a known birth date
    let mut seen: Vec<Uuid> = Vec::new();
    let mut zodiac_cards = Vec::new();
    for entry in &today_appointments {
        let client_id = entry.appointment.client_id;
        if seen.contains(&client_id) {
            continue;
        }
        seen.push(client_id);

        let Some(client) = db::get_client(conn, &client_id)? else {
            continue;
        };
        if let Some(birth_date) = client.birth_date {
            zodiac_cards.push(ZodiacCard {
                client_name: client.name,
                zodiac: zodiac_for(birth_date),
                appointment_time: entry.appointment.start_time.format("%H:%M").to_string(),
            });
        }
    }

    Ok(DashboardData {
        today,
        week_start,
        week_end,
        today_appointments,
        zodiac_cards,
        income_today,
        income_week,
    })
}
