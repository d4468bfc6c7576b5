//! Finance aggregation layer — read-side queries over the ledger and
//! appointment book.
//!
//! Everything here is parameterized by an inclusive [start, end] date range
//! or one of the period presets anchored on "today". Missing aggregates are
//! zero, never null. Monetary sums are folded in decimal arithmetic rather
//! than SQLite floats.

use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::Connection;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::enums::{RecordType, ServiceType};
use crate::models::FinanceRecord;

/// Short Hebrew month names for chart labels, 1-indexed.
const MONTH_SHORT_HE: [&str; 13] = [
    "", "ינו", "פבר", "מרץ", "אפר", "מאי", "יוני", "יולי", "אוג", "ספט", "אוק", "נוב", "דצמ",
];

/// Fixed age brackets (inclusive) for the client-age chart.
const AGE_BRACKETS: [(&str, u32, u32); 5] = [
    ("18–25", 18, 25),
    ("26–35", 26, 35),
    ("36–45", 36, 45),
    ("46–55", 46, 55),
    ("56+", 56, 120),
];

// ---------------------------------------------------------------------------
// Period presets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
}

impl Period {
    /// Parse a `period` query value; anything unrecognized falls back to
    /// the month preset.
    pub fn from_param(raw: &str) -> Self {
        match raw {
            "day" => Self::Day,
            "week" => Self::Week,
            "quarter" => Self::Quarter,
            _ => Self::Month,
        }
    }

    /// Resolve the preset to concrete inclusive bounds anchored on `today`.
    pub fn bounds(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Day => (today, today),
            Self::Week => week_bounds(today),
            Self::Month => month_bounds(today.year(), today.month()),
            Self::Quarter => quarter_bounds(today),
        }
    }
}

/// Monday..Sunday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day - Duration::days(day.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// First..last day of the given calendar month.
pub fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
            .expect("valid month")
            .pred_opt()
            .expect("day before month start")
    };
    (start, end)
}

/// First..last day of the calendar quarter containing `day`.
pub fn quarter_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let quarter = (day.month() - 1) / 3 + 1;
    let start_month = 3 * (quarter - 1) + 1;
    let end_month = start_month + 2;
    let (start, _) = month_bounds(day.year(), start_month);
    let (_, end) = month_bounds(day.year(), end_month);
    (start, end)
}

// ---------------------------------------------------------------------------
// Sums
// ---------------------------------------------------------------------------

/// Sum of one record type within [start, end]; zero when nothing matches.
pub fn sum_between(
    conn: &Connection,
    record_type: RecordType,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Decimal, DatabaseError> {
    Ok(db::amounts_between(conn, record_type, start, end)?
        .into_iter()
        .sum())
}

/// All-time sum of one record type.
pub fn sum_all(conn: &Connection, record_type: RecordType) -> Result<Decimal, DatabaseError> {
    Ok(db::all_amounts(conn, record_type)?.into_iter().sum())
}

/// Income total for one calendar month.
pub fn monthly_income(
    conn: &Connection,
    year: i32,
    month: u32,
) -> Result<Decimal, DatabaseError> {
    let (start, end) = month_bounds(year, month);
    sum_between(conn, RecordType::Income, start, end)
}

// ---------------------------------------------------------------------------
// Monthly trend & rankings
// ---------------------------------------------------------------------------

/// Income total of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub total: Decimal,
}

/// Income totals grouped by calendar month, ascending.
pub fn monthly_income_trend(conn: &Connection) -> Result<Vec<MonthTotal>, DatabaseError> {
    let mut totals: Vec<MonthTotal> = Vec::new();
    // income_by_date is ordered by date, so months come out ascending
    for (date, amount) in db::income_by_date(conn)? {
        match totals.last_mut() {
            Some(last) if last.year == date.year() && last.month == date.month() => {
                last.total += amount;
            }
            _ => totals.push(MonthTotal {
                year: date.year(),
                month: date.month(),
                total: amount,
            }),
        }
    }
    Ok(totals)
}

/// The calendar month with the highest income. Earliest month wins ties.
pub fn most_profitable_month(conn: &Connection) -> Result<Option<MonthTotal>, DatabaseError> {
    let trend = monthly_income_trend(conn)?;
    Ok(trend.into_iter().fold(None, |best: Option<MonthTotal>, m| {
        match best {
            Some(b) if b.total >= m.total => Some(b),
            _ => Some(m),
        }
    }))
}

/// The client with the highest summed appointment prices.
/// Ties resolved by client id so the answer is stable.
pub fn most_profitable_client(
    conn: &Connection,
) -> Result<Option<(String, Decimal)>, DatabaseError> {
    let mut revenue: Vec<(Uuid, String, Decimal)> = Vec::new();
    for (id, name, price) in db::appointment_client_prices(conn)? {
        match revenue.iter_mut().find(|(rid, _, _)| *rid == id) {
            Some((_, _, total)) => *total += price,
            None => revenue.push((id, name, price)),
        }
    }
    revenue.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    Ok(revenue.into_iter().next().map(|(_, name, total)| (name, total)))
}

/// All-time revenue for one service type.
pub fn revenue_by_service(
    conn: &Connection,
    service: ServiceType,
) -> Result<Decimal, DatabaseError> {
    Ok(db::service_prices(conn)?
        .into_iter()
        .filter(|(s, _)| *s == service)
        .map(|(_, price)| price)
        .sum())
}

// ---------------------------------------------------------------------------
// Chart datasets
// ---------------------------------------------------------------------------

/// Labels + values pairs consumed by the chart-rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData<T> {
    pub labels: Vec<String>,
    pub values: Vec<T>,
}

/// Appointment counts per service type, all-time.
pub fn service_chart(conn: &Connection) -> Result<ChartData<i64>, DatabaseError> {
    let counts = db::service_counts(conn)?;
    Ok(ChartData {
        labels: counts.iter().map(|(s, _)| s.label().to_string()).collect(),
        values: counts.iter().map(|(_, n)| *n).collect(),
    })
}

/// Client counts per fixed age bracket, with a residual bucket for
/// clients whose age is unknown.
pub fn age_chart(conn: &Connection) -> Result<ChartData<i64>, DatabaseError> {
    let mut labels = Vec::new();
    let mut values = Vec::new();

    for (label, lo, hi) in AGE_BRACKETS {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM clients WHERE age >= ?1 AND age <= ?2",
            rusqlite::params![lo, hi],
            |row| row.get(0),
        )?;
        labels.push(label.to_string());
        values.push(count);
    }

    let unknown: i64 = conn.query_row(
        "SELECT COUNT(*) FROM clients WHERE age IS NULL",
        [],
        |row| row.get(0),
    )?;
    labels.push("לא ידוע".to_string());
    values.push(unknown);

    Ok(ChartData { labels, values })
}

/// Monthly income totals as chart data, ascending by month.
pub fn monthly_chart(conn: &Connection) -> Result<ChartData<f64>, DatabaseError> {
    let trend = monthly_income_trend(conn)?;
    Ok(ChartData {
        labels: trend
            .iter()
            .map(|m| format!("{} {}", MONTH_SHORT_HE[m.month as usize], m.year))
            .collect(),
        values: trend
            .iter()
            .map(|m| m.total.to_f64().unwrap_or(0.0))
            .collect(),
    })
}

// ---------------------------------------------------------------------------
// Finance dashboard assembly
// ---------------------------------------------------------------------------

/// Everything the finance dashboard shows for one period.
#[derive(Debug, Serialize)]
pub struct FinanceOverview {
    pub period: Period,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: Decimal,
    pub expenses: Decimal,
    pub profit: Decimal,
    pub records: Vec<FinanceRecord>,
    pub service_chart: ChartData<i64>,
    pub age_chart: ChartData<i64>,
    pub monthly_chart: ChartData<f64>,
}

pub fn finance_overview(
    conn: &Connection,
    today: NaiveDate,
    period: Period,
) -> Result<FinanceOverview, DatabaseError> {
    let (start, end) = period.bounds(today);
    let income = sum_between(conn, RecordType::Income, start, end)?;
    let expenses = sum_between(conn, RecordType::Expense, start, end)?;

    Ok(FinanceOverview {
        period,
        start,
        end,
        income,
        expenses,
        profit: income - expenses,
        records: db::list_records_between(conn, start, end)?,
        service_chart: service_chart(conn)?,
        age_chart: age_chart(conn)?,
        monthly_chart: monthly_chart(conn)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::{insert_client, insert_finance_record};
    use crate::models::Client;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(record_type: RecordType, on: NaiveDate, amount: i64) -> FinanceRecord {
        FinanceRecord {
            id: Uuid::new_v4(),
            record_type,
            date: on,
            amount: Decimal::new(amount, 0),
            category: "שונות".into(),
            description: String::new(),
            appointment_id: None,
            created_at: NaiveDateTime::default(),
        }
    }

    fn client_with_age(age: Option<u32>) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "לקוחה".into(),
            age,
            birth_date: None,
            phone: "0500000000".into(),
            email: None,
            notes: String::new(),
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn day_preset_is_single_day() {
        let today = date(2024, 4, 17);
        assert_eq!(Period::Day.bounds(today), (today, today));
    }

    #[test]
    fn week_preset_runs_monday_to_sunday() {
        // 2024-04-17 is a Wednesday
        let (start, end) = Period::Week.bounds(date(2024, 4, 17));
        assert_eq!(start, date(2024, 4, 15));
        assert_eq!(end, date(2024, 4, 21));

        // A Monday anchors its own week
        let (start, end) = Period::Week.bounds(date(2024, 4, 15));
        assert_eq!(start, date(2024, 4, 15));
        assert_eq!(end, date(2024, 4, 21));
    }

    #[test]
    fn month_preset_covers_whole_month() {
        let (start, end) = Period::Month.bounds(date(2024, 2, 10));
        assert_eq!(start, date(2024, 2, 1));
        assert_eq!(end, date(2024, 2, 29)); // leap year

        let (start, end) = Period::Month.bounds(date(2024, 12, 5));
        assert_eq!(start, date(2024, 12, 1));
        assert_eq!(end, date(2024, 12, 31));
    }

    #[test]
    fn april_is_second_quarter() {
        let (start, end) = Period::Quarter.bounds(date(2024, 4, 10));
        assert_eq!(start, date(2024, 4, 1));
        assert_eq!(end, date(2024, 6, 30));
    }

    #[test]
    fn fourth_quarter_ends_december_31() {
        let (start, end) = Period::Quarter.bounds(date(2024, 11, 2));
        assert_eq!(start, date(2024, 10, 1));
        assert_eq!(end, date(2024, 12, 31));
    }

    #[test]
    fn unknown_period_param_defaults_to_month() {
        assert_eq!(Period::from_param("fortnight"), Period::Month);
        assert_eq!(Period::from_param("quarter"), Period::Quarter);
    }

    #[test]
    fn sums_default_to_zero() {
        let conn = open_memory_database().unwrap();
        let total =
            sum_between(&conn, RecordType::Income, date(2024, 1, 1), date(2024, 12, 31)).unwrap();
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(sum_all(&conn, RecordType::Expense).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn sums_are_range_inclusive_and_type_scoped() {
        let conn = open_memory_database().unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 3, 1), 100)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 3, 31), 50)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 4, 1), 999)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Expense, date(2024, 3, 15), 30)).unwrap();

        let income =
            sum_between(&conn, RecordType::Income, date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(income, Decimal::new(150, 0));

        let expenses =
            sum_between(&conn, RecordType::Expense, date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(expenses, Decimal::new(30, 0));
    }

    #[test]
    fn monthly_trend_groups_and_orders() {
        let conn = open_memory_database().unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 1, 5), 100)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 1, 20), 200)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 3, 2), 50)).unwrap();
        // Expenses never contribute to the income trend
        insert_finance_record(&conn, &record(RecordType::Expense, date(2024, 2, 2), 999)).unwrap();

        let trend = monthly_income_trend(&conn).unwrap();
        assert_eq!(trend.len(), 2);
        assert_eq!((trend[0].year, trend[0].month), (2024, 1));
        assert_eq!(trend[0].total, Decimal::new(300, 0));
        assert_eq!((trend[1].year, trend[1].month), (2024, 3));
    }

    #[test]
    fn most_profitable_month_prefers_earliest_on_tie() {
        let conn = open_memory_database().unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 1, 5), 300)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 2, 5), 300)).unwrap();

        let best = most_profitable_month(&conn).unwrap().unwrap();
        assert_eq!((best.year, best.month), (2024, 1));
    }

    #[test]
    fn age_chart_buckets_are_fixed_and_inclusive() {
        let conn = open_memory_database().unwrap();
        for age in [18, 25, 26, 56, 90] {
            insert_client(&conn, &client_with_age(Some(age))).unwrap();
        }
        insert_client(&conn, &client_with_age(None)).unwrap();

        let chart = age_chart(&conn).unwrap();
        assert_eq!(
            chart.labels,
            vec!["18–25", "26–35", "36–45", "46–55", "56+", "לא ידוע"]
        );
        assert_eq!(chart.values, vec![2, 1, 0, 0, 2, 1]);
    }

    #[test]
    fn overview_profit_is_income_minus_expenses() {
        let conn = open_memory_database().unwrap();
        let today = date(2024, 4, 17);
        insert_finance_record(&conn, &record(RecordType::Income, date(2024, 4, 3), 500)).unwrap();
        insert_finance_record(&conn, &record(RecordType::Expense, date(2024, 4, 10), 120)).unwrap();

        let overview = finance_overview(&conn, today, Period::Month).unwrap();
        assert_eq!(overview.income, Decimal::new(500, 0));
        assert_eq!(overview.expenses, Decimal::new(120, 0));
        assert_eq!(overview.profit, Decimal::new(380, 0));
        assert_eq!(overview.records.len(), 2);
        // Newest first
        assert_eq!(overview.records[0].date, date(2024, 4, 10));
    }
}
