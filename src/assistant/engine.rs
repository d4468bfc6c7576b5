//! The question-answering engine: an ordered list of predicate→answer
//! rules evaluated top to bottom. The first rule whose predicate matches
//! fires and its answer is returned — no fallthrough, no scoring. Earlier
//! rules therefore shadow later ones wherever phrasings overlap, and the
//! order itself is a documented contract (see `rule_order_is_fixed`).

use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::finance;
use crate::models::enums::RecordType;

use super::extract;
use super::lexicon::{self, PeriodKeyword};
use super::messages::MessageTemplates;

type RuleFn = fn(&Connection, &str, NaiveDate) -> Result<Option<String>, DatabaseError>;

/// The fixed evaluation order. Position is behavior: e.g. any question
/// containing "כמה הרווחתי" is consumed by `monthly-income` before
/// `revenue-by-service` ever sees it.
pub const RULES: &[(&str, RuleFn)] = &[
    ("last-visit-by-name", last_visit_by_name),
    ("visit-count-by-name", visit_count_by_name),
    ("monthly-income", monthly_income),
    ("most-frequent-client", most_frequent_client),
    ("most-profitable-client", most_profitable_client),
    ("most-profitable-month", most_profitable_month),
    ("service-count-in-period", service_count_in_period),
    ("total-client-count", total_client_count),
    ("total-appointment-count", total_appointment_count),
    ("total-income", total_income),
    ("total-expense", total_expense),
    ("revenue-by-service", revenue_by_service),
];

/// Answer a free-text Hebrew business question from stored data.
///
/// Never fails on unrecognized input — the fixed help message is the
/// fallback. Data-layer errors do propagate.
pub fn answer(
    conn: &Connection,
    question: &str,
    today: NaiveDate,
) -> Result<String, DatabaseError> {
    for (name, rule) in RULES {
        if let Some(reply) = rule(conn, question, today)? {
            tracing::debug!(rule = %name, "assistant rule matched");
            return Ok(reply);
        }
    }
    tracing::debug!("no assistant rule matched, returning help text");
    Ok(MessageTemplates::help())
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn last_visit_by_name(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let triggered = (q.contains("מתי") || q.contains("פעם אחרונה"))
        && (q.contains("הייתה") || q.contains("היית") || q.contains("ביקר") || q.contains("פה"));
    if !triggered {
        return Ok(None);
    }

    let Some(name) = extract::client_name(q) else {
        return Ok(Some(MessageTemplates::name_not_recognized()));
    };

    match db::latest_appointment_for_client_name(conn, name)? {
        Some((appt, client_name)) => Ok(Some(MessageTemplates::last_visit(
            &client_name,
            appt.start_time,
            appt.service_type,
        ))),
        None => Ok(Some(MessageTemplates::no_visits_for(name))),
    }
}

fn visit_count_by_name(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    if !q.contains("כמה פעמים") {
        return Ok(None);
    }

    for client in db::list_clients(conn)? {
        let first_name = client.name.split_whitespace().next().unwrap_or_default();
        if q.contains(&client.name) || (!first_name.is_empty() && q.contains(first_name)) {
            let visits = db::count_appointments_for_client(conn, &client.id)?;
            return Ok(Some(MessageTemplates::visit_count(&client.name, visits)));
        }
    }
    Ok(Some(MessageTemplates::no_client_in_question()))
}

fn monthly_income(
    conn: &Connection,
    q: &str,
    today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    if !(q.contains("כמה הרווחתי") || (q.contains("הכנסה") && q.contains("חודש"))) {
        return Ok(None);
    }

    if let Some((month_name, month)) = lexicon::detect_month(q) {
        let total = finance::monthly_income(conn, today.year(), month)?;
        return Ok(Some(MessageTemplates::month_income(
            month_name,
            today.year(),
            total,
        )));
    }

    // No specific month — answer for the current one
    let total = finance::monthly_income(conn, today.year(), today.month())?;
    Ok(Some(MessageTemplates::current_month_income(
        lexicon::month_name(today.month()),
        today.year(),
        total,
    )))
}

fn most_frequent_client(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let triggered = q.contains("הכי תכופה")
        || q.contains("הכי הרבה פעמים")
        || q.contains("הכי הרבה תורים")
        || q.contains("מגיעה הכי הרבה")
        || (q.contains("תכוף") && q.contains("לקוח"))
        || (q.contains("נאמנה") && q.contains("לקוח"));
    if !triggered {
        return Ok(None);
    }

    match db::most_frequent_client(conn)? {
        Some((name, visits)) if visits > 0 => {
            Ok(Some(MessageTemplates::most_frequent_client(&name, visits)))
        }
        _ => Ok(Some(MessageTemplates::insufficient_data())),
    }
}

fn most_profitable_client(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let triggered = q.contains("הכי רווחית")
        || q.contains("הכי הרבה כסף")
        || (q.contains("הכי") && q.contains("מביאה"))
        || (q.contains("רווח") && q.contains("לקוח"));
    if !triggered {
        return Ok(None);
    }

    match finance::most_profitable_client(conn)? {
        Some((name, revenue)) if !revenue.is_zero() => Ok(Some(
            MessageTemplates::most_profitable_client(&name, revenue),
        )),
        _ => Ok(Some(MessageTemplates::insufficient_data())),
    }
}

fn most_profitable_month(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let triggered = q.contains("הכי רווחי")
        || q.contains("החודש הטוב ביותר")
        || (q.contains("הרבה הכנסה") && q.contains("חודש"));
    if !triggered {
        return Ok(None);
    }

    match finance::most_profitable_month(conn)? {
        Some(best) if !best.total.is_zero() => Ok(Some(MessageTemplates::most_profitable_month(
            lexicon::month_name(best.month),
            best.year,
            best.total,
        ))),
        _ => Ok(Some(MessageTemplates::insufficient_data())),
    }
}

fn service_count_in_period(
    conn: &Connection,
    q: &str,
    today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let Some((alias, service)) = lexicon::detect_service(q) else {
        return Ok(None);
    };

    let reply = match lexicon::detect_period(q) {
        Some(PeriodKeyword::ThisWeek) => {
            let (start, end) = finance::week_bounds(today);
            let count = db::count_by_service_between(conn, service, start, end)?;
            MessageTemplates::service_count_this_week(alias, count)
        }
        Some(PeriodKeyword::ThisMonth) => {
            let (start, end) = finance::month_bounds(today.year(), today.month());
            let count = db::count_by_service_between(conn, service, start, end)?;
            MessageTemplates::service_count_this_month(alias, count)
        }
        None => {
            let count = db::count_by_service(conn, service)?;
            MessageTemplates::service_count_total(alias, count)
        }
    };
    Ok(Some(reply))
}

fn total_client_count(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    if !(q.contains("כמה לקוחות") || q.contains("מספר לקוחות")) {
        return Ok(None);
    }
    let count = db::count_clients(conn)?;
    Ok(Some(MessageTemplates::client_count(count)))
}

fn total_appointment_count(
    conn: &Connection,
    q: &str,
    today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    if !(q.contains("כמה תורים") || q.contains("מספר תורים")) {
        return Ok(None);
    }

    let reply = match lexicon::detect_period(q) {
        Some(PeriodKeyword::ThisWeek) => {
            let (start, end) = finance::week_bounds(today);
            MessageTemplates::appointments_this_week(db::count_appointments_between(
                conn, start, end,
            )?)
        }
        Some(PeriodKeyword::ThisMonth) => {
            let (start, end) = finance::month_bounds(today.year(), today.month());
            MessageTemplates::appointments_this_month(db::count_appointments_between(
                conn, start, end,
            )?)
        }
        None => MessageTemplates::appointments_total(db::count_appointments(conn)?),
    };
    Ok(Some(reply))
}

fn total_income(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let triggered = q.contains("הכנסה כוללת")
        || q.contains("סך ההכנסות")
        || q.contains("כמה הרווחת סך הכל")
        || q.contains("סך הכנסות");
    if !triggered {
        return Ok(None);
    }
    let total = finance::sum_all(conn, RecordType::Income)?;
    Ok(Some(MessageTemplates::total_income(total)))
}

fn total_expense(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    let triggered =
        q.contains("הוצאות כוללות") || q.contains("סך ההוצאות") || q.contains("כמה הוצאות");
    if !triggered {
        return Ok(None);
    }
    let total = finance::sum_all(conn, RecordType::Expense)?;
    Ok(Some(MessageTemplates::total_expenses(total)))
}

fn revenue_by_service(
    conn: &Connection,
    q: &str,
    _today: NaiveDate,
) -> Result<Option<String>, DatabaseError> {
    if !(q.contains("כמה הרווחתי מ") || q.contains("הכנסה")) {
        return Ok(None);
    }
    let Some((alias, service)) = lexicon::detect_service(q) else {
        return Ok(None);
    };
    let total = finance::revenue_by_service(conn, service)?;
    Ok(Some(MessageTemplates::service_revenue(alias, total)))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::{insert_appointment, insert_client, insert_finance_record};
    use crate::models::enums::ServiceType;
    use crate::models::{Appointment, Client, FinanceRecord};

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 4, 17) // a Wednesday; week runs Apr 15–21
    }

    fn seed_client(conn: &Connection, name: &str, phone: &str) -> Client {
        let client = Client {
            id: Uuid::new_v4(),
            name: name.into(),
            age: Some(32),
            birth_date: None,
            phone: phone.into(),
            email: None,
            notes: String::new(),
            created_at: ts("2024-01-01 08:00:00"),
        };
        insert_client(conn, &client).unwrap();
        client
    }

    fn seed_appointment(conn: &Connection, client: &Client, service: ServiceType, price: i64, start: &str) {
        insert_appointment(
            conn,
            &Appointment {
                id: Uuid::new_v4(),
                client_id: client.id,
                service_type: service,
                price: Decimal::new(price, 0),
                start_time: ts(start),
                duration_minutes: 60,
                notes: String::new(),
                is_completed: false,
            },
        )
        .unwrap();
    }

    fn seed_record(conn: &Connection, record_type: RecordType, on: NaiveDate, amount: i64) {
        insert_finance_record(
            conn,
            &FinanceRecord {
                id: Uuid::new_v4(),
                record_type,
                date: on,
                amount: Decimal::new(amount, 0),
                category: "שונות".into(),
                description: String::new(),
                appointment_id: None,
                created_at: NaiveDateTime::default(),
            },
        )
        .unwrap();
    }

    /// Two clients, five appointments, three ledger lines.
    fn seeded_db() -> Connection {
        let conn = open_memory_database().unwrap();

        let dana = seed_client(&conn, "דנה לוי", "0501111111");
        let sara = seed_client(&conn, "שרה כהן", "0502222222");

        seed_appointment(&conn, &dana, ServiceType::Brows, 120, "2024-02-07 09:00:00");
        seed_appointment(&conn, &dana, ServiceType::Gel, 180, "2024-03-05 10:00:00");
        seed_appointment(&conn, &dana, ServiceType::Face, 350, "2024-04-10 14:00:00");
        seed_appointment(&conn, &sara, ServiceType::Brows, 120, "2024-04-12 11:00:00");
        seed_appointment(&conn, &sara, ServiceType::Gel, 180, "2024-04-16 15:00:00");

        seed_record(&conn, RecordType::Income, date(2024, 1, 15), 1200);
        seed_record(&conn, RecordType::Income, date(2024, 4, 3), 500);
        seed_record(&conn, RecordType::Expense, date(2024, 4, 5), 200);

        conn
    }

    fn ask(conn: &Connection, q: &str) -> String {
        answer(conn, q, today()).unwrap()
    }

    #[test]
    fn rule_order_is_fixed() {
        let order: Vec<&str> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            order,
            vec![
                "last-visit-by-name",
                "visit-count-by-name",
                "monthly-income",
                "most-frequent-client",
                "most-profitable-client",
                "most-profitable-month",
                "service-count-in-period",
                "total-client-count",
                "total-appointment-count",
                "total-income",
                "total-expense",
                "revenue-by-service",
            ]
        );
    }

    #[test]
    fn client_count_answer_carries_exact_count() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה לקוחות יש לי?");
        assert_eq!(reply, "יש לך 2 לקוחות רשומות במערכת.");
    }

    #[test]
    fn unrecognized_question_returns_help_verbatim() {
        let conn = seeded_db();
        let reply = ask(&conn, "מה מזג האוויר מחר?");
        assert_eq!(reply, MessageTemplates::help());
    }

    #[test]
    fn last_visit_reports_date_time_and_service() {
        let conn = seeded_db();
        let reply = ask(&conn, "מתי דנה הייתה פה פעם אחרונה?");
        assert!(reply.contains("דנה לוי"));
        assert!(reply.contains("10/04/2024"));
        assert!(reply.contains("14:00"));
        assert!(reply.contains("טיפול פנים"));
    }

    #[test]
    fn last_visit_unknown_name() {
        let conn = seeded_db();
        let reply = ask(&conn, "מתי נועה הייתה פה?");
        assert_eq!(reply, "לא מצאתי תורים עבור לקוחה בשם 'נועה'.");
    }

    #[test]
    fn visit_count_matches_on_first_name() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה פעמים שרה הגיעה?");
        assert_eq!(reply, "שרה כהן ביקרה 2 פעמים.");
    }

    #[test]
    fn visit_count_without_a_known_name() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה פעמים היא הגיעה?");
        assert_eq!(reply, "לא מצאתי שם לקוחה בשאלה.");
    }

    #[test]
    fn named_month_income_uses_current_year() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה הרווחתי בינואר?");
        assert_eq!(reply, "הכנסות חודש ינואר 2024: 1,200 ₪");
    }

    #[test]
    fn unnamed_month_income_defaults_to_current_month() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה הרווחתי?");
        assert_eq!(reply, "הכנסות החודש הנוכחי (אפריל 2024): 500 ₪");
    }

    #[test]
    fn earnings_phrasing_is_consumed_before_service_revenue() {
        // "כמה הרווחתי מ..." matches the monthly-income predicate first;
        // the revenue-by-service rule never sees it. Order regression.
        let conn = seeded_db();
        let reply = ask(&conn, "כמה הרווחתי מלק ג'ל?");
        assert!(reply.starts_with("הכנסות החודש הנוכחי"));
    }

    #[test]
    fn most_frequent_client_answer() {
        let conn = seeded_db();
        let reply = ask(&conn, "מי הלקוחה הכי תכופה?");
        assert_eq!(reply, "הלקוחה הכי תכופה היא דנה לוי עם 3 ביקורים.");
    }

    #[test]
    fn most_profitable_client_wins_over_month_rule() {
        // "הכי רווחית" contains "הכי רווחי" — only the rule order keeps
        // the client answer ahead of the month answer.
        let conn = seeded_db();
        let reply = ask(&conn, "מי הלקוחה הכי רווחית?");
        assert_eq!(
            reply,
            "הלקוחה הכי רווחית היא דנה לוי עם הכנסה כוללת של 650 ₪."
        );
    }

    #[test]
    fn most_profitable_month_answer() {
        let conn = seeded_db();
        let reply = ask(&conn, "איזה חודש הכי רווחי?");
        assert_eq!(reply, "החודש הכי רווחי היה ינואר 2024 עם הכנסה של 1,200 ₪.");
    }

    #[test]
    fn service_count_scopes_to_week() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה טיפולי לק ג'ל השבוע?");
        assert_eq!(reply, "ביצעת 1 טיפולי לק ג'ל השבוע.");
    }

    #[test]
    fn service_count_all_time_without_period() {
        let conn = seeded_db();
        let reply = ask(&conn, "כמה טיפולי גבות עשיתי?");
        assert_eq!(reply, "ביצעת 2 טיפולי גבות בסך הכל.");
    }

    #[test]
    fn appointment_count_week_and_total() {
        let conn = seeded_db();
        assert_eq!(ask(&conn, "כמה תורים השבוע?"), "יש 1 תורים השבוע.");
        assert_eq!(
            ask(&conn, "כמה תורים יש במערכת?"),
            "יש 5 תורים בסך הכל במערכת."
        );
    }

    #[test]
    fn total_income_and_expense_answers() {
        let conn = seeded_db();
        assert_eq!(ask(&conn, "מה סך ההכנסות?"), "סך כל ההכנסות: 1,700 ₪");
        assert_eq!(ask(&conn, "כמה הוצאות היו לי?"), "סך כל ההוצאות: 200 ₪");
    }

    #[test]
    fn rankings_on_empty_data_say_not_enough() {
        let conn = open_memory_database().unwrap();
        assert_eq!(
            ask(&conn, "מי הלקוחה הכי תכופה?"),
            MessageTemplates::insufficient_data()
        );
        assert_eq!(
            ask(&conn, "איזה חודש הכי רווחי?"),
            MessageTemplates::insufficient_data()
        );
    }

    #[test]
    fn revenue_rule_fires_when_reached_directly() {
        // Shadowed in the full chain (see the order test); exercised here
        // on its own to pin the aggregation it maps to.
        let conn = seeded_db();
        let reply = revenue_by_service(&conn, "כמה הרווחתי מגבות?", today())
            .unwrap()
            .unwrap();
        assert_eq!(reply, "הרווחת 240 ₪ מטיפולי גבות בסך הכל.");
    }
}
