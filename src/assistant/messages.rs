//! Hebrew answer templates. All business answers are assembled here so the
//! engine stays pure matching + data plumbing.

use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::enums::ServiceType;

/// Format an amount as whole shekels with thousands separators: 12345 → "12,345".
pub fn format_shekels(amount: Decimal) -> String {
    let whole = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0);
    let digits = whole.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub struct MessageTemplates;

impl MessageTemplates {
    pub fn last_visit(
        client_name: &str,
        start_time: NaiveDateTime,
        service: ServiceType,
    ) -> String {
        format!(
            "{} הייתה לאחרונה ב-{} בשעה {}, לטיפול {}.",
            client_name,
            start_time.format("%d/%m/%Y"),
            start_time.format("%H:%M"),
            service.label(),
        )
    }

    pub fn no_visits_for(name: &str) -> String {
        format!("לא מצאתי תורים עבור לקוחה בשם '{name}'.")
    }

    pub fn name_not_recognized() -> String {
        "לא הצלחתי לזהות שם לקוחה. נסי: 'מתי דנה הייתה פה פעם אחרונה?'".to_string()
    }

    pub fn visit_count(client_name: &str, visits: i64) -> String {
        format!("{client_name} ביקרה {visits} פעמים.")
    }

    pub fn no_client_in_question() -> String {
        "לא מצאתי שם לקוחה בשאלה.".to_string()
    }

    pub fn month_income(month_name: &str, year: i32, total: Decimal) -> String {
        format!(
            "הכנסות חודש {month_name} {year}: {} ₪",
            format_shekels(total)
        )
    }

    pub fn current_month_income(month_name: &str, year: i32, total: Decimal) -> String {
        format!(
            "הכנסות החודש הנוכחי ({month_name} {year}): {} ₪",
            format_shekels(total)
        )
    }

    pub fn most_frequent_client(client_name: &str, visits: i64) -> String {
        format!("הלקוחה הכי תכופה היא {client_name} עם {visits} ביקורים.")
    }

    pub fn most_profitable_client(client_name: &str, revenue: Decimal) -> String {
        format!(
            "הלקוחה הכי רווחית היא {client_name} עם הכנסה כוללת של {} ₪.",
            format_shekels(revenue)
        )
    }

    pub fn most_profitable_month(month_name: &str, year: i32, total: Decimal) -> String {
        format!(
            "החודש הכי רווחי היה {month_name} {year} עם הכנסה של {} ₪.",
            format_shekels(total)
        )
    }

    pub fn insufficient_data() -> String {
        "אין מספיק נתונים עדיין.".to_string()
    }

    pub fn service_count_this_week(service_label: &str, count: i64) -> String {
        format!("ביצעת {count} טיפולי {service_label} השבוע.")
    }

    pub fn service_count_this_month(service_label: &str, count: i64) -> String {
        format!("ביצעת {count} טיפולי {service_label} החודש.")
    }

    pub fn service_count_total(service_label: &str, count: i64) -> String {
        format!("ביצעת {count} טיפולי {service_label} בסך הכל.")
    }

    pub fn client_count(count: i64) -> String {
        format!("יש לך {count} לקוחות רשומות במערכת.")
    }

    pub fn appointments_this_week(count: i64) -> String {
        format!("יש {count} תורים השבוע.")
    }

    pub fn appointments_this_month(count: i64) -> String {
        format!("יש {count} תורים החודש.")
    }

    pub fn appointments_total(count: i64) -> String {
        format!("יש {count} תורים בסך הכל במערכת.")
    }

    pub fn total_income(total: Decimal) -> String {
        format!("סך כל ההכנסות: {} ₪", format_shekels(total))
    }

    pub fn total_expenses(total: Decimal) -> String {
        format!("סך כל ההוצאות: {} ₪", format_shekels(total))
    }

    pub fn service_revenue(service_label: &str, total: Decimal) -> String {
        format!(
            "הרווחת {} ₪ מטיפולי {service_label} בסך הכל.",
            format_shekels(total)
        )
    }

    /// Fixed fallback listing example questions. Returned verbatim whenever
    /// no rule matches.
    pub fn help() -> String {
        "אני יכולה לענות על שאלות כמו:\n\
         • 'מתי דנה הייתה פה פעם אחרונה?'\n\
         • 'כמה פעמים שרה הגיעה?'\n\
         • 'כמה הרווחתי בינואר?'\n\
         • 'מי הלקוחה הכי תכופה?'\n\
         • 'מי הלקוחה הכי רווחית?'\n\
         • 'איזה חודש הכי רווחי?'\n\
         • 'כמה טיפולי לק ג'ל החודש?'\n\
         • 'כמה לקוחות יש לי?'\n\
         • 'כמה תורים השבוע?'\n\
         • 'מה סך ההכנסות?'"
            .to_string()
    }
}

/// Example questions surfaced next to the chat box.
pub fn example_questions() -> Vec<&'static str> {
    vec![
        "מתי דנה הייתה פה פעם אחרונה?",
        "כמה פעמים שרה הגיעה?",
        "כמה הרווחתי בינואר?",
        "מי הלקוחה הכי תכופה?",
        "מי הלקוחה הכי רווחית?",
        "איזה חודש הכי רווחי?",
        "כמה טיפולי לק ג'ל החודש?",
        "כמה תורים השבוע?",
        "מה סך ההכנסות?",
        "כמה לקוחות יש לי?",
    ]
}
