//! Hebrew vocabulary the assistant recognizes: month names, service
//! aliases, and period keywords.

use crate::models::enums::ServiceType;

/// Full Hebrew month names, 1-indexed by calendar month.
pub const MONTHS: [(&str, u32); 12] = [
    ("ינואר", 1),
    ("פברואר", 2),
    ("מרץ", 3),
    ("אפריל", 4),
    ("מאי", 5),
    ("יוני", 6),
    ("יולי", 7),
    ("אוגוסט", 8),
    ("ספטמבר", 9),
    ("אוקטובר", 10),
    ("נובמבר", 11),
    ("דצמבר", 12),
];

/// Hebrew name of a calendar month.
pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .iter()
        .find(|(_, n)| *n == month)
        .map(|(name, _)| *name)
        .unwrap_or("")
}

/// First month mentioned in the question, if any.
pub fn detect_month(question: &str) -> Option<(&'static str, u32)> {
    MONTHS
        .iter()
        .find(|(name, _)| question.contains(name))
        .copied()
}

/// Service aliases in match order — longer aliases first so "לק ג'ל"
/// wins over the bare "לק".
pub const SERVICE_ALIASES: [(&str, ServiceType); 5] = [
    ("לק ג'ל", ServiceType::Gel),
    ("ג'ל", ServiceType::Gel),
    ("לק", ServiceType::Gel),
    ("גבות", ServiceType::Brows),
    ("פנים", ServiceType::Face),
];

/// Single prefix letters Hebrew glues onto nouns (ב-, ל-, מ-, ה-, ו-, ש-, כ-).
const PREFIX_LETTERS: [char; 7] = ['ב', 'ל', 'מ', 'ה', 'ו', 'ש', 'כ'];

/// Detect a service mention in the question.
///
/// Multi-word aliases match as substrings. Single-word aliases must match a
/// whole token (optionally behind one prefix letter) — a bare substring test
/// would let "לק" fire inside "לקוחות".
pub fn detect_service(question: &str) -> Option<(&'static str, ServiceType)> {
    for (alias, service) in SERVICE_ALIASES {
        let hit = if alias.contains(' ') {
            question.contains(alias)
        } else {
            question.split_whitespace().any(|token| {
                let token = token.trim_matches(|c: char| c.is_ascii_punctuation());
                if token == alias {
                    return true;
                }
                let mut chars = token.chars();
                matches!(chars.next(), Some(first) if PREFIX_LETTERS.contains(&first))
                    && chars.as_str() == alias
            })
        };
        if hit {
            return Some((alias, service));
        }
    }
    None
}

/// Period keyword detected in a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKeyword {
    ThisWeek,
    ThisMonth,
}

pub fn detect_period(question: &str) -> Option<PeriodKeyword> {
    if question.contains("השבוע") || question.contains("שבוע") {
        return Some(PeriodKeyword::ThisWeek);
    }
    if question.contains("החודש") || question.contains("חודש") {
        return Some(PeriodKeyword::ThisMonth);
    }
    None
}
