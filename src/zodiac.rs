//! Zodiac cards — display-only facts derived from a client's birth date.
//!
//! Purely presentational: a sign, its symbol, and a beauty tip for the
//! dashboard greeting cards. Not part of the stored data model.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zodiac {
    pub sign: &'static str,
    pub symbol: &'static str,
    pub tip: &'static str,
}

/// Resolve the zodiac card for a birth date.
pub fn zodiac_for(birth_date: NaiveDate) -> Zodiac {
    let (m, d) = (birth_date.month(), birth_date.day());
    let (sign, symbol, tip) = match () {
        _ if (m == 3 && d >= 21) || (m == 4 && d <= 19) => {
            ("טלה", "♈", "האנרגיה שלך גבוהה היום – זמן מושלם לטיפול פנים מחדש!")
        }
        _ if (m == 4 && d >= 20) || (m == 5 && d <= 20) => {
            ("שור", "♉", "פינוק הגוף ממש בא לך היום – כיפה מושלמת!")
        }
        _ if (m == 5 && d >= 21) || (m == 6 && d <= 20) => {
            ("תאומים", "♊", "נסי סגנון חדש ומרענן – היום הוא יום של שינויים טובים!")
        }
        _ if (m == 6 && d >= 21) || (m == 7 && d <= 22) => {
            ("סרטן", "♋", "הזמן הטוב ביותר לטפל בעצמך ולגלות יופי פנימי!")
        }
        _ if (m == 7 && d >= 23) || (m == 8 && d <= 22) => {
            ("אריה", "♌", "הבליטי את הקרינה הטבעית שלך – היום הוא יום הזוהר שלך!")
        }
        _ if (m == 8 && d >= 23) || (m == 9 && d <= 22) => {
            ("בתולה", "♍", "יום מצוין לטיפולי עור מדוקדקים – הפרטים חשובים לך ובצדק!")
        }
        _ if (m == 9 && d >= 23) || (m == 10 && d <= 22) => {
            ("מאזניים", "♎", "האסתטיקה היא השפה שלך – היום תהיי מדהימה!")
        }
        _ if (m == 10 && d >= 23) || (m == 11 && d <= 21) => {
            ("עקרב", "♏", "הכוח הפנימי שלך בא לידי ביטוי – טיפוח עצמי מעצים!")
        }
        _ if (m == 11 && d >= 22) || (m == 12 && d <= 21) => {
            ("קשת", "♐", "פגישה חדשה תמלא אותך אנרגיה חדשה לדרך!")
        }
        _ if (m == 12 && d >= 22) || (m == 1 && d <= 19) => {
            ("גדי", "♑", "השקעה בעצמך היא תמיד נכונה – ומשתלמת!")
        }
        _ if (m == 1 && d >= 20) || (m == 2 && d <= 18) => {
            ("דלי", "♒", "ייחודיות היא החוזק שלך – היום היא מיוחדת בצורה שלה!")
        }
        _ => ("דגים", "♓", "הרגישות שלך היא יתרון – פינוק עצמי הוא חובה היום!"),
    };
    Zodiac { sign, symbol, tip }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_of(y: i32, m: u32, d: u32) -> &'static str {
        zodiac_for(NaiveDate::from_ymd_opt(y, m, d).unwrap()).sign
    }

    #[test]
    fn aries_starts_march_21() {
        assert_eq!(sign_of(1990, 3, 21), "טלה");
        assert_eq!(sign_of(1990, 3, 20), "דגים");
    }

    #[test]
    fn capricorn_spans_year_boundary() {
        assert_eq!(sign_of(1990, 12, 22), "גדי");
        assert_eq!(sign_of(1991, 1, 19), "גדי");
        assert_eq!(sign_of(1991, 1, 20), "דלי");
    }

    #[test]
    fn pisces_is_residual_bucket() {
        assert_eq!(sign_of(1990, 2, 19), "דגים");
        assert_eq!(sign_of(1990, 3, 1), "דגים");
    }

    #[test]
    fn every_sign_has_symbol_and_tip() {
        for m in 1..=12 {
            let z = zodiac_for(NaiveDate::from_ymd_opt(2000, m, 15).unwrap());
            assert!(!z.symbol.is_empty());
            assert!(!z.tip.is_empty());
        }
    }
}
