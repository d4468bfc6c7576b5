use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ServiceType {
    Face => "face",
    Brows => "brows",
    Gel => "gel",
});

impl ServiceType {
    /// Hebrew display label, as shown to the business owner.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Face => "טיפול פנים",
            Self::Brows => "עיצוב גבות",
            Self::Gel => "לק ג'ל",
        }
    }

    pub const ALL: [ServiceType; 3] = [Self::Face, Self::Brows, Self::Gel];
}

str_enum!(RecordType {
    Income => "income",
    Expense => "expense",
});

impl RecordType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "הכנסה",
            Self::Expense => "הוצאה",
        }
    }
}
