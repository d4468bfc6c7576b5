//! Declarative admin configuration.
//!
//! The record-administration collaborator (generic CRUD/search screens) is
//! driven entirely by this table: per entity, which columns its list shows,
//! which fields its search box covers, and which filters it offers.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EntityAdmin {
    pub entity: &'static str,
    pub list_display: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub list_filters: &'static [&'static str],
}

/// Site-wide titles for the admin screens.
#[derive(Debug, Clone, Serialize)]
pub struct SiteConfig {
    pub header: &'static str,
    pub title: &'static str,
    pub index_title: &'static str,
}

pub const SITE: SiteConfig = SiteConfig {
    header: "GlowDesk – ניהול",
    title: "GlowDesk",
    index_title: "לוח בקרה",
};

/// The full admin registry, one entry per stored entity.
pub const REGISTRY: &[EntityAdmin] = &[
    EntityAdmin {
        entity: "client",
        list_display: &["name", "age", "phone", "email", "birth_date", "created_at"],
        search_fields: &["name", "phone", "email"],
        list_filters: &[],
    },
    EntityAdmin {
        entity: "appointment",
        list_display: &["client", "service_type", "price", "start_time", "is_completed"],
        search_fields: &["client.name", "client.phone"],
        list_filters: &["service_type", "is_completed", "start_time"],
    },
    EntityAdmin {
        entity: "finance_record",
        list_display: &["record_type", "amount", "date", "category", "appointment"],
        search_fields: &[],
        list_filters: &["record_type", "date", "category"],
    },
    EntityAdmin {
        entity: "health_declaration",
        list_display: &["client", "submitted", "created_at"],
        search_fields: &["client.name", "client.phone", "client.email"],
        list_filters: &["submitted"],
    },
    EntityAdmin {
        entity: "personal_event",
        list_display: &["title", "start_time", "end_time"],
        search_fields: &[],
        list_filters: &["start_time"],
    },
];
