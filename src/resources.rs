//! List endpoints of the fleet API
//!
//! A [`Resource`] names one paged list endpoint: the path to GET and the key
//! the records live under in the response body.

use crate::error::{Error, Result};
use serde::Serialize;

/// A paged list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resource {
    /// Short name used on the command line
    pub name: &'static str,
    /// Path relative to the API base URL
    pub path: &'static str,
    /// Key of the record array in each response
    pub items_key: &'static str,
}

impl Resource {
    const fn new(name: &'static str, path: &'static str, items_key: &'static str) -> Self {
        Self {
            name,
            path,
            items_key,
        }
    }

    /// Every known resource, in display order
    pub fn all() -> &'static [Resource] {
        ALL
    }

    /// Look up a resource by its short name
    pub fn by_name(name: &str) -> Result<Resource> {
        ALL.iter()
            .find(|r| r.name == name)
            .copied()
            .ok_or_else(|| Error::UnknownResource {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

pub const VEHICLES: Resource = Resource::new("vehicles", "/v1/vehicles", "vehicles");
/// Drivers and other company users
pub const USERS: Resource = Resource::new("users", "/v1/users", "users");
pub const ASSETS: Resource = Resource::new("assets", "/v1/assets", "assets");
pub const GROUPS: Resource = Resource::new("groups", "/v1/groups", "groups");
/// Hours-of-service log entries
pub const HOS_LOGS: Resource = Resource::new("hos_logs", "/v1/hos_logs", "logs");
/// Remaining drive and duty time per driver
pub const AVAILABLE_TIME: Resource =
    Resource::new("available_time", "/v1/available_time", "users");
pub const DISPATCHES: Resource = Resource::new("dispatches", "/v1/dispatches", "dispatches");
pub const DISPATCH_LOCATIONS: Resource = Resource::new(
    "dispatch_locations",
    "/v1/dispatch_locations",
    "dispatch_locations",
);
pub const DOCUMENTS: Resource = Resource::new("documents", "/v1/documents", "documents");
pub const INSPECTION_REPORTS: Resource = Resource::new(
    "inspection_reports",
    "/v1/inspection_reports",
    "inspection_reports",
);
pub const DRIVER_PERFORMANCE_EVENTS: Resource = Resource::new(
    "driver_performance_events",
    "/v1/driver_performance_events",
    "driver_performance_events",
);
pub const FUEL_PURCHASES: Resource =
    Resource::new("fuel_purchases", "/v1/fuel_purchases", "fuel_purchases");
pub const MESSAGES: Resource = Resource::new("messages", "/v1/messages", "messages");
pub const COMPANY_WEBHOOKS: Resource =
    Resource::new("company_webhooks", "/v1/company_webhooks", "company_webhooks");

const ALL: &[Resource] = &[
    VEHICLES,
    USERS,
    ASSETS,
    GROUPS,
    HOS_LOGS,
    AVAILABLE_TIME,
    DISPATCHES,
    DISPATCH_LOCATIONS,
    DOCUMENTS,
    INSPECTION_REPORTS,
    DRIVER_PERFORMANCE_EVENTS,
    FUEL_PURCHASES,
    MESSAGES,
    COMPANY_WEBHOOKS,
];
