//! Wire types for the Hetzner DNS API v1

use serde::{Deserialize, Serialize};

use dynzone_core::traits::RecordSpec;

#[derive(Debug, Deserialize)]
pub struct ZoneListResponse {
    pub zones: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordListResponse {
    pub records: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordEnvelope {
    pub record: Record,
}

/// Body shared by record creation and updates
#[derive(Debug, Serialize)]
pub struct RecordPayload<'a> {
    pub value: &'a str,
    pub ttl: u32,
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub name: &'a str,
    pub zone_id: &'a str,
}

impl<'a> RecordPayload<'a> {
    pub fn new(zone_id: &'a str, spec: &'a RecordSpec) -> Self {
        Self {
            value: &spec.value,
            ttl: spec.ttl,
            record_type: spec.record_type.as_str(),
            name: &spec.name,
            zone_id,
        }
    }
}
