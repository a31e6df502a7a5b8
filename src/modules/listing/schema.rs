use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::api::error::SystemError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    #[serde(rename = "1 BHK")]
    OneBhk,
    #[serde(rename = "2 BHK")]
    TwoBhk,
    #[serde(rename = "1 Bed")]
    OneBed,
    #[serde(rename = "2 Bed")]
    TwoBed,
    #[serde(rename = "3 Bed")]
    ThreeBed,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::OneBhk,
        PropertyType::TwoBhk,
        PropertyType::OneBed,
        PropertyType::TwoBed,
        PropertyType::ThreeBed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::OneBhk => "1 BHK",
            PropertyType::TwoBhk => "2 BHK",
            PropertyType::OneBed => "1 Bed",
            PropertyType::TwoBed => "2 Bed",
            PropertyType::ThreeBed => "3 Bed",
        }
    }
}

impl FromStr for PropertyType {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SystemError::bad_request(format!("Unknown property type '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TenantType {
    #[default]
    Bachelor,
    Family,
    Girls,
    #[serde(rename = "Working professionals")]
    WorkingProfessionals,
}

impl TenantType {
    pub const ALL: [TenantType; 4] = [
        TenantType::Bachelor,
        TenantType::Family,
        TenantType::Girls,
        TenantType::WorkingProfessionals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TenantType::Bachelor => "Bachelor",
            TenantType::Family => "Family",
            TenantType::Girls => "Girls",
            TenantType::WorkingProfessionals => "Working professionals",
        }
    }
}

impl FromStr for TenantType {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SystemError::bad_request(format!("Unknown tenant type '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OwnerType {
    #[default]
    #[serde(rename = "Direct Owner")]
    DirectOwner,
    Agent,
}

impl OwnerType {
    pub const ALL: [OwnerType; 2] = [OwnerType::DirectOwner, OwnerType::Agent];

    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::DirectOwner => "Direct Owner",
            OwnerType::Agent => "Agent",
        }
    }
}

impl FromStr for OwnerType {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SystemError::bad_request(format!("Unknown owner type '{s}'")))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TenantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw `room_listings` row. Enum columns are plain text here and only become
/// typed values through [`Listing::try_from`].
#[derive(Debug, Clone, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub location: String,
    pub price: i64,
    pub property_type: String,
    pub tenant_type: String,
    pub owner_type: String,
    pub contact_number: String,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub location: String,
    pub price: i64,
    pub property_type: PropertyType,
    pub tenant_type: TenantType,
    pub owner_type: OwnerType,
    pub contact_number: String,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = SystemError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(Listing {
            property_type: row.property_type.parse()?,
            tenant_type: row.tenant_type.parse()?,
            owner_type: row.owner_type.parse()?,
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            location: row.location,
            price: row.price,
            contact_number: row.contact_number,
            images: row.images,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
