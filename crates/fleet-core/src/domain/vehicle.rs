use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Vehicle entity - a rentable asset owned by a host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price_per_day: f64,
    /// True means the vehicle may be newly booked.
    pub available: bool,
    /// Opaque URL into object storage.
    pub image_url: String,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(
        name: String,
        category: String,
        price_per_day: f64,
        image_url: String,
        host_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            category,
            price_per_day,
            available: true,
            image_url,
            host_id,
            created_at: Utc::now(),
        }
    }
}

/// Allow-listed sort fields for vehicle listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Category,
    PricePerDay,
    CreatedAt,
}

impl SortField {
    /// Parse a client-supplied sort field, rejecting anything off the
    /// allow-list.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "name" => Ok(SortField::Name),
            "category" => Ok(SortField::Category),
            "price_per_day" => Ok(SortField::PricePerDay),
            "created_at" => Ok(SortField::CreatedAt),
            other => Err(DomainError::InvalidQuery(format!(
                "unknown sort field: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(DomainError::InvalidQuery(format!(
                "unknown sort direction: {other}"
            ))),
        }
    }
}

/// Validated listing query: category/price filters, single-field sort,
/// offset/limit pagination.
#[derive(Debug, Clone)]
pub struct VehicleQuery {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<(SortField, SortDir)>,
    pub limit: u64,
    pub offset: u64,
}

impl Default for VehicleQuery {
    fn default() -> Self {
        Self {
            category: None,
            min_price: None,
            max_price: None,
            sort: None,
            limit: 10,
            offset: 0,
        }
    }
}

impl VehicleQuery {
    /// Validate the price range; both bounds are inclusive.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::InvalidQuery(
                    "min_price exceeds max_price".to_string(),
                ));
            }
        }
        if self.min_price.is_some_and(|p| p < 0.0) || self.max_price.is_some_and(|p| p < 0.0) {
            return Err(DomainError::InvalidQuery(
                "price bounds must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_allow_list() {
        assert!(SortField::parse("price_per_day").is_ok());
        assert!(matches!(
            SortField::parse("password_hash"),
            Err(DomainError::InvalidQuery(_))
        ));
    }

    #[test]
    fn inverted_price_range_is_rejected() {
        let query = VehicleQuery {
            min_price: Some(200.0),
            max_price: Some(100.0),
            ..Default::default()
        };
        assert!(matches!(
            query.validate(),
            Err(DomainError::InvalidQuery(_))
        ));
    }

    #[test]
    fn default_pagination() {
        let query = VehicleQuery::default();
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }
}
