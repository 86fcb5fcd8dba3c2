use crate::domain::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type ServiceTypeId = u32;

/// A bookable service offering with its platform base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: ServiceTypeId,
    pub name: String,
    pub description: String,
    pub base_price: Money,
}

/// Static registry of the service types the platform offers.
///
/// Requests and vendor registrations are validated against this catalog;
/// the base price here becomes the request price at creation time.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<ServiceType>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<ServiceType>) -> Self {
        Self { services }
    }

    /// The stock catalog of six home services.
    pub fn standard() -> Self {
        let entry = |id: ServiceTypeId, name: &str, description: &str, base_price: i64| ServiceType {
            id,
            name: name.to_string(),
            description: description.to_string(),
            base_price: Money::new(Decimal::from(base_price)),
        };
        Self::new(vec![
            entry(1, "Plumbing", "Water pipe repairs, installations, and maintenance", 500),
            entry(2, "Electrical", "Electrical repairs, wiring, and installations", 600),
            entry(3, "Cleaning", "House cleaning, office cleaning, deep cleaning", 300),
            entry(4, "Carpentry", "Furniture repair, wood work, installations", 800),
            entry(5, "Painting", "Wall painting, home painting services", 1000),
            entry(6, "AC Repair", "Air conditioner repair and maintenance", 700),
        ])
    }

    pub fn by_id(&self, id: ServiceTypeId) -> Option<&ServiceType> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&ServiceType> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn list(&self) -> &[ServiceType] {
        &self.services
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
