use crate::domain::catalog::ServiceTypeId;
use crate::domain::money::Money;
use crate::domain::request::{RequestId, ServiceRequest};
use crate::domain::vendor::{Vendor, VendorId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage port for service requests.
///
/// `transition` is the guarded write: it replaces the stored record only if
/// the live record still matches `expected`, the snapshot the caller read
/// before mutating, and fails with a conflict otherwise. Every mutation goes
/// through it, so two actors racing on the same request cannot both win and
/// no concurrent write is silently overwritten.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn store(&self, request: ServiceRequest) -> Result<()>;
    async fn get(&self, request_id: RequestId) -> Result<Option<ServiceRequest>>;
    async fn transition(
        &self,
        request: ServiceRequest,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest>;
    async fn all_requests(&self) -> Result<Vec<ServiceRequest>>;
}

/// Storage port for vendors, with the same snapshot-guarded write.
#[async_trait]
pub trait VendorStore: Send + Sync {
    async fn store(&self, vendor: Vendor) -> Result<()>;
    async fn get(&self, vendor_id: VendorId) -> Result<Option<Vendor>>;
    async fn transition(&self, vendor: Vendor, expected: &Vendor) -> Result<Vendor>;
    async fn all_vendors(&self) -> Result<Vec<Vendor>>;
}

/// Looks up the approved vendor closest to a service address.
#[async_trait]
pub trait VendorDirectory: Send + Sync {
    async fn find_nearest_approved(
        &self,
        address: &str,
        service_type: ServiceTypeId,
    ) -> Result<Option<VendorId>>;
}

/// Delivers a message to a requester or vendor contact.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn notify(&self, recipient: &str, message: &str) -> Result<()>;
}

/// Proof that a vendor payout was handed to the payment processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub vendor_id: VendorId,
    pub amount: Money,
    pub issued_at: DateTime<Utc>,
}

/// Pays a vendor their share of a settled request.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn payout(&self, vendor_id: VendorId, amount: Money) -> Result<Receipt>;
}

pub type RequestStoreBox = Box<dyn RequestStore>;
pub type VendorStoreBox = Box<dyn VendorStore>;
pub type VendorDirectoryBox = Box<dyn VendorDirectory>;
pub type NotificationSenderBox = Box<dyn NotificationSender>;
pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;

pub type RequestStoreFactory = Box<dyn Fn() -> RequestStoreBox + Send + Sync>;
pub type VendorStoreFactory = Box<dyn Fn() -> VendorStoreBox + Send + Sync>;
