use crate::domain::catalog::ServiceTypeId;
use crate::domain::money::Money;
use crate::domain::ports::{
    NotificationSender, PaymentProcessor, Receipt, VendorDirectory, VendorStoreBox,
};
use crate::domain::vendor::VendorId;
use crate::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Vendor directory backed by the vendor store.
///
/// Stands in for a geolocation service: among approved vendors offering the
/// requested service type it deterministically picks the lowest id, so
/// repeated runs over the same input dispatch the same way.
pub struct StoreBackedDirectory {
    vendors: VendorStoreBox,
}

impl StoreBackedDirectory {
    pub fn new(vendors: VendorStoreBox) -> Self {
        Self { vendors }
    }
}

#[async_trait]
impl VendorDirectory for StoreBackedDirectory {
    async fn find_nearest_approved(
        &self,
        address: &str,
        service_type: ServiceTypeId,
    ) -> Result<Option<VendorId>> {
        let mut candidates: Vec<VendorId> = self
            .vendors
            .all_vendors()
            .await?
            .into_iter()
            .filter(|v| v.is_approved() && v.service_type == service_type)
            .map(|v| v.id)
            .collect();
        candidates.sort_unstable();

        tracing::debug!(
            address,
            service_type,
            candidates = candidates.len(),
            "vendor lookup"
        );
        Ok(candidates.first().copied())
    }
}

/// Notification sender that writes every message to the log instead of an
/// outbound channel.
#[derive(Default, Clone)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationSender for TracingNotifier {
    async fn notify(&self, recipient: &str, message: &str) -> Result<()> {
        tracing::info!(recipient, message, "notification sent");
        Ok(())
    }
}

/// Payment processor that records every payout it is asked to make.
///
/// Clones share the receipt list, so a test can keep one clone and hand the
/// other to the engine.
#[derive(Default, Clone)]
pub struct RecordingPayments {
    receipts: Arc<RwLock<Vec<Receipt>>>,
}

impl RecordingPayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn receipts(&self) -> Vec<Receipt> {
        self.receipts.read().await.clone()
    }
}

#[async_trait]
impl PaymentProcessor for RecordingPayments {
    async fn payout(&self, vendor_id: VendorId, amount: Money) -> Result<Receipt> {
        let receipt = Receipt {
            vendor_id,
            amount,
            issued_at: Utc::now(),
        };
        let mut receipts = self.receipts.write().await;
        receipts.push(receipt.clone());
        Ok(receipt)
    }
}
