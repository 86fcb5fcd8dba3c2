use crate::domain::ports::{RequestStore, VendorStore};
use crate::domain::request::{RequestId, ServiceRequest};
use crate::domain::vendor::{Vendor, VendorId};
use crate::error::{MarketError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for service requests.
///
/// Uses `Arc<RwLock<HashMap<u64, ServiceRequest>>>` to allow shared concurrent
/// access. Clones share the same map, so one instance can back both the
/// engine and any read-side collaborator.
#[derive(Default, Clone)]
pub struct InMemoryRequestStore {
    requests: Arc<RwLock<HashMap<RequestId, ServiceRequest>>>,
}

impl InMemoryRequestStore {
    /// Creates a new, empty in-memory request store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn store(&self, request: ServiceRequest) -> Result<()> {
        let mut requests = self.requests.write().await;
        requests.insert(request.id, request);
        Ok(())
    }

    async fn get(&self, request_id: RequestId) -> Result<Option<ServiceRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.get(&request_id).cloned())
    }

    async fn transition(
        &self,
        request: ServiceRequest,
        expected: &ServiceRequest,
    ) -> Result<ServiceRequest> {
        let mut requests = self.requests.write().await;
        let live = requests.get(&request.id).ok_or_else(|| {
            MarketError::NotFound(format!("request {} not found", request.id))
        })?;
        if live.status != expected.status {
            return Err(MarketError::Conflict(format!(
                "request {} is {}, expected {}",
                request.id, live.status, expected.status
            )));
        }
        if live != expected {
            return Err(MarketError::Conflict(format!(
                "request {} changed since it was read",
                request.id
            )));
        }
        requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn all_requests(&self) -> Result<Vec<ServiceRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for vendors, with the same snapshot-guarded
/// `transition`.
#[derive(Default, Clone)]
pub struct InMemoryVendorStore {
    vendors: Arc<RwLock<HashMap<VendorId, Vendor>>>,
}

impl InMemoryVendorStore {
    /// Creates a new, empty in-memory vendor store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VendorStore for InMemoryVendorStore {
    async fn store(&self, vendor: Vendor) -> Result<()> {
        let mut vendors = self.vendors.write().await;
        vendors.insert(vendor.id, vendor);
        Ok(())
    }

    async fn get(&self, vendor_id: VendorId) -> Result<Option<Vendor>> {
        let vendors = self.vendors.read().await;
        Ok(vendors.get(&vendor_id).cloned())
    }

    async fn transition(&self, vendor: Vendor, expected: &Vendor) -> Result<Vendor> {
        let mut vendors = self.vendors.write().await;
        let live = vendors.get(&vendor.id).ok_or_else(|| {
            MarketError::NotFound(format!("vendor {} not found", vendor.id))
        })?;
        if live.approval_status != expected.approval_status {
            return Err(MarketError::Conflict(format!(
                "vendor {} is {}, expected {}",
                vendor.id, live.approval_status, expected.approval_status
            )));
        }
        if live != expected {
            return Err(MarketError::Conflict(format!(
                "vendor {} changed since it was read",
                vendor.id
            )));
        }
        vendors.insert(vendor.id, vendor.clone());
        Ok(vendor)
    }

    async fn all_vendors(&self) -> Result<Vec<Vendor>> {
        let vendors = self.vendors.read().await;
        Ok(vendors.values().cloned().collect())
    }
}
