use crate::domain::catalog::{ServiceCatalog, ServiceTypeId};
use crate::domain::money::Money;
use crate::domain::ports::{
    NotificationSenderBox, PaymentProcessorBox, RequestStoreBox, VendorDirectoryBox,
    VendorStoreBox,
};
use crate::domain::request::{HappyCode, RequestId, RequestStatus, RequesterId, ServiceRequest};
use crate::domain::settlement::CommissionSchedule;
use crate::domain::vendor::{ApprovalStatus, Vendor, VendorId};
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Engine configuration: the service catalog, the commission schedule and an
/// optional seed for Happy Code generation. A seeded engine draws the same
/// codes for the same operation stream, which is what makes scripted replays
/// possible.
#[derive(Default)]
pub struct EngineConfig {
    pub catalog: ServiceCatalog,
    pub commissions: CommissionSchedule,
    pub code_seed: Option<u64>,
}

/// The engine's outward-facing collaborators, injected at construction.
pub struct Collaborators {
    pub directory: VendorDirectoryBox,
    pub notifier: NotificationSenderBox,
    pub payments: PaymentProcessorBox,
}

/// Outcome of a successful completion: the settled request plus whether the
/// payout collaborator accepted the vendor transfer. The lifecycle commit
/// stands either way.
#[derive(Debug)]
pub struct Completion {
    pub request: ServiceRequest,
    pub payment_processed: bool,
}

/// Marketplace-wide aggregates for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_vendors: usize,
    pub pending_approvals: usize,
    #[serde(serialize_with = "money_as_float")]
    pub total_revenue: Money,
    pub active_requests: usize,
}

/// One vendor's view of their own book of work.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStats {
    #[serde(serialize_with = "money_as_float")]
    pub total_earnings: Money,
    pub completed_jobs: usize,
    pub pending_jobs: usize,
    pub approval_status: ApprovalStatus,
}

fn requester_handle(requester_id: RequesterId) -> String {
    format!("requester-{requester_id}")
}

/// Stats payloads carry money as bare JSON numbers, not decimal strings.
fn money_as_float<S>(money: &Money, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    rust_decimal::serde::float::serialize(&money.value(), serializer)
}

/// The main entry point for the marketplace.
///
/// `MarketplaceEngine` drives vendor onboarding, the request lifecycle and
/// Happy Code settlement. It owns the storage ports; every mutation is
/// committed through the store's `transition`, which replaces a record only
/// while it still matches the snapshot the operation read, so concurrent
/// actors racing on one record admit at most one winner. Notifications and
/// payouts are dispatched strictly after the commit and never roll it back.
pub struct MarketplaceEngine {
    catalog: ServiceCatalog,
    commissions: CommissionSchedule,
    requests: RequestStoreBox,
    vendors: VendorStoreBox,
    directory: VendorDirectoryBox,
    notifier: NotificationSenderBox,
    payments: PaymentProcessorBox,
    next_request_id: AtomicU64,
    next_vendor_id: AtomicU64,
    codes: Mutex<StdRng>,
}

impl MarketplaceEngine {
    /// Creates a new `MarketplaceEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `requests` - The store for service requests.
    /// * `vendors` - The store for vendor records.
    /// * `collaborators` - The dispatch, notification and payout ports.
    /// * `config` - Catalog, commission schedule and Happy Code seed.
    pub fn new(
        requests: RequestStoreBox,
        vendors: VendorStoreBox,
        collaborators: Collaborators,
        config: EngineConfig,
    ) -> Self {
        let rng = match config.code_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            catalog: config.catalog,
            commissions: config.commissions,
            requests,
            vendors,
            directory: collaborators.directory,
            notifier: collaborators.notifier,
            payments: collaborators.payments,
            next_request_id: AtomicU64::new(1),
            next_vendor_id: AtomicU64::new(1),
            codes: Mutex::new(rng),
        }
    }

    /// Opens a new service request priced at the catalog base price.
    pub async fn create_request(
        &self,
        requester_id: RequesterId,
        service_type: ServiceTypeId,
        description: &str,
        address: &str,
    ) -> Result<ServiceRequest> {
        let service = self.catalog.by_id(service_type).ok_or_else(|| {
            MarketError::Validation(format!("unknown service type {service_type}"))
        })?;

        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let request = ServiceRequest::new(
            id,
            requester_id,
            service_type,
            service.base_price,
            description,
            address,
        );
        self.requests.store(request.clone()).await?;

        tracing::info!(
            request = id,
            service = %service.name,
            price = %service.base_price,
            "request created"
        );
        self.send_notification(
            &requester_handle(requester_id),
            "Request received. We'll assign a vendor to you shortly.",
        )
        .await;
        Ok(request)
    }

    /// Assigns a vendor to a pending request, optionally with a visit time.
    pub async fn assign(
        &self,
        request_id: RequestId,
        vendor_id: VendorId,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<ServiceRequest> {
        let snapshot = self.load_request(request_id).await?;
        let vendor = self.load_vendor(vendor_id).await?;

        if !vendor.is_approved() {
            return Err(MarketError::InvalidState(format!(
                "vendor {} is {}, only approved vendors take assignments",
                vendor.id, vendor.approval_status
            )));
        }
        if vendor.service_type != snapshot.service_type {
            return Err(MarketError::InvalidState(format!(
                "vendor {} does not offer service type {}",
                vendor.id, snapshot.service_type
            )));
        }

        let mut request = snapshot.clone();
        request.assign(vendor_id, scheduled_at)?;
        let request = self.requests.transition(request, &snapshot).await?;

        tracing::info!(request = request_id, vendor = vendor_id, "request assigned");
        self.send_notification(
            &vendor.email,
            &format!("You have been assigned request {request_id}."),
        )
        .await;
        Ok(request)
    }

    /// Assigns the nearest approved vendor, as chosen by the directory.
    pub async fn dispatch(&self, request_id: RequestId) -> Result<ServiceRequest> {
        let request = self.load_request(request_id).await?;
        let vendor_id = self
            .directory
            .find_nearest_approved(&request.address, request.service_type)
            .await?
            .ok_or_else(|| {
                MarketError::NotFound(format!(
                    "no approved vendor for service type {}",
                    request.service_type
                ))
            })?;
        self.assign(request_id, vendor_id, None).await
    }

    /// Moves an assigned request into progress and shares a fresh Happy Code
    /// with the requester.
    pub async fn start_work(&self, request_id: RequestId) -> Result<ServiceRequest> {
        let snapshot = self.load_request(request_id).await?;

        let code = {
            let mut rng = self.codes.lock().await;
            HappyCode::generate(&mut *rng)
        };
        let mut request = snapshot.clone();
        request.start_work(code.clone())?;
        let request = self.requests.transition(request, &snapshot).await?;

        tracing::info!(request = request_id, "work started");
        self.send_notification(
            &requester_handle(request.requester_id),
            &format!("Your Happy Code is {code}. Share it with the vendor once the job is done."),
        )
        .await;
        Ok(request)
    }

    /// Cancels a request. Cancelling twice is a no-op.
    pub async fn cancel(&self, request_id: RequestId) -> Result<ServiceRequest> {
        let snapshot = self.load_request(request_id).await?;
        if snapshot.status == RequestStatus::Cancelled {
            return Ok(snapshot);
        }

        let mut request = snapshot.clone();
        request.cancel()?;
        let request = self.requests.transition(request, &snapshot).await?;

        tracing::info!(request = request_id, "request cancelled");
        Ok(request)
    }

    /// Settles an in-progress request against the submitted Happy Code.
    ///
    /// The gates fire in a fixed order: code format, request existence,
    /// lifecycle status, then the shared-secret check. Status, completion
    /// time and settlement are committed in a single guarded write; payout
    /// and notifications follow the commit and cannot undo it.
    pub async fn complete(
        &self,
        request_id: RequestId,
        submitted_code: &str,
    ) -> Result<Completion> {
        let code = HappyCode::parse(submitted_code)?;
        let snapshot = self.load_request(request_id).await?;

        let rate = self.commissions.rate_for(snapshot.service_type);
        let mut request = snapshot.clone();
        request.complete(&code, rate, Utc::now())?;
        let request = self.requests.transition(request, &snapshot).await?;

        tracing::info!(request = request_id, "request completed");
        let payment_processed = self.process_payout(&request).await;

        if let Some(vendor_id) = request.vendor_id
            && let Ok(vendor) = self.load_vendor(vendor_id).await
            && let Some(settlement) = request.settlement
        {
            self.send_notification(
                &vendor.email,
                &format!(
                    "Request {request_id} is complete. Your payment of {} is on its way.",
                    settlement.vendor_payment
                ),
            )
            .await;
        }
        self.send_notification(
            &requester_handle(request.requester_id),
            "Thank you! Your request has been completed.",
        )
        .await;

        Ok(Completion {
            request,
            payment_processed,
        })
    }

    /// Registers a vendor as pending approval, with the flat fee unpaid.
    pub async fn register_vendor(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
        service_type: ServiceTypeId,
    ) -> Result<Vendor> {
        if self.catalog.by_id(service_type).is_none() {
            return Err(MarketError::Validation(format!(
                "unknown service type {service_type}"
            )));
        }

        let id = self.next_vendor_id.fetch_add(1, Ordering::Relaxed);
        let vendor = Vendor::new(id, name, email, phone, address, service_type);
        self.vendors.store(vendor.clone()).await?;

        tracing::info!(vendor = id, service = service_type, "vendor registered");
        self.send_notification(
            email,
            "Thanks for registering! Your application is under review.",
        )
        .await;
        Ok(vendor)
    }

    /// Approves a pending vendor.
    pub async fn approve_vendor(&self, vendor_id: VendorId) -> Result<Vendor> {
        let snapshot = self.load_vendor(vendor_id).await?;
        let mut vendor = snapshot.clone();
        vendor.approve()?;
        let vendor = self.vendors.transition(vendor, &snapshot).await?;

        tracing::info!(vendor = vendor_id, "vendor approved");
        self.send_notification(
            &vendor.email,
            "Your application has been approved. You can now take assignments.",
        )
        .await;
        Ok(vendor)
    }

    /// Rejects a pending vendor.
    pub async fn reject_vendor(&self, vendor_id: VendorId) -> Result<Vendor> {
        let snapshot = self.load_vendor(vendor_id).await?;
        let mut vendor = snapshot.clone();
        vendor.reject()?;
        let vendor = self.vendors.transition(vendor, &snapshot).await?;

        tracing::info!(vendor = vendor_id, "vendor rejected");
        self.send_notification(
            &vendor.email,
            "Unfortunately your application was not approved.",
        )
        .await;
        Ok(vendor)
    }

    /// Marks the vendor's registration fee as paid. Independent of approval.
    pub async fn record_fee_payment(&self, vendor_id: VendorId) -> Result<Vendor> {
        let snapshot = self.load_vendor(vendor_id).await?;
        let mut vendor = snapshot.clone();
        vendor.record_fee_payment();
        let vendor = self.vendors.transition(vendor, &snapshot).await?;

        tracing::info!(vendor = vendor_id, "registration fee recorded");
        Ok(vendor)
    }

    /// Marketplace-wide aggregates: vendor counts, open work and the
    /// commission revenue collected so far.
    pub async fn admin_stats(&self) -> Result<AdminStats> {
        let vendors = self.vendors.all_vendors().await?;
        let requests = self.requests.all_requests().await?;

        let total_revenue = requests
            .iter()
            .filter_map(|r| r.settlement.as_ref())
            .fold(Money::ZERO, |acc, s| acc + s.commission);

        Ok(AdminStats {
            total_vendors: vendors.len(),
            pending_approvals: vendors
                .iter()
                .filter(|v| v.approval_status == ApprovalStatus::Pending)
                .count(),
            total_revenue,
            active_requests: requests.iter().filter(|r| !r.status.is_terminal()).count(),
        })
    }

    /// One vendor's earnings and workload.
    pub async fn vendor_stats(&self, vendor_id: VendorId) -> Result<VendorStats> {
        let vendor = self.load_vendor(vendor_id).await?;
        let requests = self.requests.all_requests().await?;

        let mut total_earnings = Money::ZERO;
        let mut completed_jobs = 0;
        let mut pending_jobs = 0;
        for request in requests.iter().filter(|r| r.vendor_id == Some(vendor_id)) {
            match request.status {
                RequestStatus::Completed => {
                    completed_jobs += 1;
                    if let Some(settlement) = &request.settlement {
                        total_earnings += settlement.vendor_payment;
                    }
                }
                RequestStatus::Assigned | RequestStatus::InProgress => pending_jobs += 1,
                _ => {}
            }
        }

        Ok(VendorStats {
            total_earnings,
            completed_jobs,
            pending_jobs,
            approval_status: vendor.approval_status,
        })
    }

    /// Snapshot of every request, ids ascending.
    pub async fn list_requests(&self) -> Result<Vec<ServiceRequest>> {
        let mut requests = self.requests.all_requests().await?;
        requests.sort_unstable_by_key(|r| r.id);
        Ok(requests)
    }

    /// Snapshot of every vendor, ids ascending.
    pub async fn list_vendors(&self) -> Result<Vec<Vendor>> {
        let mut vendors = self.vendors.all_vendors().await?;
        vendors.sort_unstable_by_key(|v| v.id);
        Ok(vendors)
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    async fn load_request(&self, request_id: RequestId) -> Result<ServiceRequest> {
        self.requests
            .get(request_id)
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("request {request_id} not found")))
    }

    async fn load_vendor(&self, vendor_id: VendorId) -> Result<Vendor> {
        self.vendors
            .get(vendor_id)
            .await?
            .ok_or_else(|| MarketError::NotFound(format!("vendor {vendor_id} not found")))
    }

    async fn process_payout(&self, request: &ServiceRequest) -> bool {
        let (Some(vendor_id), Some(settlement)) = (request.vendor_id, request.settlement) else {
            return false;
        };
        match self
            .payments
            .payout(vendor_id, settlement.vendor_payment)
            .await
        {
            Ok(receipt) => {
                tracing::info!(
                    request = request.id,
                    vendor = vendor_id,
                    amount = %receipt.amount,
                    "vendor payout processed"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    request = request.id,
                    vendor = vendor_id,
                    error = %e,
                    "vendor payout failed"
                );
                false
            }
        }
    }

    async fn send_notification(&self, recipient: &str, message: &str) {
        if let Err(e) = self.notifier.notify(recipient, message).await {
            tracing::warn!(recipient, error = %e, "notification failed");
        }
    }
}
