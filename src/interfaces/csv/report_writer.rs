use crate::domain::catalog::ServiceCatalog;
use crate::domain::money::Money;
use crate::domain::request::{RequestStatus, ServiceRequest};
use crate::domain::vendor::{ApprovalStatus, Vendor};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct RequestRow {
    id: u64,
    requester: u64,
    vendor: Option<u64>,
    service: String,
    status: RequestStatus,
    price: Money,
    commission: Option<Money>,
    vendor_payment: Option<Money>,
    happy_code: Option<String>,
    created_at: DateTime<Utc>,
    scheduled_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct VendorRow {
    id: u64,
    name: String,
    email: String,
    phone: String,
    service: String,
    approval_status: ApprovalStatus,
    registration_fee: Money,
    fee_paid: bool,
}

/// Writes the final marketplace reports as CSV.
///
/// Columns are derived from the row structs, so the header always matches
/// the data. Absent values (no vendor yet, no settlement) become empty
/// fields.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(target: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(target),
        }
    }

    /// Writes the request ledger, one row per request.
    pub fn write_requests(
        &mut self,
        catalog: &ServiceCatalog,
        requests: &[ServiceRequest],
    ) -> Result<()> {
        for request in requests {
            let service = catalog
                .by_id(request.service_type)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| request.service_type.to_string());
            self.writer.serialize(RequestRow {
                id: request.id,
                requester: request.requester_id,
                vendor: request.vendor_id,
                service,
                status: request.status,
                price: request.price,
                commission: request.settlement.map(|s| s.commission),
                vendor_payment: request.settlement.map(|s| s.vendor_payment),
                happy_code: request.happy_code.as_ref().map(|c| c.as_str().to_string()),
                created_at: request.created_at,
                scheduled_at: request.scheduled_at,
                completed_at: request.completed_at,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the vendor roster.
    pub fn write_vendors(&mut self, catalog: &ServiceCatalog, vendors: &[Vendor]) -> Result<()> {
        for vendor in vendors {
            let service = catalog
                .by_id(vendor.service_type)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| vendor.service_type.to_string());
            self.writer.serialize(VendorRow {
                id: vendor.id,
                name: vendor.name.clone(),
                email: vendor.email.clone(),
                phone: vendor.phone.clone(),
                service,
                approval_status: vendor.approval_status,
                registration_fee: vendor.registration_fee,
                fee_paid: vendor.fee_paid,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
