use crate::domain::catalog::ServiceTypeId;
use crate::domain::money::Money;
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type VendorId = u64;

/// Flat registration fee charged to every vendor, in rupees.
const REGISTRATION_FEE_RUPEES: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A registered service provider.
///
/// Vendors enter the registry as `pending` and are moved exactly once by an
/// admin decision to `approved` or `rejected`; there is no path back. Only
/// approved vendors can take assignments. The registration fee is tracked
/// separately and does not gate approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub service_type: ServiceTypeId,
    pub approval_status: ApprovalStatus,
    pub registration_fee: Money,
    pub fee_paid: bool,
    pub registered_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(
        id: VendorId,
        name: &str,
        email: &str,
        phone: &str,
        address: &str,
        service_type: ServiceTypeId,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: address.to_string(),
            service_type,
            approval_status: ApprovalStatus::Pending,
            registration_fee: Money::new(Decimal::from(REGISTRATION_FEE_RUPEES)),
            fee_paid: false,
            registered_at: Utc::now(),
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved
    }

    /// Admin decision: `pending -> approved`.
    pub fn approve(&mut self) -> Result<()> {
        self.decide(ApprovalStatus::Approved)
    }

    /// Admin decision: `pending -> rejected`.
    pub fn reject(&mut self) -> Result<()> {
        self.decide(ApprovalStatus::Rejected)
    }

    fn decide(&mut self, verdict: ApprovalStatus) -> Result<()> {
        if self.approval_status != ApprovalStatus::Pending {
            return Err(MarketError::Conflict(format!(
                "vendor {} is already {}",
                self.id, self.approval_status
            )));
        }
        self.approval_status = verdict;
        Ok(())
    }

    /// Marks the registration fee as settled. Idempotent.
    pub fn record_fee_payment(&mut self) {
        self.fee_paid = true;
    }
}
