use crate::domain::catalog::ServiceTypeId;
use crate::domain::money::{CommissionRate, Money};
use crate::domain::settlement::{settle, Settlement};
use crate::domain::vendor::VendorId;
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub type RequestId = u64;
pub type RequesterId = u64;

/// Lifecycle of a service request. The forward path is
/// pending -> assigned -> in_progress -> completed; cancellation is a side
/// exit available until completion. Terminal states never transition again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Assigned => "assigned",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// The six-digit completion secret shared with the requester when work
/// starts. The vendor must echo it back to settle the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HappyCode(String);

impl HappyCode {
    /// Validates a vendor-submitted code: exactly six ASCII digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.len() == 6 && raw.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(MarketError::Validation(
                "Happy Code must be 6 digits".to_string(),
            ))
        }
    }

    /// Draws a fresh code. Leading zeros are preserved, so every code is
    /// exactly six characters.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self(format!("{:06}", rng.gen_range(0..1_000_000)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HappyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A customer's request for one service, carrying its lifecycle status and,
/// once completed, the settlement that splits its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: RequestId,
    pub requester_id: RequesterId,
    pub service_type: ServiceTypeId,
    pub vendor_id: Option<VendorId>,
    pub status: RequestStatus,
    pub price: Money,
    pub happy_code: Option<HappyCode>,
    pub settlement: Option<Settlement>,
    pub description: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ServiceRequest {
    pub fn new(
        id: RequestId,
        requester_id: RequesterId,
        service_type: ServiceTypeId,
        price: Money,
        description: &str,
        address: &str,
    ) -> Self {
        Self {
            id,
            requester_id,
            service_type,
            vendor_id: None,
            status: RequestStatus::Pending,
            price,
            happy_code: None,
            settlement: None,
            description: description.to_string(),
            address: address.to_string(),
            created_at: Utc::now(),
            scheduled_at: None,
            completed_at: None,
        }
    }

    /// Attaches a vendor to a pending request.
    pub fn assign(
        &mut self,
        vendor_id: VendorId,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        if self.status != RequestStatus::Pending {
            return Err(MarketError::Conflict(format!(
                "request {} is {}, only pending requests can be assigned",
                self.id, self.status
            )));
        }
        self.vendor_id = Some(vendor_id);
        self.scheduled_at = scheduled_at;
        self.status = RequestStatus::Assigned;
        Ok(())
    }

    /// Moves an assigned request into progress and records the code the
    /// requester will hand over on completion.
    pub fn start_work(&mut self, code: HappyCode) -> Result<()> {
        match self.status {
            RequestStatus::Assigned => {
                self.happy_code = Some(code);
                self.status = RequestStatus::InProgress;
                Ok(())
            }
            RequestStatus::Completed | RequestStatus::Cancelled => Err(MarketError::Conflict(
                format!("request {} is already {}", self.id, self.status),
            )),
            _ => Err(MarketError::InvalidState(format!(
                "request {} is {}, only assigned requests can be started",
                self.id, self.status
            ))),
        }
    }

    /// Settles an in-progress request: verifies the submitted Happy Code
    /// against the one on record, then commits status, completion time and
    /// settlement in one step.
    pub fn complete(
        &mut self,
        submitted: &HappyCode,
        rate: CommissionRate,
        now: DateTime<Utc>,
    ) -> Result<()> {
        match self.status {
            RequestStatus::InProgress => {
                let expected = self.happy_code.as_ref().ok_or_else(|| {
                    MarketError::InvalidState(format!(
                        "request {} has no Happy Code on record",
                        self.id
                    ))
                })?;
                if submitted != expected {
                    return Err(MarketError::Authentication(
                        "Happy Code does not match".to_string(),
                    ));
                }
                self.settlement = Some(settle(self.price, rate));
                self.completed_at = Some(now);
                self.status = RequestStatus::Completed;
                Ok(())
            }
            RequestStatus::Completed | RequestStatus::Cancelled => Err(MarketError::Conflict(
                format!("request {} is already {}", self.id, self.status),
            )),
            _ => Err(MarketError::InvalidState(format!(
                "request {} is {}, work has not started",
                self.id, self.status
            ))),
        }
    }

    /// Cancels the request. Cancelling an already-cancelled request is a
    /// no-op; a completed request can no longer be cancelled.
    pub fn cancel(&mut self) -> Result<()> {
        match self.status {
            RequestStatus::Completed => Err(MarketError::Conflict(format!(
                "request {} is already completed",
                self.id
            ))),
            RequestStatus::Cancelled => Ok(()),
            _ => {
                self.status = RequestStatus::Cancelled;
                Ok(())
            }
        }
    }
}
