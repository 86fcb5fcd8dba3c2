use crate::application::engine::MarketplaceEngine;
use crate::domain::catalog::ServiceTypeId;
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io::Read;

/// The marketplace operations accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpKind {
    RegisterVendor,
    Approve,
    Reject,
    FeePaid,
    Create,
    Assign,
    Dispatch,
    Start,
    Cancel,
    Complete,
}

/// One row of the operation stream. Only `op` is always present; each
/// operation reads the columns it needs and rejects rows where they are
/// missing.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    pub op: OpKind,
    #[serde(default)]
    pub request: Option<u64>,
    #[serde(default)]
    pub vendor: Option<u64>,
    #[serde(default)]
    pub requester: Option<u64>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub scheduled: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Reads marketplace operations from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Operation>`. It handles whitespace trimming and flexible record
/// lengths automatically.
pub struct OpReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OpReader<R> {
    /// Creates a new `OpReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes operations.
    pub fn operations(self) -> impl Iterator<Item = Result<Operation>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(MarketError::from))
    }
}

fn required<T>(value: Option<T>, column: &str) -> Result<T> {
    value.ok_or_else(|| {
        MarketError::Validation(format!("operation is missing required column '{column}'"))
    })
}

fn resolve_service(engine: &MarketplaceEngine, name: &str) -> Result<ServiceTypeId> {
    engine
        .catalog()
        .by_name(name)
        .map(|service| service.id)
        .ok_or_else(|| MarketError::Validation(format!("unknown service type \"{name}\"")))
}

/// Applies one parsed operation to the engine.
pub async fn apply_operation(engine: &MarketplaceEngine, op: Operation) -> Result<()> {
    match op.op {
        OpKind::RegisterVendor => {
            let name = required(op.name, "name")?;
            let email = required(op.email, "email")?;
            let phone = required(op.phone, "phone")?;
            let address = required(op.address, "address")?;
            let service = resolve_service(engine, &required(op.service, "service")?)?;
            engine
                .register_vendor(&name, &email, &phone, &address, service)
                .await?;
        }
        OpKind::Approve => {
            engine.approve_vendor(required(op.vendor, "vendor")?).await?;
        }
        OpKind::Reject => {
            engine.reject_vendor(required(op.vendor, "vendor")?).await?;
        }
        OpKind::FeePaid => {
            engine
                .record_fee_payment(required(op.vendor, "vendor")?)
                .await?;
        }
        OpKind::Create => {
            let requester = required(op.requester, "requester")?;
            let service = resolve_service(engine, &required(op.service, "service")?)?;
            let address = required(op.address, "address")?;
            let description = op.description.unwrap_or_default();
            engine
                .create_request(requester, service, &description, &address)
                .await?;
        }
        OpKind::Assign => {
            engine
                .assign(
                    required(op.request, "request")?,
                    required(op.vendor, "vendor")?,
                    op.scheduled,
                )
                .await?;
        }
        OpKind::Dispatch => {
            engine.dispatch(required(op.request, "request")?).await?;
        }
        OpKind::Start => {
            engine.start_work(required(op.request, "request")?).await?;
        }
        OpKind::Cancel => {
            engine.cancel(required(op.request, "request")?).await?;
        }
        OpKind::Complete => {
            engine
                .complete(
                    required(op.request, "request")?,
                    &required(op.code, "code")?,
                )
                .await?;
        }
    }
    Ok(())
}
