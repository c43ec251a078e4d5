use super::{apply, fetch, remove, Directory};
use crate::contract::{
    Caller, FleetError, Invoice, InvoiceStats, InvoiceStatus, InvoiceUpdate, NewInvoice,
};
use crate::domain::repository::{Collection, DocumentStore, FieldFilter, Record};
use crate::domain::scope::{ensure_ship_access, ShipScope};
use crate::domain::validation::{require_non_negative, require_text};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

impl Record for Invoice {
    const COLLECTION: &'static str = "invoices";
    const DERIVED: &'static [&'static str] = &["ship_name"];
}

#[derive(Debug, Default, Serialize)]
struct StatusPatch {
    status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    approval_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paid_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    pub ship_id: Option<String>,
    pub status: Option<InvoiceStatus>,
}

pub struct InvoicesService {
    invoices: Collection<Invoice>,
    directory: Directory,
    number_prefix: String,
}

impl InvoicesService {
    pub(crate) fn new(store: Arc<dyn DocumentStore>, directory: Directory, number_prefix: String) -> Self {
        Self {
            invoices: Collection::new(store),
            directory,
            number_prefix,
        }
    }

    async fn present(&self, mut invoice: Invoice) -> Result<Invoice, FleetError> {
        invoice.ship_name = self.directory.ship_name(Some(&invoice.ship_id)).await?;
        Ok(invoice)
    }

    /// `<prefix>-YYYYMM-NNNN`, numbered after the invoices already stored
    async fn next_number(&self, now: DateTime<Utc>) -> Result<String, FleetError> {
        let existing = self.invoices.all().await.map_err(FleetError::internal)?.len();
        Ok(format!(
            "{}-{}-{:04}",
            self.number_prefix,
            now.format("%Y%m"),
            existing + 1
        ))
    }

    async fn fetch_accessible(&self, caller: &Caller, id: &str) -> Result<Invoice, FleetError> {
        let invoice = fetch(&self.invoices, "Invoice", id).await?;
        ensure_ship_access(caller, Some(&invoice.ship_id))?;
        Ok(invoice)
    }

    #[instrument(skip(self, caller, new_invoice), fields(ship_id = %new_invoice.ship_id))]
    pub async fn create(&self, caller: &Caller, new_invoice: NewInvoice) -> Result<Invoice, FleetError> {
        caller.require_staff_or_master()?;
        require_text("vendor_name", &new_invoice.vendor_name)?;
        require_non_negative("amount", new_invoice.amount)?;
        ensure_ship_access(caller, Some(&new_invoice.ship_id))?;
        self.directory.require_ship(&new_invoice.ship_id).await?;

        let now = Utc::now();
        let invoice_number = match new_invoice.invoice_number {
            Some(number) if !number.trim().is_empty() => number,
            _ => self.next_number(now).await?,
        };
        let invoice = Invoice {
            id: String::new(),
            ship_id: new_invoice.ship_id,
            invoice_number,
            vendor_name: new_invoice.vendor_name,
            category: new_invoice.category,
            amount: new_invoice.amount,
            currency: new_invoice.currency,
            description: new_invoice.description,
            status: InvoiceStatus::Draft,
            due_date: new_invoice.due_date,
            paid_date: None,
            attachments: new_invoice.attachments,
            remarks: new_invoice.remarks,
            created_by: caller.user_id.clone(),
            created_by_name: Some(caller.name.clone()),
            approved_by: None,
            approval_notes: None,
            ship_name: None,
            created_at: now,
            updated_at: now,
        };
        let invoice = self.invoices.insert(&invoice).await.map_err(FleetError::internal)?;
        info!(invoice_id = %invoice.id, number = %invoice.invoice_number, "invoice created");
        self.present(invoice).await
    }

    pub async fn list(&self, caller: &Caller, filter: InvoiceFilter) -> Result<Vec<Invoice>, FleetError> {
        let scope = ShipScope::resolve(caller, filter.ship_id.as_deref());
        let mut filters = Vec::new();
        if let Some(status) = filter.status {
            filters.push(FieldFilter::eq("status", status));
        }
        let mut invoices = self
            .invoices
            .find_scoped(&scope, "ship_id", filters)
            .await
            .map_err(FleetError::internal)?;
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut out = Vec::with_capacity(invoices.len());
        for invoice in invoices {
            out.push(self.present(invoice).await?);
        }
        Ok(out)
    }

    pub async fn stats(&self, caller: &Caller, ship_id: Option<&str>) -> Result<InvoiceStats, FleetError> {
        let scope = ShipScope::resolve(caller, ship_id);
        let invoices = self
            .invoices
            .find_scoped(&scope, "ship_id", Vec::new())
            .await
            .map_err(FleetError::internal)?;

        let mut stats = InvoiceStats {
            total_count: invoices.len(),
            ..Default::default()
        };
        for invoice in &invoices {
            stats.total_amount += invoice.amount;
            match invoice.status {
                InvoiceStatus::Draft => stats.draft += 1,
                InvoiceStatus::Submitted => {
                    stats.submitted += 1;
                    stats.pending_amount += invoice.amount;
                }
                InvoiceStatus::Approved => {
                    stats.approved += 1;
                    stats.pending_amount += invoice.amount;
                }
                InvoiceStatus::Paid => {
                    stats.paid += 1;
                    stats.paid_amount += invoice.amount;
                }
                InvoiceStatus::Rejected => stats.rejected += 1,
            }
        }
        Ok(stats)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> Result<Invoice, FleetError> {
        let invoice = self.fetch_accessible(caller, id).await?;
        self.present(invoice).await
    }

    #[instrument(skip(self, caller, update))]
    pub async fn update(&self, caller: &Caller, id: &str, update: InvoiceUpdate) -> Result<Invoice, FleetError> {
        caller.require_staff_or_master()?;
        self.fetch_accessible(caller, id).await?;
        if let Some(amount) = update.amount {
            require_non_negative("amount", amount)?;
        }
        let invoice = apply(&self.invoices, "Invoice", id, &update).await?;
        info!(invoice_id = %id, "invoice updated");
        self.present(invoice).await
    }

    /// draft -> submitted
    #[instrument(skip(self, caller))]
    pub async fn submit(&self, caller: &Caller, id: &str) -> Result<Invoice, FleetError> {
        caller.require_staff_or_master()?;
        let invoice = self.fetch_accessible(caller, id).await?;
        if invoice.status != InvoiceStatus::Draft {
            return Err(FleetError::validation("Only draft invoices can be submitted"));
        }
        self.transition(id, StatusPatch {
            status: InvoiceStatus::Submitted,
            ..Default::default()
        })
        .await
    }

    /// submitted -> approved
    #[instrument(skip(self, caller, notes))]
    pub async fn approve(&self, caller: &Caller, id: &str, notes: Option<String>) -> Result<Invoice, FleetError> {
        self.review(caller, id, InvoiceStatus::Approved, notes).await
    }

    /// submitted -> rejected
    #[instrument(skip(self, caller, notes))]
    pub async fn reject(&self, caller: &Caller, id: &str, notes: Option<String>) -> Result<Invoice, FleetError> {
        self.review(caller, id, InvoiceStatus::Rejected, notes).await
    }

    async fn review(
        &self,
        caller: &Caller,
        id: &str,
        outcome: InvoiceStatus,
        notes: Option<String>,
    ) -> Result<Invoice, FleetError> {
        caller.require_master()?;
        let invoice = fetch(&self.invoices, "Invoice", id).await?;
        if invoice.status != InvoiceStatus::Submitted {
            return Err(FleetError::validation(format!(
                "Only submitted invoices can be {}",
                if outcome == InvoiceStatus::Approved { "approved" } else { "rejected" }
            )));
        }
        self.transition(id, StatusPatch {
            status: outcome,
            approved_by: Some(caller.user_id.clone()),
            approval_notes: notes,
            ..Default::default()
        })
        .await
    }

    /// approved -> paid
    #[instrument(skip(self, caller))]
    pub async fn mark_paid(&self, caller: &Caller, id: &str) -> Result<Invoice, FleetError> {
        caller.require_staff_or_master()?;
        let invoice = self.fetch_accessible(caller, id).await?;
        if invoice.status != InvoiceStatus::Approved {
            return Err(FleetError::validation("Only approved invoices can be marked as paid"));
        }
        self.transition(id, StatusPatch {
            status: InvoiceStatus::Paid,
            paid_date: Some(Utc::now()),
            ..Default::default()
        })
        .await
    }

    async fn transition(&self, id: &str, patch: StatusPatch) -> Result<Invoice, FleetError> {
        let invoice = apply(&self.invoices, "Invoice", id, &patch).await?;
        info!(invoice_id = %id, status = ?invoice.status, "invoice status changed");
        self.present(invoice).await
    }

    #[instrument(skip(self, caller))]
    pub async fn delete(&self, caller: &Caller, id: &str) -> Result<(), FleetError> {
        caller.require_master()?;
        remove(&self.invoices, "Invoice", id).await?;
        info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }
}
