use tracing::{error, info, warn};

use super::{ErpError, ErpGateway, Orchestrator, SalesOrderDraft, SalesOrderLine, SyncReport};
use crate::error::Result;
use crate::marketplace::{endpoints, Order, OrderSummary};

/// What happened to one marketplace order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderOutcome {
    /// Inserted into the ERP under this name and marked processed.
    Imported(String),
    /// Already in the ERP under this name from an earlier run; only marked.
    AlreadyImported(String),
    /// In the ERP under this name, but marking it processed failed.
    Unmarked(String),
    /// Nothing left to import after dropping unmatched lines.
    Skipped,
}

impl<E: ErpGateway> Orchestrator<'_, E> {
    /// Import every order in `pull_status` and mark each one processed.
    ///
    /// Only a failure to list orders is returned; per-order failures are
    /// logged and counted.
    pub fn pull_orders(&self) -> Result<SyncReport> {
        let status = self.settings.pull_status;
        let summaries: Vec<OrderSummary> = self.client.get_as(&endpoints::orders_list(status))?;
        info!(count = summaries.len(), %status, "orders listed");

        let mut report = SyncReport::default();
        for summary in summaries {
            match self.import_order(&summary.id) {
                Ok(OrderOutcome::Imported(name)) => {
                    info!(order = %summary.id, sales_order = %name, "order imported");
                    report.pushed += 1;
                }
                Ok(OrderOutcome::AlreadyImported(name)) => {
                    info!(
                        order = %summary.id,
                        sales_order = %name,
                        "order was already imported; marked processed"
                    );
                    report.skipped += 1;
                }
                Ok(OrderOutcome::Unmarked(_)) => report.unmarked += 1,
                Ok(OrderOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    error!(order = %summary.id, "order import failed: {}", e);
                    report.failed += 1;
                }
            }
        }
        info!(?report, "orders synced");
        Ok(report)
    }

    /// Fetch, insert and mark one order.
    ///
    /// An order the ERP already holds is only marked, so a run that failed
    /// to mark it never leads to a second sales order.
    pub fn import_order(&self, id: &str) -> Result<OrderOutcome> {
        let order: Order = self.client.get_as(&endpoints::order(id))?;
        if let Some(name) = self.erp.sales_order_for(&order.id)? {
            return Ok(if self.mark_processed(&order, &name) {
                OrderOutcome::AlreadyImported(name)
            } else {
                OrderOutcome::Unmarked(name)
            });
        }

        let draft = self.sales_order(&order)?;
        if draft.items.is_empty() {
            warn!(order = %order.reference(), "no line matched an ERP item; skipped");
            return Ok(OrderOutcome::Skipped);
        }
        let name = self.erp.insert_sales_order(&draft)?;
        Ok(if self.mark_processed(&order, &name) {
            OrderOutcome::Imported(name)
        } else {
            OrderOutcome::Unmarked(name)
        })
    }

    fn mark_processed(&self, order: &Order, sales_order: &str) -> bool {
        let endpoint = endpoints::order_status(&order.id, self.settings.processed_status);
        match self.client.post(&endpoint, None, false) {
            Ok(_) => true,
            Err(e) => {
                error!(
                    order = %order.reference(),
                    %sales_order,
                    "order is in the ERP but could not be marked processed: {}",
                    e
                );
                false
            }
        }
    }

    /// Map an order onto an ERP sales order, dropping lines whose barcode
    /// has no ERP item.
    pub(crate) fn sales_order(&self, order: &Order) -> Result<SalesOrderDraft> {
        let customer = order
            .retailer
            .retailer_code
            .clone()
            .ok_or_else(|| ErpError::new(format!("order {} has no retailer code", order.reference())))?;

        let mut items = Vec::new();
        for size in order.line_items.iter().flat_map(|line| line.sizes.iter()) {
            if size.quantity == 0 {
                continue;
            }
            let Some(upc) = size.upc.as_deref() else {
                warn!(order = %order.reference(), "line without barcode dropped");
                continue;
            };
            match self.erp.item_code_for_barcode(upc)? {
                Some(item_code) => items.push(SalesOrderLine {
                    item_code,
                    qty: size.quantity,
                    rate: size.price,
                }),
                None => {
                    warn!(order = %order.reference(), barcode = %upc, "no ERP item for barcode; line dropped");
                }
            }
        }

        Ok(SalesOrderDraft {
            customer,
            po_no: order.reference().to_string(),
            marketplace_order_id: order.id.clone(),
            currency: order.currency_code.clone(),
            delivery_date: order.start_ship.clone(),
            notes: order.notes.clone(),
            items,
        })
    }
}
