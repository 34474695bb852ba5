/*
[INPUT]:  Decoded product lists and projected price updates
[OUTPUT]: Row-ordered table state for the TUI to render
[POS]:    View model - RenderSink implementation backing the table widget
[UPDATE]: When changing columns, row ordering, or error display
*/

use oracle_dash_client::{OracleError, PriceFields, ProductEntry, RenderSink, RowBinding};
use tracing::warn;

/// One table row: static product metadata plus the latest painted update.
#[derive(Debug, Clone, Default)]
pub struct RowData {
    pub asset_type: String,
    pub country: String,
    pub symbol: String,
    pub price_type: String,
    pub tenor: String,
    pub quote_currency: String,
    pub description: String,
    pub fields: Option<PriceFields>,
    pub last_error: Option<String>,
}

/// Table state shared between the price feed and the draw loop.
///
/// Rows are fixed once the product list arrives, ordered by asset type then
/// symbol; updates only repaint cells in place.
#[derive(Debug, Default)]
pub struct TableModel {
    rows: Vec<RowData>,
}

impl TableModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[RowData] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RenderSink for TableModel {
    fn build_rows(&mut self, products: &[ProductEntry]) -> Vec<RowBinding> {
        let mut sorted: Vec<&ProductEntry> = products.iter().collect();
        sorted.sort_by_key(|product| {
            (
                product.attr("asset_type").to_string(),
                product.attr("symbol").to_string(),
            )
        });

        self.rows.clear();
        let mut bindings = Vec::new();
        for product in sorted {
            for price in &product.price {
                let row = self.rows.len();
                self.rows.push(RowData {
                    asset_type: product.attr("asset_type").to_string(),
                    country: product.attr("country").to_string(),
                    symbol: product.attr("symbol").to_string(),
                    price_type: price.price_type.as_str().to_string(),
                    tenor: product.attr("tenor").to_string(),
                    quote_currency: product.attr("quote_currency").to_string(),
                    description: product.attr("description").to_string(),
                    fields: None,
                    last_error: None,
                });
                bindings.push(RowBinding {
                    row,
                    account: price.account.clone(),
                    price_exponent: price.price_exponent,
                });
            }
        }
        bindings
    }

    fn paint(&mut self, row: usize, fields: &PriceFields) {
        let Some(data) = self.rows.get_mut(row) else {
            warn!(row, "paint for row outside the table");
            return;
        };
        data.fields = Some(fields.clone());
        data.last_error = None;
    }

    fn paint_error(&mut self, row: usize, error: &OracleError) {
        let Some(data) = self.rows.get_mut(row) else {
            warn!(row, "paint_error for row outside the table");
            return;
        };
        data.last_error = Some(error.to_string());
    }
}
