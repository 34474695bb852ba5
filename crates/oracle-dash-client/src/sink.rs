/*
[INPUT]:  Decoded product lists and projected price updates
[OUTPUT]: Row bindings and painted cells in the owning view
[POS]:    Rendering seam - the core's only view of the UI
[UPDATE]: When the sink contract changes
*/

use crate::error::OracleError;
use crate::types::{PriceFields, ProductEntry};

/// Association between a price account and its table row, handed back by
/// the sink when rows are built and carried in the subscription handler so
/// updates land without re-querying the product list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBinding {
    pub row: usize,
    pub account: String,
    pub price_exponent: i32,
}

/// Where decoded prices go. Implementations paint cells; the core never
/// touches the view directly.
pub trait RenderSink: Send {
    /// Build rows for the decoded product list, returning one binding per
    /// price account to subscribe to.
    fn build_rows(&mut self, products: &[ProductEntry]) -> Vec<RowBinding>;

    /// Paint one row with projected price fields.
    fn paint(&mut self, row: usize, fields: &PriceFields);

    /// Mark one row with a distinguished error state (decode failure or
    /// rejected subscription). The row keeps its last good values.
    fn paint_error(&mut self, row: usize, error: &OracleError);
}
