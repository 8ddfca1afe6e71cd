use serde_json::Value;

use crate::context::ChildProps;
use crate::types::product::ResolvedProduct;

/// Downstream renderers of the product page.
///
/// The wrapper decides which of these run for a given resolution; the
/// implementation owns markup, meta tags and pixel events.
pub trait ProductPageRenderer {
    /// Page title and product-view pixel event. Always invoked.
    fn title_and_pixel(
        &mut self,
        product: Option<&ResolvedProduct>,
        selected_item: Option<&Value>,
        loading: bool,
    );

    /// Open-graph meta tags. Invoked only when a product exists.
    fn open_graph(&mut self, product: &ResolvedProduct);

    /// Structured (schema.org) markup. Invoked only with a selected item.
    fn structured_data(&mut self, product: &ResolvedProduct, selected_item: &Value);

    /// Page content below the product context.
    fn children(&mut self, props: &ChildProps);
}
