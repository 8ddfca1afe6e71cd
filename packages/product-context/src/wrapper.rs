//! Product wrapper: picks the selected SKU and decides which downstream
//! renderers run for the current product query.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::ChildProps;
use crate::traits::ProductPageRenderer;
use crate::types::product::ResolvedProduct;

/// URL query params the wrapper reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku_id: Option<String>,
}

impl UrlQuery {
    pub fn with_sku(sku_id: impl Into<String>) -> Self {
        Self {
            sku_id: Some(sku_id.into()),
        }
    }
}

/// The item whose `itemId` matches `sku_id`, else the first item.
pub fn select_item<'a>(product: &'a ResolvedProduct, sku_id: Option<&str>) -> Option<&'a Value> {
    let items = product.items();
    sku_id
        .and_then(|sku| {
            items
                .iter()
                .find(|item| item.get("itemId").and_then(Value::as_str) == Some(sku))
        })
        .or_else(|| items.first())
}

/// Render the product page sections for `props`.
///
/// Title and pixel always run; open graph needs a product; structured data
/// needs a product and a selected item. Children run last.
pub fn render_product_page(
    props: &ChildProps,
    query: &UrlQuery,
    renderer: &mut dyn ProductPageRenderer,
) {
    let product_query = &props.product_query;
    let product = product_query.product.as_ref();
    let selected_item = product.and_then(|p| select_item(p, query.sku_id.as_deref()));

    renderer.title_and_pixel(product, selected_item, product_query.loading);

    if let Some(product) = product {
        renderer.open_graph(product);
        if let Some(item) = selected_item {
            renderer.structured_data(product, item);
        }
    }

    renderer.children(props);
}
