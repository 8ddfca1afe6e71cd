use crate::types::search::{ContextVariables, SearchArgs, SearchQueryVariables, SearchRouteParams};

pub const DEFAULT_PAGE: u32 = 1;

/// Search query variables for one page of results.
///
/// `from`/`to` are inclusive offsets of `page` (1-based, default 1) with
/// `max_items_per_page` results per page. Offsets saturate at `u32::MAX`.
pub fn search_variables(
    params: &SearchRouteParams,
    args: &SearchArgs,
    context: &ContextVariables,
) -> SearchQueryVariables {
    let page = args.page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE);
    let per_page = context.max_items_per_page.max(1);
    let from = (page - 1).saturating_mul(per_page);

    SearchQueryVariables {
        query: params.query_path(),
        map: args.map.clone(),
        rest: args.rest.clone(),
        order_by: args.order_by.clone(),
        from,
        to: from.saturating_add(per_page - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchRouteParams {
        SearchRouteParams::new()
            .with("department", "apparel")
            .with("category", "shoes")
            .with("subcategory", "")
    }

    #[test]
    fn test_defaults_to_first_page() {
        let vars = search_variables(&params(), &SearchArgs::default(), &ContextVariables::default());
        assert_eq!(vars.query, "apparel/shoes");
        assert_eq!((vars.from, vars.to), (0, 0));
    }

    #[test]
    fn test_page_offsets() {
        let args = SearchArgs {
            map: Some("c,c".to_string()),
            order_by: Some("OrderByPriceASC".to_string()),
            page: Some(3),
            ..Default::default()
        };
        let context = ContextVariables {
            max_items_per_page: 10,
        };

        let vars = search_variables(&params(), &args, &context);
        assert_eq!((vars.from, vars.to), (20, 29));
        assert_eq!(vars.map.as_deref(), Some("c,c"));
        assert_eq!(vars.order_by.as_deref(), Some("OrderByPriceASC"));
    }

    #[test]
    fn test_huge_page_saturates() {
        let args = SearchArgs {
            page: Some(u32::MAX),
            ..Default::default()
        };
        let context = ContextVariables {
            max_items_per_page: 12,
        };

        let vars = search_variables(&params(), &args, &context);
        assert_eq!((vars.from, vars.to), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_last_representable_page() {
        let args = SearchArgs {
            page: Some(2),
            ..Default::default()
        };
        let context = ContextVariables {
            max_items_per_page: u32::MAX,
        };

        let vars = search_variables(&params(), &args, &context);
        assert_eq!((vars.from, vars.to), (u32::MAX, u32::MAX));
    }
}
