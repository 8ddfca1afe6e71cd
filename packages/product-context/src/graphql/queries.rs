//! GraphQL query definitions

use crate::traits::Fragment;

// ============================================================================
// PRODUCT QUERIES
// ============================================================================

pub const PRODUCT_QUERY: &str = r#"
  query Product($slug: String, $identifier: ProductUniqueIdentifier, $skipCategoryTree: Boolean) {
    product(slug: $slug, identifier: $identifier) {
      cacheId
      productId
      productName
      productReference
      description
      titleTag
      metaTagDescription
      linkText
      brand
      brandId
      categoryId
      categoryTree @skip(if: $skipCategoryTree) {
        id
        name
        href
      }
      properties {
        name
        values
      }
      items {
        itemId
        name
        nameComplete
        ean
        referenceId {
          Key
          Value
        }
        images {
          imageId
          imageUrl
          imageText
        }
        sellers {
          sellerId
          sellerName
          commertialOffer {
            Price
            ListPrice
            AvailableQuantity
          }
        }
      }
    }
  }
"#;

pub const PRODUCT_CATEGORY_TREE_QUERY: &str = r#"
  query ProductCategoryTree($slug: String, $identifier: ProductUniqueIdentifier) {
    product(slug: $slug, identifier: $identifier) {
      cacheId
      categoryTree {
        id
        name
        href
      }
    }
  }
"#;

pub const PRODUCT_BENEFITS_QUERY: &str = r#"
  query ProductBenefits($slug: String, $identifier: ProductUniqueIdentifier) {
    product(slug: $slug, identifier: $identifier) {
      cacheId
      benefits {
        featured
        id
        name
        items {
          benefitProduct {
            productId
            productName
          }
          benefitSKUIds
          discount
          minQuantity
        }
      }
    }
  }
"#;

/// Fields of a product kept from search results and shown while the
/// product queries are still in flight.
pub const PRODUCT_PREVIEW_FRAGMENT: Fragment = Fragment {
    name: "ProductPreviewFragment",
    fields: &["cacheId", "productId", "productName", "linkText", "items"],
};

// ============================================================================
// SEARCH QUERIES
// ============================================================================

pub const SEARCH_QUERY: &str = r#"
  query Search($query: String, $map: String, $rest: String, $orderBy: String, $from: Int, $to: Int) {
    search(query: $query, map: $map, rest: $rest, orderBy: $orderBy, from: $from, to: $to) {
      recordsFiltered
      products {
        productId
        productName
        brand
        linkText
        items {
          itemId
          name
        }
      }
      facets {
        CategoriesTrees {
          Name
          Link
        }
      }
    }
  }
"#;

// Display names reported with each execution.
pub const PRODUCT_QUERY_NAME: &str = "ProductQuery";
pub const PRODUCT_CATEGORY_TREE_QUERY_NAME: &str = "ProductCategoryTreeQuery";
pub const PRODUCT_BENEFITS_QUERY_NAME: &str = "ProductBenefitsQuery";
pub const SEARCH_QUERY_NAME: &str = "SearchQuery";
