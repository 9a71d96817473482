//! Storefront catalog filtering and sorting.
//!
//! Works on the product list fetched in catalog (id) order. Sorting uses the
//! standard stable sort, so products tying on the sort key keep their
//! catalog order.

use serde::Deserialize;

use crate::entities::product;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub material: Option<String>,
    pub q: Option<String>,
    pub featured: Option<bool>,
    pub sort: Option<SortKey>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Popular,
    Rating,
    PriceLow,
    PriceHigh,
}

pub fn apply(products: Vec<product::Model>, query: &CatalogQuery) -> Vec<product::Model> {
    let mut result: Vec<product::Model> = products
        .into_iter()
        .filter(|product| matches(product, query))
        .collect();

    if let Some(sort) = query.sort {
        sort_products(&mut result, sort);
    }

    result
}

fn matches(product: &product::Model, query: &CatalogQuery) -> bool {
    if let Some(category) = query.category.as_deref() {
        if category != "All" && product.category != category {
            return false;
        }
    }

    if let Some(material) = query.material.as_deref() {
        if material != "All" && !product.materials.contains(material) {
            return false;
        }
    }

    if let Some(search) = query.q.as_deref() {
        let needle = search.to_lowercase();
        let haystack = format!(
            "{} {}",
            product.name.to_lowercase(),
            product.description.to_lowercase()
        );
        if !haystack.contains(&needle) {
            return false;
        }
    }

    if let Some(featured) = query.featured {
        if product.featured != featured {
            return false;
        }
    }

    true
}

fn sort_products(products: &mut [product::Model], sort: SortKey) {
    match sort {
        SortKey::Popular => products.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::PriceLow => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }
}
