//! The product catalog: the fixed set of values the belt can introduce.
//!
//! Built once through [`CatalogBuilder`] and frozen. Registering the same
//! name twice does not create a second product; it raises that product's
//! draw weight instead, so duplicate entries bias the random draw.

use crate::id::ProductId;
use crate::item::Item;
use std::collections::HashMap;

/// Draw weight given to the empty slot when injecting.
pub const EMPTY_WEIGHT: u32 = 1;

/// A product definition in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDef {
    pub name: String,
    /// Number of times the product was registered.
    pub weight: u32,
}

/// Builder for constructing an immutable [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    products: Vec<ProductDef>,
    name_to_id: HashMap<String, ProductId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product. Returns its ID; repeated names share one ID.
    pub fn register_product(&mut self, name: &str) -> ProductId {
        if let Some(&id) = self.name_to_id.get(name) {
            self.products[id.0 as usize].weight += 1;
            return id;
        }
        let id = ProductId(self.products.len() as u32);
        self.products.push(ProductDef {
            name: name.to_string(),
            weight: 1,
        });
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    pub fn product_id(&self, name: &str) -> Option<ProductId> {
        self.name_to_id.get(name).copied()
    }

    /// Freeze the catalog. Fails if no product was registered.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        if self.products.is_empty() {
            return Err(CatalogError::Empty);
        }
        let draw_weights = self
            .products
            .iter()
            .map(|p| p.weight)
            .chain(std::iter::once(EMPTY_WEIGHT))
            .collect();
        Ok(Catalog {
            products: self.products,
            name_to_id: self.name_to_id,
            draw_weights,
        })
    }
}

/// Immutable product catalog, frozen at startup.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<ProductDef>,
    name_to_id: HashMap<String, ProductId>,
    /// One weight per product in ID order, followed by [`EMPTY_WEIGHT`].
    draw_weights: Vec<u32>,
}

impl Catalog {
    /// Convenience: build a catalog from a list of names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, CatalogError> {
        let mut builder = CatalogBuilder::new();
        for name in names {
            builder.register_product(name.as_ref());
        }
        builder.build()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn product_id(&self, name: &str) -> Option<ProductId> {
        self.name_to_id.get(name).copied()
    }

    pub fn get(&self, id: ProductId) -> Option<&ProductDef> {
        self.products.get(id.0 as usize)
    }

    pub fn name(&self, id: ProductId) -> Option<&str> {
        self.get(id).map(|p| p.name.as_str())
    }

    pub fn product_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        (0..self.products.len()).map(|i| ProductId(i as u32))
    }

    /// Weights for the injection draw: every product, then the empty slot.
    pub fn draw_weights(&self) -> &[u32] {
        &self.draw_weights
    }

    /// Map an index chosen from [`draw_weights`](Self::draw_weights) back to
    /// the item it stands for.
    pub fn item_for_draw(&self, index: usize) -> Item {
        if index < self.products.len() {
            Item::Raw(ProductId(index as u32))
        } else {
            Item::Empty
        }
    }

    /// Human-readable label for a belt or log value.
    pub fn label(&self, item: &Item) -> String {
        match *item {
            Item::Empty => "None".to_string(),
            Item::Raw(p) => self.name(p).unwrap_or("?").to_string(),
            Item::Completed(p) => format!("(Completed, {})", self.name(p).unwrap_or("?")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no products")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_build() {
        let mut b = CatalogBuilder::new();
        let a = b.register_product("a");
        let bb = b.register_product("b");
        let catalog = b.build().unwrap();
        assert_eq!(catalog.product_count(), 2);
        assert_eq!(catalog.name(a), Some("a"));
        assert_eq!(catalog.name(bb), Some("b"));
    }

    #[test]
    fn duplicates_share_id_and_raise_weight() {
        let catalog = Catalog::from_names(&["a", "b", "a"]).unwrap();
        assert_eq!(catalog.product_count(), 2);
        let a = catalog.product_id("a").unwrap();
        assert_eq!(catalog.get(a).unwrap().weight, 2);
        assert_eq!(catalog.draw_weights(), &[2, 1, EMPTY_WEIGHT]);
    }

    #[test]
    fn empty_catalog_rejected() {
        let result = CatalogBuilder::new().build();
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn last_draw_index_is_empty() {
        let catalog = Catalog::from_names(&["a", "b"]).unwrap();
        assert_eq!(catalog.item_for_draw(0), Item::Raw(ProductId(0)));
        assert_eq!(catalog.item_for_draw(1), Item::Raw(ProductId(1)));
        assert_eq!(catalog.item_for_draw(2), Item::Empty);
    }

    #[test]
    fn labels() {
        let catalog = Catalog::from_names(&["a"]).unwrap();
        let a = catalog.product_id("a").unwrap();
        assert_eq!(catalog.label(&Item::Empty), "None");
        assert_eq!(catalog.label(&Item::Raw(a)), "a");
        assert_eq!(catalog.label(&Item::Completed(a)), "(Completed, a)");
    }

    #[test]
    fn lookup_by_name() {
        let catalog = Catalog::from_names(&["widget"]).unwrap();
        assert!(catalog.product_id("widget").is_some());
        assert!(catalog.product_id("nonexistent").is_none());
    }
}
