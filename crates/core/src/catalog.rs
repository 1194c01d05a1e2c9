//! The static product and category catalog.
//!
//! A [`Catalog`] is built once at startup and never mutated afterwards. Every
//! constructor runs the same validation, so once a `Catalog` exists its
//! products are known to reference real categories and to have unique ids.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId};

/// Errors that can occur when building a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// A product or category has an empty id.
    #[error("catalog ids cannot be empty")]
    EmptyId,
    /// Two categories share an id.
    #[error("duplicate category id: {0}")]
    DuplicateCategory(CategoryId),
    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),
    /// A product references a category that does not exist.
    #[error("product {product} references unknown category {category}")]
    UnknownCategory {
        /// The offending product.
        product: ProductId,
        /// The category it points at.
        category: CategoryId,
    },
    /// A product has a price below zero.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    /// The catalog file could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A filter tab grouping products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub label: String,
}

/// A purchasable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(alias = "desc")]
    pub description: String,
    pub price: Price,
    pub category: CategoryId,
    /// Display label such as "Popular". Carries no behaviour.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Product {
    /// Whether the lowercased name or description contains `needle`.
    ///
    /// `needle` must already be trimmed and lowercased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Serialized shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogData {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl TryFrom<CatalogData> for Catalog {
    type Error = CatalogError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        Self::new(data.categories, data.products)
    }
}

/// Ordered, validated collection of categories and products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogData")]
pub struct Catalog {
    categories: Vec<Category>,
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, checking referential integrity.
    ///
    /// # Errors
    ///
    /// Returns an error if any id is empty or duplicated, if a product points
    /// at a missing category, or if a price is negative.
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut category_ids = HashSet::with_capacity(categories.len());
        for category in &categories {
            if category.id.as_str().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
        }

        let mut product_ids = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_str().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !product_ids.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if !category_ids.contains(product.category.as_str()) {
                return Err(CatalogError::UnknownCategory {
                    product: product.id.clone(),
                    category: product.category.clone(),
                });
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
        }

        Ok(Self {
            categories,
            products,
        })
    }

    /// The catalog shipped with the store.
    #[must_use]
    pub fn builtin() -> Self {
        // Checked by `tests::test_builtin_catalog_is_valid`.
        Self {
            categories: builtin_categories(),
            products: builtin_products(),
        }
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON and the validation
    /// errors of [`Catalog::new`] otherwise.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str::<CatalogData>(json)?.try_into()
    }

    /// Serialize the catalog as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    /// Look up a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id.as_str() == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn category(id: &str, label: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        label: label.to_owned(),
    }
}

fn product(
    id: &str,
    name: &str,
    description: &str,
    centavos: i64,
    category: &str,
    badge: Option<&str>,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: description.to_owned(),
        price: Price::from_centavos(centavos),
        category: CategoryId::new(category),
        badge: badge.map(str::to_owned),
    }
}

fn builtin_categories() -> Vec<Category> {
    vec![
        category("vip", "VIP"),
        category("veiculos", "Veículos"),
        category("mods", "Mods"),
        category("handling", "Handling"),
        category("scripts", "Scripts"),
        category("rp", "Itens RP"),
    ]
}

fn builtin_products() -> Vec<Product> {
    vec![
        product(
            "vip-bronze",
            "VIP Bronze (30 dias)",
            "Tag VIP, salário extra, prioridade de fila. Exclusivo para Brasil Mundo Fênix (MTA).",
            1490,
            "vip",
            Some("Popular"),
        ),
        product(
            "vip-prata",
            "VIP Prata (30 dias)",
            "Todos benefícios do Bronze + garagem extra e skin exclusiva.",
            2490,
            "vip",
            Some("+Vendido"),
        ),
        product(
            "vip-ouro",
            "VIP Ouro (30 dias)",
            "Slots extras, /fix, veículo premium mensal e apoio prioritário.",
            3990,
            "vip",
            None,
        ),
        product(
            "car-hustler-fusca",
            "Hustler (som de Fusca) – pack sound",
            "Som exclusivo estilo Fusca para Hustler. Compatível com a cidade BMF (MTA).",
            1190,
            "veiculos",
            None,
        ),
        product(
            "car-blista-ap",
            "Blista Compact (motor AP turbo)",
            "Ronco personalizado com apito de turbina leve. Instalamos via resource.",
            1290,
            "veiculos",
            None,
        ),
        product(
            "mod-radio-px",
            "Rádio PX BR – falas nostálgicas",
            "Áudios estilo rádio amador BR; tocam piadas/alertas ao atrasar entrega (ETS2 port para MTA).",
            990,
            "mods",
            None,
        ),
        product(
            "handling-drift-rwd",
            "Handling Drift (RWD)",
            "Pacote realista para drift traseira. Aceleração fina, suspensão rígida.",
            790,
            "handling",
            None,
        ),
        product(
            "handling-carga-pesada",
            "Handling Carga Pesada (caminhão)",
            "Centro de massa ajustado, torque inicial alto, freio calibrado para rotas RP.",
            890,
            "handling",
            None,
        ),
        product(
            "script-lojinha",
            "Script Lojinha In-Game",
            "GUI simples para comprar itens com coins BMF (inclui documentação).",
            1990,
            "scripts",
            None,
        ),
        product(
            "rp-placa-custom",
            "Placa personalizada (RP)",
            "Troca de placa com verificação de placa única por banco de dados.",
            690,
            "rp",
            None,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::new(builtin_categories(), builtin_products()).unwrap();
        assert_eq!(catalog, Catalog::builtin());
        assert_eq!(catalog.categories().len(), 6);
        assert_eq!(catalog.products().len(), 10);
    }

    #[test]
    fn test_every_product_references_a_category() {
        let catalog = Catalog::builtin();
        for product in catalog.products() {
            assert!(catalog.category(product.category.as_str()).is_some());
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::builtin();
        let product = catalog.product("vip-ouro").unwrap();
        assert_eq!(product.name, "VIP Ouro (30 dias)");
        assert_eq!(product.price, Price::from_centavos(3990));
        assert!(catalog.product("vip-diamante").is_none());
    }

    #[test]
    fn test_rejects_unknown_category() {
        let err = Catalog::new(
            vec![category("vip", "VIP")],
            vec![product("x", "X", "", 100, "carros", None)],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCategory { .. }));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Catalog::new(
            vec![category("vip", "VIP"), category("vip", "VIP 2")],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCategory(_)));

        let err = Catalog::new(
            vec![category("vip", "VIP")],
            vec![
                product("a", "A", "", 100, "vip", None),
                product("a", "B", "", 200, "vip", None),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(_)));
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = Catalog::new(
            vec![category("vip", "VIP")],
            vec![product("a", "A", "", -1, "vip", None)],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::NegativePrice(_)));
    }

    #[test]
    fn test_json_export_reimports() {
        let catalog = Catalog::builtin();
        let json = catalog.to_json_pretty().unwrap();
        assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
    }

    #[test]
    fn test_from_json_accepts_desc_alias_and_validates() {
        let json = r#"{
            "categories": [{"id": "vip", "label": "VIP"}],
            "products": [{
                "id": "vip-teste",
                "name": "VIP Teste",
                "desc": "Só para testes",
                "price": {"amount": "1.50"},
                "category": "vip"
            }]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(
            catalog.products().first().unwrap().description,
            "Só para testes"
        );

        let broken = json.replace("\"category\": \"vip\"", "\"category\": \"rp\"");
        assert!(matches!(
            Catalog::from_json(&broken),
            Err(CatalogError::UnknownCategory { .. })
        ));
    }
}
