use serde::{Deserialize, Serialize};

/// How the transaction generator picks product, price and cost for a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    /// Inline product attributes drawn from the pricing catalog with Gaussian noise
    CatalogSampling,
    /// `producto_id` sampled from the product table, price and cost drawn uniformly
    #[default]
    DimensionJoin,
}

impl GenerationStrategy {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationStrategy::CatalogSampling => "catalog_sampling",
            GenerationStrategy::DimensionJoin => "dimension_join",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "catalog_sampling" => Some(GenerationStrategy::CatalogSampling),
            "dimension_join" => Some(GenerationStrategy::DimensionJoin),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
