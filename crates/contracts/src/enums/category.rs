use serde::{Deserialize, Serialize};

/// Product category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electrónica")]
    Electronica,
    #[serde(rename = "Ropa")]
    Ropa,
    #[serde(rename = "Hogar")]
    Hogar,
}

impl Category {
    /// Label written to the `categoria` column
    pub fn label(&self) -> &'static str {
        match self {
            Category::Electronica => "Electrónica",
            Category::Ropa => "Ropa",
            Category::Hogar => "Hogar",
        }
    }

    /// All categories in catalog order
    pub fn all() -> Vec<Category> {
        vec![Category::Electronica, Category::Ropa, Category::Hogar]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
