use serde::{Deserialize, Serialize};

/// Customer value segment assigned by the enrichment projection.
///
/// The loaded dashboard table keeps segments as free text, so an unknown or
/// empty `segmento_cliente` still forms its own group there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "Alto valor")]
    AltoValor,
    #[serde(rename = "Medio")]
    Medio,
    #[serde(rename = "Bajo valor")]
    BajoValor,
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Segment::AltoValor => "Alto valor",
            Segment::Medio => "Medio",
            Segment::BajoValor => "Bajo valor",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Alto valor" => Some(Segment::AltoValor),
            "Medio" => Some(Segment::Medio),
            "Bajo valor" => Some(Segment::BajoValor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
