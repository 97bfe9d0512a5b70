use serde::{Deserialize, Serialize};

/// Sales region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "CDMX")]
    Cdmx,
    #[serde(rename = "Norte")]
    Norte,
    #[serde(rename = "Occidente")]
    Occidente,
    #[serde(rename = "Sur")]
    Sur,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::Cdmx => "CDMX",
            Region::Norte => "Norte",
            Region::Occidente => "Occidente",
            Region::Sur => "Sur",
        }
    }

    pub fn all() -> Vec<Region> {
        vec![Region::Cdmx, Region::Norte, Region::Occidente, Region::Sur]
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
