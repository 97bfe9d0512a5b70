use serde::{Deserialize, Serialize};

/// Sales channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "Web")]
    Web,
    #[serde(rename = "App móvil")]
    AppMovil,
    #[serde(rename = "Marketplace")]
    Marketplace,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Web => "Web",
            Channel::AppMovil => "App móvil",
            Channel::Marketplace => "Marketplace",
        }
    }

    pub fn all() -> Vec<Channel> {
        vec![Channel::Web, Channel::AppMovil, Channel::Marketplace]
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
