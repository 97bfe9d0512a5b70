use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{Category, Channel, Region, Segment};

/// Enriched transaction row (`ventas_limpias.csv`): raw sale joined to its
/// customer and product, with segment and stored margin attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSaleDto {
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,

    #[serde(rename = "cliente_id")]
    pub customer_id: i64,

    #[serde(rename = "cliente")]
    pub customer_name: String,

    #[serde(rename = "segmento_cliente")]
    pub segment: Segment,

    #[serde(rename = "producto_id")]
    pub product_id: Option<String>,

    /// Legacy inline label, kept as written by the catalog-sampling generator
    #[serde(rename = "producto")]
    pub product: Option<String>,

    #[serde(rename = "nombre_producto")]
    pub product_name: String,

    #[serde(rename = "categoria")]
    pub category: Category,

    #[serde(rename = "precio")]
    pub price: f64,

    #[serde(rename = "costo")]
    pub cost: f64,

    #[serde(rename = "canal")]
    pub channel: Channel,

    #[serde(rename = "region")]
    pub region: Region,

    #[serde(rename = "descuento")]
    pub discount: f64,

    #[serde(rename = "ingreso")]
    pub revenue: f64,

    #[serde(rename = "ganancia")]
    pub profit: f64,

    /// `ganancia / ingreso`, empty when revenue is zero
    #[serde(rename = "margen_pct")]
    pub margin_pct: Option<f64>,
}
