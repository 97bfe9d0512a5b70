use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enums::{Category, Channel, Region};

/// Revenue of a single transaction: `precio * (1 - descuento)`
pub fn derive_revenue(price: f64, discount: f64) -> f64 {
    price * (1.0 - discount)
}

/// Profit of a single transaction: `ingreso - costo`
pub fn derive_profit(revenue: f64, cost: f64) -> f64 {
    revenue - cost
}

/// Sampled attributes of a sale before the derived metrics are attached
#[derive(Debug, Clone, PartialEq)]
pub struct SaleDraft {
    pub date: NaiveDateTime,
    pub customer_id: i64,
    pub product_id: Option<String>,
    pub product: Option<String>,
    pub category: Option<Category>,
    pub price: f64,
    pub cost: f64,
    pub channel: Channel,
    pub region: Region,
    pub discount: f64,
}

impl SaleDraft {
    pub fn into_sale(self) -> Sale {
        let revenue = derive_revenue(self.price, self.discount);
        let profit = derive_profit(revenue, self.cost);
        Sale {
            date: self.date,
            customer_id: self.customer_id,
            product_id: self.product_id,
            product: self.product,
            category: self.category,
            price: self.price,
            cost: self.cost,
            channel: self.channel,
            region: self.region,
            discount: self.discount,
            revenue,
            profit,
        }
    }
}

/// Raw transaction row (`ventas_empresa.csv`).
///
/// Both generation strategies share this layout: dimension-join rows carry
/// `producto_id`, catalog-sampling rows carry `producto` and `categoria` inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,

    #[serde(rename = "cliente_id")]
    pub customer_id: i64,

    #[serde(rename = "producto_id")]
    pub product_id: Option<String>,

    #[serde(rename = "producto")]
    pub product: Option<String>,

    #[serde(rename = "categoria")]
    pub category: Option<Category>,

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

    // Derived
    #[serde(rename = "ingreso")]
    pub revenue: f64,

    #[serde(rename = "ganancia")]
    pub profit: f64,
}
