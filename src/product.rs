//! Catalog products and the light settings derived from them.

use serde::{Deserialize, Serialize};

/// A catalog product as returned by the backend.
///
/// Photometric fields are optional because many catalog entries (cables,
/// switches, accessories) carry none of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Correlated color temperature in Kelvin.
    #[serde(default)]
    pub cct: Option<f32>,
    /// Luminous flux in lumens.
    #[serde(default)]
    pub lumen: Option<f32>,
    /// Color rendering index (0-100).
    #[serde(default)]
    pub cri: Option<f32>,
    /// Electrical power in Watts.
    #[serde(default)]
    pub power: Option<f32>,
    /// Full beam angle in degrees.
    #[serde(default)]
    pub angle: Option<f32>,
}

impl Product {
    /// Light settings for this product, if it exposes every photometric field.
    pub fn light_settings(&self) -> Option<LightSettings> {
        let settings = LightSettings {
            lumen: self.lumen?,
            cct: self.cct?,
            angle: self.angle?,
            power: self.power?,
            cri: self.cri?,
        };
        settings.is_usable().then_some(settings)
    }

    /// Whether the product can be selected in the simulator.
    pub fn is_eligible(&self) -> bool {
        self.light_settings().is_some()
    }
}

/// Keep only products that expose all five photometric fields.
pub fn eligible_products(products: Vec<Product>) -> Vec<Product> {
    products.into_iter().filter(Product::is_eligible).collect()
}

/// Photometric parameters driving the virtual light source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightSettings {
    pub lumen: f32,
    pub cct: f32,
    pub angle: f32,
    pub power: f32,
    pub cri: f32,
}

impl LightSettings {
    fn is_usable(&self) -> bool {
        let all_finite = [self.lumen, self.cct, self.angle, self.power, self.cri]
            .iter()
            .all(|v| v.is_finite());
        all_finite && self.lumen > 0.0 && self.power > 0.0 && self.angle > 0.0
    }
}
