use axum::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A product as reported by the external barcode database, per-100g values
/// normalized. Missing nutriments stay `None`; they scale to zero if the
/// user logs the food without filling them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodProduct {
    pub name: String,
    pub barcode: String,
    pub kcal_per_100g: Option<f64>,
    pub carb_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
}

#[async_trait]
pub trait FoodFactsClient: Send + Sync {
    /// Look a barcode up in the external product database. `Ok(None)` means
    /// the product is unknown there; errors are transport failures.
    async fn product_by_barcode(&self, barcode: &str) -> anyhow::Result<Option<FoodProduct>>;
}

/// Open Food Facts v2 API client.
#[derive(Clone)]
pub struct OpenFoodFacts {
    http: reqwest::Client,
    base_url: String,
}

impl OpenFoodFacts {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OffResponse {
    #[serde(default)]
    status: Option<i64>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    product: Option<OffProduct>,
}

#[derive(Debug, Deserialize)]
struct OffProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    nutriments: Option<OffNutriments>,
}

#[derive(Debug, Default, Deserialize)]
struct OffNutriments {
    #[serde(rename = "energy-kcal_100g")]
    energy_kcal_100g: Option<f64>,
    #[serde(rename = "carbohydrates_100g")]
    carbohydrates_100g: Option<f64>,
    #[serde(rename = "fat_100g")]
    fat_100g: Option<f64>,
    #[serde(rename = "proteins_100g")]
    proteins_100g: Option<f64>,
}

fn to_product(resp: OffResponse, barcode: &str) -> Option<FoodProduct> {
    if resp.status == Some(0) {
        return None;
    }
    let product = resp.product?;
    let nutriments = product.nutriments.unwrap_or_default();
    Some(FoodProduct {
        name: product
            .product_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown Product".into()),
        barcode: resp.code.unwrap_or_else(|| barcode.to_string()),
        kcal_per_100g: nutriments.energy_kcal_100g,
        carb_per_100g: nutriments.carbohydrates_100g,
        fat_per_100g: nutriments.fat_100g,
        protein_per_100g: nutriments.proteins_100g,
    })
}

#[async_trait]
impl FoodFactsClient for OpenFoodFacts {
    async fn product_by_barcode(&self, barcode: &str) -> anyhow::Result<Option<FoodProduct>> {
        let url = format!("{}/product/{}", self.base_url, barcode);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            warn!(%barcode, status = %resp.status(), "product not found in Open Food Facts");
            return Ok(None);
        }
        let body: OffResponse = resp.json().await?;
        Ok(to_product(body, barcode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> OffResponse {
        serde_json::from_value(json).expect("valid OFF payload")
    }

    #[test]
    fn maps_known_product() {
        let resp = parse(serde_json::json!({
            "status": 1,
            "code": "4000417025005",
            "product": {
                "product_name": "Hazelnut spread",
                "nutriments": {
                    "energy-kcal_100g": 539.0,
                    "carbohydrates_100g": 57.5,
                    "fat_100g": 30.9,
                    "proteins_100g": 6.3
                }
            }
        }));
        let product = to_product(resp, "4000417025005").expect("mapped");
        assert_eq!(product.name, "Hazelnut spread");
        assert_eq!(product.barcode, "4000417025005");
        assert_eq!(product.kcal_per_100g, Some(539.0));
        assert_eq!(product.protein_per_100g, Some(6.3));
    }

    #[test]
    fn status_zero_means_unknown() {
        let resp = parse(serde_json::json!({ "status": 0, "code": "123" }));
        assert!(to_product(resp, "123").is_none());
    }

    #[test]
    fn missing_nutriments_stay_none() {
        let resp = parse(serde_json::json!({
            "status": 1,
            "product": { "product_name": "Mystery bar", "nutriments": { "fat_100g": 12.0 } }
        }));
        let product = to_product(resp, "999").expect("mapped");
        assert_eq!(product.barcode, "999");
        assert_eq!(product.kcal_per_100g, None);
        assert_eq!(product.fat_per_100g, Some(12.0));
    }

    #[test]
    fn blank_name_falls_back() {
        let resp = parse(serde_json::json!({
            "status": 1,
            "product": { "product_name": "  " }
        }));
        let product = to_product(resp, "42").expect("mapped");
        assert_eq!(product.name, "Unknown Product");
    }
}
