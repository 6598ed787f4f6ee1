use serde::Serialize;
use utoipa::ToSchema;

use crate::state::catalog::Catalog;

/// Baby as shown to players, without its answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct BabyView {
    pub index: usize,
    pub image_url: String,
}

/// Everything a player needs to fill in a guess sheet.
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogView {
    pub babies: Vec<BabyView>,
    /// Names offered for the parent slot.
    pub parents: Vec<String>,
    /// Names offered for the celebrity slot.
    pub celebrities: Vec<String>,
}

impl From<&Catalog> for CatalogView {
    fn from(catalog: &Catalog) -> Self {
        Self {
            babies: catalog
                .babies()
                .iter()
                .map(|baby| BabyView {
                    index: baby.index,
                    image_url: baby.image_url.clone(),
                })
                .collect(),
            parents: catalog.parents().to_vec(),
            celebrities: catalog.celebrities().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_not_serialized() {
        let json = serde_json::to_string(&CatalogView::from(&Catalog::default())).unwrap();
        assert!(json.contains("image_url"));
        assert!(!json.contains("answer"));
        assert!(!json.contains("&"));
    }
}
