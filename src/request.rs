use serde::Serialize;

use crate::selection::TransformationSelection;

/// Body of a `POST /fetchRecipe` call.
///
/// An axis left at its "no transformation" value is omitted entirely; the
/// service treats a missing key as off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veg: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<&'static str>,
}

impl TransformRequest {
    pub fn from_selection(selection: &TransformationSelection) -> Self {
        Self {
            url: selection.query().to_string(),
            veg: (!selection.vegetarian().is_none()).then_some(true),
            cuisine: selection.cuisine().token(),
            health: selection.health().token(),
        }
    }
}

impl From<&TransformationSelection> for TransformRequest {
    fn from(selection: &TransformationSelection) -> Self {
        Self::from_selection(selection)
    }
}
