use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One ingredient line as parsed by the transformation service.
///
/// Only `name` is guaranteed; the remaining fields are filled in when the
/// service's ingredient parser recognized them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Immutable recipe snapshot as returned by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(rename = "cooking tools", default)]
    pub cooking_tools: Vec<String>,
    #[serde(rename = "cooking methods", default, skip_serializing_if = "Vec::is_empty")]
    pub cooking_methods: Vec<String>,
    #[serde(
        rename = "primary cooking method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_cooking_method: Option<String>,
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub steps: Vec<Option<String>>,
    #[serde(rename = "structuredsteps", default, skip_serializing_if = "Vec::is_empty")]
    pub structured_steps: Vec<StructuredStep>,
}

/// A step annotated with what it uses, as produced by the service's step analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredStep {
    #[serde(default)]
    pub step: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    /// Free text such as "10 minutes"; blank when no duration was found
    #[serde(rename = "cooking time", default)]
    pub cooking_time: String,
}

impl StructuredStep {
    pub fn duration(&self) -> Option<&str> {
        Some(self.cooking_time.trim()).filter(|t| !t.is_empty())
    }
}

impl Recipe {
    /// Steps that carry text, numbered 1.. over the filtered sequence.
    ///
    /// Absent and empty steps consume no number.
    pub fn numbered_steps(&self) -> Vec<(usize, &str)> {
        self.steps
            .iter()
            .filter_map(|step| step.as_deref())
            .filter(|step| !step.is_empty())
            .enumerate()
            .map(|(index, step)| (index + 1, step))
            .collect()
    }

    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.name.as_str())
    }
}

// Steps can come back as null or false when the scraper skipped a paragraph
fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect())
}

/// The pair of snapshots produced by one transformation call.
///
/// Both sides always travel together so a reader never sees one without the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePair {
    #[serde(rename = "new")]
    pub transformed: Recipe,
    #[serde(rename = "old")]
    pub original: Recipe,
}

/// Ingredient differences between the original and transformed snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientChanges {
    /// Present in the original only, in original display order
    pub removed: Vec<String>,
    /// Present in the transformed recipe only, in transformed display order
    pub added: Vec<String>,
}

impl IngredientChanges {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

impl RecipePair {
    pub fn ingredient_changes(&self) -> IngredientChanges {
        let original: Vec<&str> = self.original.ingredient_names().collect();
        let transformed: Vec<&str> = self.transformed.ingredient_names().collect();

        IngredientChanges {
            removed: original
                .iter()
                .filter(|name| !transformed.contains(name))
                .map(|name| name.to_string())
                .collect(),
            added: transformed
                .iter()
                .filter(|name| !original.contains(name))
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbered_steps_skip_falsy_entries() {
        let recipe: Recipe = serde_json::from_value(json!({
            "title": "soup",
            "steps": ["Boil", "", "Stir", null, "Serve"]
        }))
        .unwrap();

        assert_eq!(
            recipe.numbered_steps(),
            vec![(1, "Boil"), (2, "Stir"), (3, "Serve")]
        );
    }

    #[test]
    fn test_non_string_steps_are_absent() {
        let recipe: Recipe = serde_json::from_value(json!({
            "steps": [false, "Chop", 0]
        }))
        .unwrap();

        assert_eq!(recipe.steps, vec![None, Some("Chop".to_string()), None]);
        assert_eq!(recipe.numbered_steps(), vec![(1, "Chop")]);
    }

    #[test]
    fn test_cooking_tools_key_with_space() {
        let recipe: Recipe = serde_json::from_value(json!({
            "title": "manicotti",
            "ingredients": [{"name": "ricotta", "quantity": 2, "measurement": "cup"}],
            "cooking tools": ["oven", "knife"],
            "steps": []
        }))
        .unwrap();

        assert_eq!(recipe.cooking_tools, vec!["oven", "knife"]);
        assert_eq!(recipe.ingredients[0].measurement.as_deref(), Some("cup"));

        let back = serde_json::to_value(&recipe).unwrap();
        assert_eq!(back["cooking tools"], json!(["oven", "knife"]));
        assert!(back.get("cooking_tools").is_none());
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let recipe: Recipe = serde_json::from_value(json!({"title": "toast"})).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.cooking_tools.is_empty());
        assert!(recipe.steps.is_empty());
    }

    #[test]
    fn test_structured_steps() {
        let recipe: Recipe = serde_json::from_value(json!({
            "title": "rice",
            "structuredsteps": [
                {
                    "step": "simmer rice for 20 minutes",
                    "ingredients": ["rice"],
                    "tools": ["pot"],
                    "methods": ["simmer"],
                    "cooking time": " 20 minutes "
                },
                {"step": "serve", "ingredients": [], "tools": [], "methods": [], "cooking time": " "}
            ]
        }))
        .unwrap();

        assert_eq!(recipe.structured_steps.len(), 2);
        assert_eq!(recipe.structured_steps[0].tools, vec!["pot"]);
        assert_eq!(recipe.structured_steps[0].duration(), Some("20 minutes"));
        assert_eq!(recipe.structured_steps[1].duration(), None);

        let back = serde_json::to_value(&recipe).unwrap();
        assert_eq!(back["structuredsteps"][0]["cooking time"], json!(" 20 minutes "));
    }

    #[test]
    fn test_pair_keys() {
        let pair: RecipePair = serde_json::from_value(json!({
            "new": {"title": "tofu curry"},
            "old": {"title": "chicken curry"}
        }))
        .unwrap();

        assert_eq!(pair.transformed.title, "tofu curry");
        assert_eq!(pair.original.title, "chicken curry");
    }

    #[test]
    fn test_ingredient_changes() {
        let pair = RecipePair {
            transformed: Recipe {
                ingredients: vec![Ingredient::new("tofu"), Ingredient::new("rice")],
                ..Default::default()
            },
            original: Recipe {
                ingredients: vec![
                    Ingredient::new("chicken"),
                    Ingredient::new("rice"),
                    Ingredient::new("bacon"),
                ],
                ..Default::default()
            },
        };

        let changes = pair.ingredient_changes();
        assert_eq!(changes.removed, vec!["chicken", "bacon"]);
        assert_eq!(changes.added, vec!["tofu"]);
        assert!(!changes.is_empty());
    }
}
