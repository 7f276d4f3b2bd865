//! Client for a recipe transformation service.
//!
//! A [`TransformationSelection`] holds the recipe address and the chosen
//! vegetarian, cuisine and health transformations. [`FetchWorkflow`] turns it
//! into a `POST /fetchRecipe` call and tracks the resulting [`FetchState`],
//! which exposes the transformed recipe next to the original one.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod request;
pub mod selection;
pub mod service;
pub mod workflow;

pub use crate::config::ServiceConfig;
pub use controller::{Controller, Intent, Renderer};
pub use error::TransformError;
pub use model::{Ingredient, IngredientChanges, Recipe, RecipePair, StructuredStep};
pub use render::{render_comparison, render_recipe, TextRenderer};
pub use request::TransformRequest;
pub use selection::{
    Axis, Cuisine, Health, TransformationOption, TransformationSelection, Vegetarian,
};
pub use service::{HttpRecipeService, RecipeService};
pub use workflow::{FetchPhase, FetchState, FetchWorkflow, PendingFetch, RequestToken};

/// Transform the recipe at `selection.query()` with the service configured
/// in the environment and return both snapshots.
///
/// # Errors
/// Returns `TransformError::EmptyQuery` for an empty address, otherwise any
/// configuration, transport, status or response error.
pub async fn transform_recipe(
    selection: &TransformationSelection,
) -> Result<RecipePair, TransformError> {
    let config = ServiceConfig::load()?;
    transform_recipe_with_config(selection, &config).await
}

/// Same as [`transform_recipe`] with explicit service configuration
pub async fn transform_recipe_with_config(
    selection: &TransformationSelection,
    config: &ServiceConfig,
) -> Result<RecipePair, TransformError> {
    if selection.query().is_empty() {
        return Err(TransformError::EmptyQuery);
    }

    let service = HttpRecipeService::new(config)?;
    service
        .transform(&TransformRequest::from_selection(selection))
        .await
}
