use std::fmt::Write as _;
use std::io;

use log::warn;

use crate::controller::Renderer;
use crate::model::{Ingredient, Recipe, RecipePair, StructuredStep};
use crate::selection::TransformationSelection;
use crate::workflow::{FetchPhase, FetchState};

fn ingredient_line(ingredient: &Ingredient) -> String {
    let mut line = String::new();
    match &ingredient.quantity {
        Some(serde_json::Value::Number(n)) if n.as_f64() != Some(0.0) => {
            let _ = write!(line, "{} ", n);
        }
        Some(serde_json::Value::String(s)) if !s.is_empty() => {
            let _ = write!(line, "{} ", s);
        }
        _ => {}
    }
    if let Some(measurement) = ingredient.measurement.as_deref().filter(|m| !m.is_empty()) {
        let _ = write!(line, "{} ", measurement);
    }
    if let Some(descriptor) = ingredient.descriptor.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(line, "{} ", descriptor);
    }
    line.push_str(&ingredient.name);
    if let Some(preparation) = ingredient.preparation.as_deref().filter(|p| !p.is_empty()) {
        let _ = write!(line, ", {}", preparation);
    }
    line
}

/// Plain-text rendering of a single snapshot
pub fn render_recipe(recipe: &Recipe) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", recipe.title);

    out.push_str("\nIngredients:\n");
    for ingredient in &recipe.ingredients {
        let _ = writeln!(out, "- {}", ingredient_line(ingredient));
    }

    if !recipe.cooking_tools.is_empty() {
        out.push_str("\nCooking tools:\n");
        for tool in &recipe.cooking_tools {
            let _ = writeln!(out, "- {}", tool);
        }
    }

    if !recipe.cooking_methods.is_empty() {
        out.push_str("\nCooking methods:\n");
        for method in &recipe.cooking_methods {
            let _ = writeln!(out, "- {}", method);
        }
    }
    if let Some(primary) = recipe
        .primary_cooking_method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
    {
        let _ = writeln!(out, "Primary cooking method: {}", primary);
    }

    out.push_str("\nSteps:\n");
    for (number, step) in recipe.numbered_steps() {
        let _ = writeln!(out, "{}) {}", number, step);
    }

    let details: Vec<&StructuredStep> = recipe
        .structured_steps
        .iter()
        .filter(|s| !s.step.is_empty())
        .collect();
    if !details.is_empty() {
        out.push_str("\nStep details:\n");
        for (index, detail) in details.into_iter().enumerate() {
            let _ = writeln!(out, "{}) {}", index + 1, detail.step);
            if !detail.ingredients.is_empty() {
                let _ = writeln!(out, "   ingredients: {}", detail.ingredients.join(", "));
            }
            if let Some(duration) = detail.duration() {
                let _ = writeln!(out, "   cooking time: {}", duration);
            }
            if !detail.tools.is_empty() {
                let _ = writeln!(out, "   tools: {}", detail.tools.join(", "));
            }
            if !detail.methods.is_empty() {
                let _ = writeln!(out, "   methods: {}", detail.methods.join(", "));
            }
        }
    }
    out
}

/// Original and transformed snapshot, followed by the ingredient differences
pub fn render_comparison(pair: &RecipePair) -> String {
    let mut out = String::new();
    out.push_str("== Original ==\n");
    out.push_str(&render_recipe(&pair.original));
    out.push_str("\n== Transformed ==\n");
    out.push_str(&render_recipe(&pair.transformed));

    let changes = pair.ingredient_changes();
    if !changes.is_empty() {
        out.push_str("\n== Changes ==\n");
        for name in &changes.removed {
            let _ = writeln!(out, "- {}", name);
        }
        for name in &changes.added {
            let _ = writeln!(out, "+ {}", name);
        }
    }
    out
}

pub fn render_state(state: &FetchState) -> String {
    match state.phase() {
        FetchPhase::Idle => String::new(),
        FetchPhase::Loading => "Loading...\n".to_string(),
        FetchPhase::Failed(message) => format!("Failed: {}\n", message),
        FetchPhase::Loaded => state.snapshots().map(render_comparison).unwrap_or_default(),
    }
}

/// Writes each state change as text
pub struct TextRenderer<W: io::Write> {
    out: W,
}

impl<W: io::Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> Renderer for TextRenderer<W> {
    fn render(&mut self, _selection: &TransformationSelection, state: &FetchState) {
        let text = render_state(state);
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            warn!("Failed to write recipe output: {}", e);
        }
    }
}
