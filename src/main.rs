use std::io;
use std::sync::Arc;

use clap::Parser;
use log::debug;

use recipe_transform::{
    Controller, Cuisine, FetchWorkflow, Health, HttpRecipeService, Intent, ServiceConfig,
    TextRenderer, TransformError, TransformationSelection, Vegetarian,
};

/// Transform a recipe and show it next to the original
#[derive(Parser, Debug)]
#[command(name = "recipe-transform", version, about)]
struct Cli {
    /// Address of the recipe to transform
    url: String,

    /// Make the recipe vegetarian
    #[arg(long)]
    veg: bool,

    /// Cuisine to rewrite the recipe towards
    #[arg(long, value_enum, ignore_case = true, default_value_t = Cuisine::None)]
    cuisine: Cuisine,

    /// Health transformation
    #[arg(long, value_enum, ignore_case = true, default_value_t = Health::None)]
    health: Health,

    /// Base URL of the transformation service (overrides configuration)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides configuration)
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the original and transformed recipes as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = ServiceConfig::load()?;
    if let Some(endpoint) = cli.endpoint.clone() {
        config.base_url = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    debug!("{:?}", config);

    let service = HttpRecipeService::new(&config)?;
    let veg = if cli.veg {
        Vegetarian::Veg
    } else {
        Vegetarian::None
    };

    if cli.json {
        let mut selection = TransformationSelection::new();
        selection.set_query(cli.url);
        selection.set_option(veg);
        selection.set_option(cli.cuisine);
        selection.set_option(cli.health);

        let mut workflow = FetchWorkflow::new();
        workflow
            .submit(&service, &selection)
            .await
            .ok_or(TransformError::EmptyQuery)?;

        if let Some(message) = workflow.state().error() {
            return Err(message.into());
        }
        if let Some(pair) = workflow.state().snapshots() {
            println!("{}", serde_json::to_string_pretty(pair)?);
        }
        return Ok(());
    }

    let mut controller = Controller::new(Arc::new(service), TextRenderer::new(io::stdout()));
    controller.dispatch(Intent::SetQuery(cli.url))?;
    controller.dispatch(Intent::SetOption(veg.into()))?;
    controller.dispatch(Intent::SetOption(cli.cuisine.into()))?;
    controller.dispatch(Intent::SetOption(cli.health.into()))?;

    if !controller.can_submit() {
        return Err(TransformError::EmptyQuery.into());
    }
    controller.dispatch(Intent::Submit)?;
    controller.run_until_idle().await;

    match controller.state().error() {
        Some(message) => Err(message.into()),
        None => Ok(()),
    }
}
