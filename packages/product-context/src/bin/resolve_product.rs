//! CLI for resolving a product page or a search page against a storefront
//! GraphQL endpoint.
//!
//! Prints the final resolution as JSON.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_context::{
    render_product_page, ChildProps, Config, ContextVariables, DataLayer, MemoryFragmentCache,
    NavigationRequest, Navigator, ProductContext, ProductIdentifier, ProductPageRenderer,
    ProductResolver, ResolvedProduct, SearchArgs, SearchContextProvider, SearchRouteParams,
    UrlQuery,
};

#[derive(Parser)]
#[command(name = "resolve-product")]
#[command(about = "Resolve storefront product and search pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a product page
    Product {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        sku_id: Option<String>,
    },

    /// Resolve a search page
    Search {
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        map: Option<String>,
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value_t = 12)]
        per_page: u32,
    },
}

struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, request: NavigationRequest) {
        tracing::info!(page = %request.page, query = %request.query, "Redirect requested");
    }
}

struct LoggingDataLayer;

impl DataLayer for LoggingDataLayer {
    fn push(&self, events: Vec<Value>) {
        let events = Value::Array(events);
        tracing::info!(events = %events, "Data layer push");
    }
}

#[derive(Default)]
struct SectionRenderer {
    sections: Vec<&'static str>,
}

impl ProductPageRenderer for SectionRenderer {
    fn title_and_pixel(&mut self, _: Option<&ResolvedProduct>, _: Option<&Value>, _: bool) {
        self.sections.push("titleAndPixel");
    }

    fn open_graph(&mut self, _: &ResolvedProduct) {
        self.sections.push("openGraph");
    }

    fn structured_data(&mut self, _: &ResolvedProduct, _: &Value) {
        self.sections.push("structuredData");
    }

    fn children(&mut self, _: &ChildProps) {
        self.sections.push("children");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let client = Arc::new(config.graphql_client());

    let output = match cli.command {
        Commands::Product { slug, id, sku_id } => {
            let identifier = ProductIdentifier { slug, id };
            let resolver = ProductResolver::new(
                client,
                Arc::new(MemoryFragmentCache::new()),
                Arc::new(LoggingNavigator),
            );
            let context = ProductContext::new(Arc::new(resolver));

            let props = context
                .render(&identifier)
                .await
                .context("Resolution was superseded")?;

            let mut renderer = SectionRenderer::default();
            render_product_page(&props, &UrlQuery { sku_id }, &mut renderer);

            json!({
                "slug": props.slug,
                "loading": props.product_query.loading,
                "product": props.product_query.product,
                "error": props.product_query.error,
                "sections": renderer.sections,
            })
        }
        Commands::Search {
            department,
            category,
            map,
            order_by,
            page,
            per_page,
        } => {
            let params = SearchRouteParams::new()
                .with("department", department.unwrap_or_default())
                .with("category", category.unwrap_or_default());
            let args = SearchArgs {
                map,
                rest: None,
                order_by,
                page,
            };
            let runtime = config.runtime_context("Search", &config.graphql_url);

            let mut provider = SearchContextProvider::new(
                params,
                args,
                runtime,
                client,
                Arc::new(LoggingDataLayer),
            );
            provider.set_context_variables(ContextVariables {
                max_items_per_page: per_page,
            });
            let context = provider.render().await;

            json!({
                "variables": context.variables,
                "searchQuery": context.search_query,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
