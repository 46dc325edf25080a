//! The CRM base server: design-system, data-model and workflow documentation for the CRM,
//! published as `crm-base://<category>/<name>` resources, plus prompt templates for common
//! sales tasks.

pub mod catalog;
pub mod config;
pub mod prompts;

use folio::{
    discovery::DiscoveryConfig, errors::RegistrationError, CatalogService, CatalogServiceBuilder,
    Registry,
};

/// URI scheme of every resource this server publishes.
pub const SCHEME: &str = "crm-base";

pub const SERVER_NAME: &str = "crm-base";

const INSTRUCTIONS: &str = "Reference documentation for the CRM: UI system guidelines, the data \
model and sales workflows. List resources to see what is available, then read the ones relevant \
to the task. Prompts provide templates for kickoff agendas, follow-up emails and deal reviews.";

/// Build the registry from the static catalog, adding discovered documents when `discovery` is
/// given.
pub fn registry(discovery: Option<DiscoveryConfig>) -> Result<Registry, RegistrationError> {
    let mut builder = Registry::builder(SCHEME).with_resources(catalog::manifest());
    if let Some(config) = discovery {
        builder = builder.with_discovery(config);
    }
    builder.build()
}

pub fn service(registry: Registry) -> CatalogService {
    CatalogServiceBuilder::new(SERVER_NAME.to_string(), INSTRUCTIONS.to_string())
        .with_registry(registry)
        .with_prompt(prompts::KickoffAgenda)
        .with_prompt(prompts::FollowUpEmail)
        .with_prompt(prompts::DealReview)
        .with_prompt(prompts::DialogCopy)
        .build()
}
