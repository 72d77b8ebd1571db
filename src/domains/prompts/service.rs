//! Prompt service implementation.
//!
//! The PromptService keeps the registered templates and renders them with
//! client-supplied arguments.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::info;

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;
use crate::core::config::{Config, Suite};

/// Service for managing and instantiating prompts.
pub struct PromptService {
    /// Registered prompts, in listing order.
    prompts: Vec<PromptTemplate>,
}

impl PromptService {
    /// Create the service. The arXiv prompts are only offered when the
    /// arXiv suite is enabled.
    pub fn new(config: &Config) -> Self {
        info!("Initializing PromptService");

        let mut service = Self {
            prompts: Vec::new(),
        };

        if config.tools.is_enabled(Suite::Arxiv) {
            for template in get_all_prompts() {
                service.register_prompt(template);
            }
        }

        service
    }

    /// Register a prompt template. A name already present is replaced.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        info!("Registering prompt: {}", template.name);
        self.prompts.retain(|existing| existing.name != template.name);
        self.prompts.push(template);
    }

    /// List all available prompts.
    pub async fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .iter()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Get a prompt with arguments substituted.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .iter()
            .find(|template| template.name == name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();

        for arg in &template.arguments {
            let present = arguments
                .get(&arg.name)
                .is_some_and(|value| !value.trim().is_empty());
            if arg.required.unwrap_or(false) && !present {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }

        let content = template.render(&arguments)?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}
