use std::{collections::HashMap, rc::Rc};

use folio_protocol::prompt::{Prompt, PromptError, PromptMessage};
use serde_json::Value;

use crate::handler::PromptHandler;

/// Named prompt templates, kept in registration order.
///
/// Lookups are exact matches on the prompt name. Registering a name twice replaces the earlier
/// handler in place.
#[derive(Default, Clone)]
pub struct PromptTable {
    handlers: Vec<Rc<dyn PromptHandler>>,
    index: HashMap<&'static str, usize>,
}

impl PromptTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handler: impl PromptHandler) {
        let name = handler.name();
        match self.index.get(name) {
            Some(&i) => {
                tracing::warn!(prompt = name, "Replacing previously registered prompt");
                self.handlers[i] = Rc::new(handler);
            }
            None => {
                self.index.insert(name, self.handlers.len());
                self.handlers.push(Rc::new(handler));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&dyn PromptHandler> {
        self.index.get(name).map(|&i| self.handlers[i].as_ref())
    }

    /// Metadata for every prompt, in registration order.
    pub fn list(&self) -> Vec<Prompt> {
        self.handlers
            .iter()
            .map(|prompt| Prompt::new(prompt.name(), prompt.description(), prompt.arguments()))
            .collect()
    }

    /// Render the prompt called `name`.
    pub async fn render(
        &self,
        name: &str,
        arguments: HashMap<String, Value>,
    ) -> Result<Vec<PromptMessage>, PromptError> {
        let prompt = self
            .get(name)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))?;
        prompt.call(arguments).await
    }
}
