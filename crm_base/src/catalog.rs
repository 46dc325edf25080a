//! The static manifest. Document bodies are compiled into the binary.

use folio::{ResourceDescriptor, StaticContent};

use crate::SCHEME;

struct Document {
    path: &'static str,
    name: &'static str,
    description: &'static str,
    text: &'static str,
}

const DOCUMENTS: &[Document] = &[
    Document {
        path: "ui-system/dialog-patterns",
        name: "Dialog Patterns",
        description: "When to use confirmation, form and picker dialogs, and how they behave",
        text: include_str!("../content/ui-system/dialog-patterns.md"),
    },
    Document {
        path: "ui-system/form-layouts",
        name: "Form Layouts",
        description: "Field grouping, labelling, validation and action placement in forms",
        text: include_str!("../content/ui-system/form-layouts.md"),
    },
    Document {
        path: "data-model/contacts",
        name: "Contacts",
        description: "Contact fields, duplicate detection and deletion rules",
        text: include_str!("../content/data-model/contacts.md"),
    },
    Document {
        path: "data-model/deals",
        name: "Deals",
        description: "Deal fields, pipeline stages and stage change rules",
        text: include_str!("../content/data-model/deals.md"),
    },
    Document {
        path: "workflows/lead-qualification",
        name: "Lead Qualification",
        description: "From captured lead to qualified deal",
        text: include_str!("../content/workflows/lead-qualification.md"),
    },
    Document {
        path: "workflows/deal-handoff",
        name: "Deal Handoff",
        description: "Moving a won deal from sales to customer success",
        text: include_str!("../content/workflows/deal-handoff.md"),
    },
];

/// Descriptors for every built-in document, in listing order.
pub fn manifest() -> impl Iterator<Item = ResourceDescriptor> {
    DOCUMENTS.iter().map(|doc| {
        ResourceDescriptor::new(
            format!("{SCHEME}://{}", doc.path),
            doc.name,
            doc.description,
            StaticContent::new(doc.text),
        )
    })
}
