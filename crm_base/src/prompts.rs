//! Prompt templates. Every argument has a placeholder ("client", "TBD") so a template can always
//! be rendered. Arguments listed as required still fall back to their placeholder when omitted.

use folio::{prompt, PromptMessage, Role};

#[prompt(
    description = "Draft an agenda for a project kickoff meeting",
    params(
        client = "Who the project is for",
        date = "When the kickoff happens",
        goals = "Goals agreed during the sale"
    ),
    defaults(client = "client", date = "TBD", goals = "TBD")
)]
pub async fn kickoff_agenda(client: String, date: Option<String>, goals: Option<String>) -> String {
    format!(
        "Draft a kickoff meeting agenda for {client}.\n\n\
         Date: {}\n\
         Goals agreed during the sale: {}\n\n\
         Cover introductions, goals, success measures, timeline and next steps. \
         Follow crm-base://workflows/deal-handoff.",
        date.unwrap_or_default(),
        goals.unwrap_or_default(),
    )
}

#[prompt(
    description = "Write a follow-up email after a call or meeting",
    params(
        contact = "Name of the person to write to",
        topic = "What the conversation was about",
        next_step = "The agreed next step"
    ),
    defaults(contact = "client", topic = "our last conversation", next_step = "TBD")
)]
pub async fn follow_up_email(contact: String, topic: String, next_step: Option<String>) -> String {
    format!(
        "Write a short, friendly follow-up email to {contact} about {topic}. \
         Thank them for their time, summarise what was discussed in two or three bullet points \
         and confirm the next step: {}.",
        next_step.unwrap_or_default()
    )
}

#[prompt(
    description = "Review a deal for risks before it moves to the next stage",
    params(deal = "Summary of the deal: customer, amount, stage and close date"),
    defaults(deal = "TBD")
)]
pub async fn deal_review(deal: String) -> String {
    format!(
        "Review this deal as a sales manager would. Check it against \
         crm-base://data-model/deals and list missing information, risks to the close date and \
         questions for the owner.\n\n{deal}"
    )
}

#[prompt(
    description = "Write the copy for a dialog following the UI system guidelines",
    params(
        action = "What the dialog asks the user to do",
        kind = "Confirmation, form or picker"
    ),
    defaults(action = "confirm the action", kind = "confirmation")
)]
pub async fn dialog_copy(action: String, kind: Option<String>) -> Vec<PromptMessage> {
    vec![
        PromptMessage::new_text(
            Role::Assistant,
            "I write dialog copy that follows crm-base://ui-system/dialog-patterns: titles name \
             the action, and the primary button repeats it.",
        ),
        PromptMessage::new_text(
            Role::User,
            format!(
                "Write the title, body and button labels for a {} dialog that lets the user {action}.",
                kind.unwrap_or_default()
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::PromptHandler;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_kickoff_agenda_placeholders() {
        let messages = KickoffAgenda.call(HashMap::new()).await.unwrap();
        let text = messages[0].content.as_text().unwrap();
        assert!(text.contains("agenda for client."));
        assert!(text.contains("Date: TBD"));
        assert!(text.contains("Goals agreed during the sale: TBD"));
    }

    #[test]
    fn test_follow_up_email_arguments() {
        let arguments = FollowUpEmail.arguments().unwrap();
        let required: Vec<_> = arguments
            .iter()
            .map(|arg| (arg.name.as_str(), arg.required))
            .collect();
        assert_eq!(
            required,
            vec![
                ("contact", Some(true)),
                ("topic", Some(true)),
                ("next_step", Some(false)),
            ]
        );
    }

    #[tokio::test]
    async fn test_dialog_copy_has_system_framing() {
        let mut args: HashMap<String, serde_json::Value> = HashMap::new();
        args.insert("action".to_string(), "delete this contact".into());
        let messages = DialogCopy.call(args).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::Assistant);
        assert!(messages[1]
            .content
            .as_text()
            .unwrap()
            .contains("confirmation dialog that lets the user delete this contact"));
    }
}
