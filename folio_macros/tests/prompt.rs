use folio::{prompt, PromptArgument, PromptError, PromptHandler, PromptMessage, Role};
use serde_json::{json, Value};
use std::collections::HashMap;

#[prompt(
    description = "Plan a sequence of follow-up calls",
    params(account = "Account to follow up with", calls = "How many calls to plan"),
    defaults(calls = "3")
)]
async fn follow_up_plan(account: String, calls: u32) -> String {
    format!("Plan {calls} follow-up calls with {account}.")
}

#[prompt(description = "Remind the user to log their activity")]
fn activity_reminder() -> &'static str {
    "Log today's calls and meetings."
}

#[prompt(params(stage = "Pipeline stage"))]
fn stage_checklist(stage: Option<String>) -> Result<PromptMessage, PromptError> {
    match stage.as_deref() {
        Some("won") | None => Ok(PromptMessage::new_text(
            Role::Assistant,
            "Send the welcome pack.",
        )),
        Some(other) => Err(PromptError::InvalidParameters(format!(
            "Unknown stage: {other}"
        ))),
    }
}

fn args(value: Value) -> HashMap<String, Value> {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_generated_metadata() {
    assert_eq!(FollowUpPlan.name(), "follow_up_plan");
    assert_eq!(
        FollowUpPlan.description(),
        Some("Plan a sequence of follow-up calls")
    );
    assert_eq!(
        FollowUpPlan.arguments(),
        Some(vec![
            PromptArgument {
                name: "account".to_string(),
                description: Some("Account to follow up with".to_string()),
                required: Some(true),
            },
            PromptArgument {
                name: "calls".to_string(),
                description: Some("How many calls to plan (default: \"3\")".to_string()),
                required: Some(true),
            },
        ])
    );

    assert_eq!(ActivityReminder.arguments(), None);
    assert_eq!(StageChecklist.description(), None);
}

#[tokio::test]
async fn test_typed_argument_and_default() {
    let messages = FollowUpPlan
        .call(args(json!({"account": "Acme", "calls": 5})))
        .await
        .unwrap();
    assert_eq!(
        messages,
        vec![PromptMessage::new_text(
            Role::User,
            "Plan 5 follow-up calls with Acme."
        )]
    );

    let messages = FollowUpPlan
        .call(args(json!({"account": "Acme"})))
        .await
        .unwrap();
    assert_eq!(
        messages,
        vec![PromptMessage::new_text(
            Role::User,
            "Plan 3 follow-up calls with Acme."
        )]
    );
}

#[tokio::test]
async fn test_badly_typed_argument() {
    let err = FollowUpPlan
        .call(args(json!({"account": "Acme", "calls": "several"})))
        .await
        .unwrap_err();
    assert!(matches!(err, PromptError::InvalidParameters(msg) if msg.starts_with("Invalid argument calls")));
}

#[tokio::test]
async fn test_sync_functions_and_extra_arguments() {
    let messages = ActivityReminder
        .call(args(json!({"unused": true})))
        .await
        .unwrap();
    assert_eq!(
        messages,
        vec![PromptMessage::new_text(
            Role::User,
            "Log today's calls and meetings."
        )]
    );
}

#[tokio::test]
async fn test_handler_errors_pass_through() {
    let messages = StageChecklist.call(HashMap::new()).await.unwrap();
    assert_eq!(messages[0].role, Role::Assistant);

    let err = StageChecklist
        .call(args(json!({"stage": "lost"})))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PromptError::InvalidParameters("Unknown stage: lost".to_string())
    );
}
