#[allow(unused)]
mod common;

use common::*;
use folio::{prompt, CatalogService, CatalogServiceBuilder, PromptError, PromptMessage};
use folio_protocol::{
    content::Role,
    jsonrpc::{ErrorCode, RequestId, ResponseItem},
    messages::{GetPromptResult, ListPromptsResult},
    prompt::{Prompt, PromptArgument},
};
use serde_json::json;

// Prompt tests
// Spec: https://spec.modelcontextprotocol.io/specification/2024-11-05/server/prompts/

#[tokio::test]
async fn test_prompts_list() {
    let mut server = init_prompt_server();

    let response = call_server(&mut server, "prompts/list", json!({}))
        .await
        .unwrap();

    match response {
        ResponseItem::Success { id, result, .. } => {
            assert_eq!(id, RequestId::Num(1));

            let actual: ListPromptsResult = serde_json::from_value(result).unwrap();
            let expected = ListPromptsResult {
                prompts: vec![
                    Prompt {
                        name: "review_deal".to_string(),
                        description: Some("Review a deal before it goes to legal".to_string()),
                        arguments: Some(vec![PromptArgument {
                            name: "deal".to_string(),
                            description: Some("Summary of the deal".to_string()),
                            required: Some(true),
                        }]),
                    },
                    Prompt {
                        name: "welcome_email".to_string(),
                        description: Some("Draft a welcome email for a new customer".to_string()),
                        arguments: Some(vec![
                            PromptArgument {
                                name: "customer".to_string(),
                                description: Some("Customer name".to_string()),
                                required: Some(true),
                            },
                            PromptArgument {
                                name: "tone".to_string(),
                                description: Some(
                                    "Tone of voice (default: \"friendly\")".to_string(),
                                ),
                                required: Some(false),
                            },
                        ]),
                    },
                    Prompt {
                        name: "weekly_digest".to_string(),
                        description: None,
                        arguments: None,
                    },
                ],
            };

            // Registration order is preserved
            assert_eq!(actual, expected);
        }
        ResponseItem::Error { .. } => {
            panic!("Expected success response");
        }
    }
}

#[tokio::test]
async fn test_prompts_get_simple() {
    let mut server = init_prompt_server();

    let result = expect_success(
        call_server(
            &mut server,
            "prompts/get",
            json!({
                "name": "review_deal",
                "arguments": {
                    "deal": "Acme, 3 seats"
                }
            }),
        )
        .await,
    );

    let actual: GetPromptResult = serde_json::from_value(result).unwrap();
    let expected = GetPromptResult {
        description: Some("Review a deal before it goes to legal".to_string()),
        messages: vec![PromptMessage::new_text(
            Role::User,
            "Please review this deal:\n\nAcme, 3 seats",
        )],
    };
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_prompts_get_wire_format() {
    let mut server = init_prompt_server();

    let result = expect_success(
        call_server(&mut server, "prompts/get", json!({"name": "weekly_digest"})).await,
    );
    assert_eq!(
        result,
        json!({
            "messages": [{
                "role": "user",
                "content": {"type": "text", "text": "Summarise this week's pipeline changes."}
            }]
        })
    );
}

#[tokio::test]
async fn test_prompts_get_defaults_without_arguments() {
    let mut server = init_prompt_server();

    // `arguments` may be omitted entirely
    let result = expect_success(
        call_server(
            &mut server,
            "prompts/get",
            json!({"name": "welcome_email", "arguments": {"customer": "Globex"}}),
        )
        .await,
    );
    let actual: GetPromptResult = serde_json::from_value(result).unwrap();
    assert_eq!(
        actual.messages,
        vec![PromptMessage::new_text(
            Role::User,
            "Write a friendly welcome email for Globex."
        )]
    );

    let result = expect_success(
        call_server(
            &mut server,
            "prompts/get",
            json!({"name": "welcome_email", "arguments": {"customer": "Globex", "tone": "formal"}}),
        )
        .await,
    );
    let actual: GetPromptResult = serde_json::from_value(result).unwrap();
    assert_eq!(
        actual.messages,
        vec![PromptMessage::new_text(
            Role::User,
            "Write a formal welcome email for Globex."
        )]
    );
}

#[tokio::test]
async fn test_prompts_get_missing_required_argument() {
    let mut server = init_prompt_server();

    let error = expect_error(
        call_server(&mut server, "prompts/get", json!({"name": "review_deal"})).await,
    );
    assert_eq!(error.code, ErrorCode::InvalidParams);
    assert_eq!(
        error.message,
        "Invalid parameters: Missing required argument: deal"
    );
}

#[tokio::test]
async fn test_prompts_get_invalid_prompt() {
    let mut server = init_prompt_server();

    let response = call_server(
        &mut server,
        "prompts/get",
        json!({
            "name": "some_invalid_prompt",
            "arguments": {}
        }),
    )
    .await
    .unwrap();

    match response {
        ResponseItem::Error { id, error, .. } => {
            assert_eq!(id, RequestId::Num(1));
            assert_eq!(error.code, ErrorCode::InvalidParams);
            assert_eq!(
                error.message,
                "Invalid parameters: Prompt not found: some_invalid_prompt"
            );
        }
        _ => {
            panic!("Expected error response");
        }
    }
}

#[tokio::test]
async fn test_prompts_get_handler_error() {
    let mut server = init_prompt_server();

    let error = expect_error(
        call_server(
            &mut server,
            "prompts/get",
            json!({"name": "review_deal", "arguments": {"deal": ""}}),
        )
        .await,
    );
    assert_eq!(error.code, ErrorCode::InternalError);
    assert_eq!(error.message, "Internal error: deal summary is empty");
}

#[tokio::test]
async fn test_prompts_get_bad_arguments() {
    let mut server = init_prompt_server();

    let error = expect_error(
        call_server(
            &mut server,
            "prompts/get",
            json!({"name": "review_deal", "arguments": ["Acme"]}),
        )
        .await,
    );
    assert_eq!(error.code, ErrorCode::InvalidParams);
    assert_eq!(
        error.message,
        "Invalid parameters: Prompt arguments must be an object"
    );
}

#[prompt(
    description = "Review a deal before it goes to legal",
    params(deal = "Summary of the deal")
)]
async fn review_deal(deal: String) -> Result<String, PromptError> {
    if deal.is_empty() {
        return Err(PromptError::InternalError(
            "deal summary is empty".to_string(),
        ));
    }
    Ok(format!("Please review this deal:\n\n{}", deal))
}

#[prompt]
fn weekly_digest() -> String {
    "Summarise this week's pipeline changes.".to_string()
}

pub fn init_prompt_server() -> CatalogService {
    init_tracing();

    CatalogServiceBuilder::new("Prompt Server".to_string(), String::new())
        .with_prompt(ReviewDeal)
        .with_prompt(WelcomeEmail)
        .with_prompt(WeeklyDigest)
        .build()
}
