use proc_macro::TokenStream;

mod prompt;

/// Turn a function into a prompt handler.
///
/// Generates a unit struct named after the function in PascalCase, implementing
/// `folio::PromptHandler`. The prompt is named after the function itself.
///
/// ```rust,ignore
/// #[prompt(
///     description = "Draft a kickoff agenda",
///     params(client = "Who the project is for", date = "When the kickoff happens"),
///     defaults(date = "TBD")
/// )]
/// async fn kickoff_agenda(client: String, date: Option<String>) -> String { ... }
/// ```
#[proc_macro_attribute]
pub fn prompt(args: TokenStream, input: TokenStream) -> TokenStream {
    prompt::prompt(args, input)
}
