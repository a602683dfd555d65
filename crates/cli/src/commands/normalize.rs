use crate::{OutputFormat, Settings};

pub(crate) fn cmd_normalize(text: &str, settings: Settings) {
    let normalized = bterm_core::normalize(text);
    match settings.output {
        OutputFormat::Text => println!("{}", normalized),
        OutputFormat::Json => println!("{}", serde_json::json!({ "normalized": normalized })),
    }
}
