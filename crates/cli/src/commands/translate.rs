use std::process;

use bterm_core::{EventBTranslator, InMemoryDatabase, ModelSnapshot, TranslateError, WireTerm};

use crate::{report_error, ModelArgs, OutputFormat, Settings};

/// Which translator entry point a subcommand drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Entry {
    Expression,
    Predicate,
    Transition,
}

pub(crate) fn cmd_translate(entry: Entry, text: &str, model: &ModelArgs, settings: Settings) {
    let snapshot = match ModelSnapshot::load(&model.model) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e.to_string(), settings.output, settings.quiet);
            process::exit(1);
        }
    };
    let db = InMemoryDatabase::from_snapshot(snapshot);
    let translator = EventBTranslator::new(&db, model.root.clone());

    let result = match entry {
        Entry::Expression => translator.translate_expression(text, settings.wrap),
        Entry::Predicate => translator.translate_predicate(text, settings.wrap),
        Entry::Transition => translator.translate_transition_predicate(text, settings.wrap),
    };

    match result {
        Ok(term) => print_term(&term, settings.output),
        Err(e) => {
            print_translate_error(&e, settings);
            process::exit(1);
        }
    }
}

fn print_term(term: &WireTerm, output: OutputFormat) {
    match output {
        OutputFormat::Text => println!("{}", term),
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(term)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

fn print_translate_error(e: &TranslateError, settings: Settings) {
    match settings.output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !settings.quiet {
                eprintln!("{}", e);
            }
        }
    }
}
