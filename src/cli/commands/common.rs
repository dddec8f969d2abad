//! Shared implementation of the per-record commands
//!
//! `document`, `content` and `car` differ only in their field flags and list
//! columns; listing, showing, deleting and the create/edit flow are the same
//! for every record type and live here.

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::Value;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{connect, parse_assignment, TerminalNavigator, TerminalNotifier};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Entity;
use crate::core::form::{EntityForm, FormError};
use crate::core::resolver::{enter, resolve};
use crate::core::save::{SaveError, SaveOutcome};
use crate::core::session::EditSession;
use crate::core::transport::{EntityTransport, Transport};

/// Table layout of a record type in `list` output
pub trait ListRow: Entity {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

/// Field values gathered from the command line
#[derive(Debug, Default)]
pub struct FormInput {
    /// `(field, raw value)` pairs, applied in order
    pub assignments: Vec<(String, String)>,
    /// Prompt for every editable field after applying the assignments
    pub interactive: bool,
    /// Fields the generic prompts leave alone
    pub skip_prompts: &'static [&'static str],
}

impl FormInput {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            ..Default::default()
        }
    }

    /// Queue `field = value` if a value was given
    pub fn field(&mut self, field: &str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.assignments.push((field.to_string(), value.to_string()));
        }
    }

    /// Queue generic `key=value` assignments
    pub fn extend_raw(&mut self, raw: &[String]) -> Result<()> {
        for item in raw {
            let pair = parse_assignment(item).map_err(|e| miette::miette!("{}", e))?;
            self.assignments.push(pair);
        }
        Ok(())
    }

    pub fn skipping(mut self, fields: &'static [&'static str]) -> Self {
        self.skip_prompts = fields;
        self
    }
}

/// Format a missing optional value for tables
pub fn cell<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `list`: every record of the kind
pub fn run_list<E: ListRow>(global: &GlobalOpts) -> Result<()> {
    let transport = connect(global);
    let records: Vec<E> = transport
        .query_entities(None)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&records).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Auto => {
            if records.is_empty() {
                if !global.quiet {
                    println!("No {}s found.", E::KIND);
                }
                return Ok(());
            }

            let mut builder = Builder::default();
            builder.push_record(E::HEADERS.iter().copied());
            for record in &records {
                builder.push_record(record.row());
            }
            let mut table = builder.build();
            table.with(Style::markdown());
            println!("{}", table);

            if !global.quiet {
                println!();
                println!(
                    "{} {}(s) found.",
                    style(records.len()).cyan(),
                    E::KIND
                );
            }
        }
    }

    Ok(())
}

/// `show <id>`: one record
pub fn run_show<E: Entity>(id: &str, global: &GlobalOpts) -> Result<()> {
    let transport = connect(global);
    let record = find::<E, _>(&transport, id)?;
    print_record(&record, global.format)
}

/// `delete <id>`
pub fn run_delete<E: Entity>(id: i64, global: &GlobalOpts) -> Result<()> {
    let transport = connect(global);
    transport
        .delete(E::KIND, id)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Deleted {} {}",
            style("✓").green(),
            E::KIND,
            style(id).cyan()
        );
    }
    Ok(())
}

/// `new` / `edit <id>`: open an edit session, apply the input and save
///
/// `prepare` runs after the command-line assignments and before any prompt;
/// record types use it for inputs that are not plain field values.
pub fn run_form<E, F>(
    id: Option<&str>,
    input: FormInput,
    global: &GlobalOpts,
    prepare: F,
) -> Result<()>
where
    E: Entity,
    F: FnOnce(&mut EditSession<E>, &mut TerminalNotifier) -> Result<()>,
{
    let transport = connect(global);
    let mut navigator = TerminalNavigator::new();
    let mut notifier = TerminalNotifier::new();

    let resolution = resolve::<E, _>(&transport, id).map_err(|e| miette::miette!("{}", e))?;
    let Some(seed) = enter(resolution, &mut navigator) else {
        return Err(not_found::<E>(id.unwrap_or_default()));
    };

    let mut session = EditSession::<E>::new();
    session.open(seed);
    session.load_options(&transport, &mut notifier);

    for (field, value) in &input.assignments {
        session.set(field, value).map_err(|e| miette::miette!("{}", e))?;
    }

    prepare(&mut session, &mut notifier)?;

    if input.interactive {
        prompt_fields(&mut session, input.skip_prompts)?;
    }

    let updating = session.seed().is_some();
    match session.save(&transport, &mut navigator, &mut notifier) {
        Ok(SaveOutcome::Saved(saved)) => {
            report_saved(&saved, updating, global)?;
            Ok(())
        }
        Ok(SaveOutcome::Failed(_)) => Err(miette::miette!("{} was not saved", E::KIND)),
        Ok(SaveOutcome::Stale) => Err(miette::miette!("{} edit was abandoned", E::KIND)),
        Err(SaveError::Form(FormError::Invalid(violations))) => {
            for violation in &violations {
                eprintln!(
                    "{} {}: {}",
                    style("✗").red(),
                    style(violation.field).yellow(),
                    violation.message
                );
            }
            Err(miette::miette!(
                "{} form is invalid ({} field(s) need a value)",
                E::KIND,
                violations.len()
            ))
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn find<E, T>(transport: &T, id: &str) -> Result<E>
where
    E: Entity,
    T: Transport + ?Sized,
{
    let mut navigator = TerminalNavigator::new();
    let resolution = resolve::<E, _>(transport, Some(id)).map_err(|e| miette::miette!("{}", e))?;
    match enter(resolution, &mut navigator) {
        Some(Some(record)) => Ok(record),
        _ => Err(not_found::<E>(id)),
    }
}

fn not_found<E: Entity>(id: &str) -> miette::Report {
    miette::miette!("No {} found with id '{}'", E::KIND, id)
}

fn print_record<E: Entity>(record: &E, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(record).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml | OutputFormat::Auto => {
            let yaml = serde_yml::to_string(record).into_diagnostic()?;
            print!("{}", yaml);
        }
    }
    Ok(())
}

fn report_saved<E: Entity>(saved: &E, updating: bool, global: &GlobalOpts) -> Result<()> {
    if global.format != OutputFormat::Auto {
        return print_record(saved, global.format);
    }
    if !global.quiet {
        let id = saved.key().map(|id| id.to_string()).unwrap_or_default();
        println!(
            "{} {} {} {}",
            style("✓").green(),
            if updating { "Updated" } else { "Created" },
            E::KIND,
            style(id).cyan()
        );
    }
    Ok(())
}

/// Prompt for every editable field, skipping `id` and `skip`
///
/// Scalar fields are edited as text, starting from their current value.
/// Reference fields offer the published option list plus "(none)".
fn prompt_fields<E: Entity>(session: &mut EditSession<E>, skip: &[&str]) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!();
    println!(
        "{} {} {}",
        style("◆").cyan(),
        if session.seed().is_some() { "Editing" } else { "Creating new" },
        style(E::KIND).bold()
    );
    println!("{}", style("─".repeat(50)).dim());

    for field in <E::Form as EntityForm>::FIELDS {
        if *field == "id" || skip.contains(field) {
            continue;
        }

        if E::REFERENCES.iter().any(|spec| spec.field == *field) {
            prompt_reference(session, field, &theme)?;
            continue;
        }

        loop {
            let current = current_text(session, field);
            let value: String = Input::with_theme(&theme)
                .with_prompt(*field)
                .with_initial_text(current)
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;

            match session.set(field, &value) {
                Ok(()) => break,
                Err(e) => eprintln!("{} {}", style("✗").red(), e),
            }
        }
    }

    Ok(())
}

fn prompt_reference<E: Entity>(
    session: &mut EditSession<E>,
    field: &str,
    theme: &ColorfulTheme,
) -> Result<()> {
    let options = session.options(field).to_vec();
    let current = session.form().extract().reference(field).map(|r| r.id);

    let mut items = vec!["(none)".to_string()];
    items.extend(options.iter().map(|r| r.label()));
    let default = current
        .and_then(|id| options.iter().position(|r| r.id == id))
        .map(|i| i + 1)
        .unwrap_or(0);

    let choice = Select::with_theme(theme)
        .with_prompt(field)
        .items(&items)
        .default(default)
        .interact()
        .into_diagnostic()?;

    let id = choice.checked_sub(1).map(|i| options[i].id);
    session
        .select_reference(field, id)
        .map_err(|e| miette::miette!("{}", e))
}

/// Current value of a scalar field as editable text
fn current_text<E: Entity>(session: &EditSession<E>, field: &str) -> String {
    let value = serde_json::to_value(session.form().extract()).unwrap_or(Value::Null);
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_input_collects_given_fields() {
        let mut input = FormInput::new(false);
        input.field("title", Some("Manual"));
        input.field("size", None::<i64>);
        input.field("size", Some(2048));
        input
            .extend_raw(&["mimeType=application/pdf".to_string()])
            .unwrap();

        assert_eq!(
            input.assignments,
            vec![
                ("title".to_string(), "Manual".to_string()),
                ("size".to_string(), "2048".to_string()),
                ("mimeType".to_string(), "application/pdf".to_string()),
            ]
        );
    }

    #[test]
    fn test_form_input_rejects_bad_assignment() {
        let mut input = FormInput::new(false);
        assert!(input.extend_raw(&["no-equals".to_string()]).is_err());
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(&Some(5)), "5");
        assert_eq!(cell(&None::<String>), "-");
    }
}
