//! `fua content` command - Content (uploaded file data) management

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::cli::commands::common::{self, cell, FormInput, ListRow};
use crate::cli::helpers::TerminalNotifier;
use crate::cli::GlobalOpts;
use crate::core::data::load_file_into_form;
use crate::core::session::EditSession;
use crate::entities::content::Content;

#[derive(Subcommand, Debug)]
pub enum ContentCommands {
    /// List contents
    List,

    /// Show a content record (data included)
    Show(ShowArgs),

    /// Upload a new content record
    New(NewArgs),

    /// Replace or edit an existing content record
    Edit(EditArgs),

    /// Delete a content record
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Content id
    pub id: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct FieldArgs {
    /// File whose bytes become the content data
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Reject files that are not images
    #[arg(long, requires = "file")]
    pub image: bool,

    /// Media type (overrides the one guessed from --file)
    #[arg(long)]
    pub content_type: Option<String>,

    /// Set any field (repeatable), e.g. --set dataContentType=text/plain
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Prompt for each field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Content id
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Content id
    pub id: i64,
}

impl ListRow for Content {
    const HEADERS: &'static [&'static str] = &["ID", "Content Type", "Bytes"];

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            cell(&self.data_content_type),
            cell(&self.decoded_len()),
        ]
    }
}

/// Run a content subcommand
pub fn run(cmd: ContentCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ContentCommands::List => common::run_list::<Content>(global),
        ContentCommands::Show(args) => common::run_show::<Content>(&args.id, global),
        ContentCommands::New(args) => run_form(None, args.fields, global),
        ContentCommands::Edit(args) => run_form(Some(&args.id), args.fields, global),
        ContentCommands::Delete(args) => common::run_delete::<Content>(args.id, global),
    }
}

fn run_form(id: Option<&str>, args: FieldArgs, global: &GlobalOpts) -> Result<()> {
    let mut input = FormInput::new(args.interactive).skipping(&["data"]);
    input.extend_raw(&args.set)?;

    let quiet = global.quiet;
    common::run_form::<Content, _>(id, input, global, move |session, notifier| {
        let file = match args.file {
            Some(file) => Some(file),
            None if args.interactive => prompt_file()?,
            None => None,
        };

        if let Some(path) = &file {
            attach_file(session, path, args.image, notifier, quiet)?;
        }
        if let Some(content_type) = &args.content_type {
            session
                .set("dataContentType", content_type)
                .map_err(|e| miette::miette!("{}", e))?;
        }
        Ok(())
    })
}

fn attach_file(
    session: &mut EditSession<Content>,
    path: &Path,
    image: bool,
    notifier: &mut TerminalNotifier,
    quiet: bool,
) -> Result<()> {
    let loaded = load_file_into_form(session.form_mut(), "data", path, image, notifier)
        .map_err(|_| miette::miette!("Could not use {} as content data", path.display()))?;

    if !quiet {
        println!(
            "{} Loaded {} ({} bytes, {})",
            style("✓").green(),
            style(path.display()).cyan(),
            loaded.size,
            style(&loaded.content_type).yellow()
        );
    }
    Ok(())
}

fn prompt_file() -> Result<Option<PathBuf>> {
    let raw: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("file (empty to keep current data)")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    let raw = raw.trim();
    Ok(if raw.is_empty() {
        None
    } else {
        Some(PathBuf::from(raw))
    })
}
