//! `fua document` command - Document management

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::common::{self, cell, FormInput, ListRow};
use crate::cli::helpers::truncate_str;
use crate::cli::GlobalOpts;
use crate::entities::document::Document;

#[derive(Subcommand, Debug)]
pub enum DocumentCommands {
    /// List documents
    List,

    /// Show a document's details
    Show(ShowArgs),

    /// Create a new document
    New(NewArgs),

    /// Edit an existing document
    Edit(EditArgs),

    /// Delete a document
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Document id
    pub id: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct FieldArgs {
    /// Document title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Size in bytes
    #[arg(long, short = 's')]
    pub size: Option<i64>,

    /// MIME type, e.g. application/pdf
    #[arg(long)]
    pub mime_type: Option<String>,

    /// Content id to attach, or "none" to detach
    #[arg(long, value_name = "ID|none")]
    pub content: Option<String>,

    /// Car id to file the document under, or "none"
    #[arg(long, value_name = "ID|none")]
    pub car: Option<String>,

    /// Set any field (repeatable), e.g. --set title=Manual
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
    /// Document id
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Document id
    pub id: i64,
}

impl ListRow for Document {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Size", "MIME Type", "Content", "Car"];

    fn row(&self) -> Vec<String> {
        vec![
            cell(&self.id),
            truncate_str(&cell(&self.title), 40),
            cell(&self.size),
            cell(&self.mime_type),
            cell(&self.content.as_ref().map(|r| r.id)),
            cell(&self.car.as_ref().map(|r| r.label())),
        ]
    }
}

/// Run a document subcommand
pub fn run(cmd: DocumentCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DocumentCommands::List => common::run_list::<Document>(global),
        DocumentCommands::Show(args) => common::run_show::<Document>(&args.id, global),
        DocumentCommands::New(args) => run_form(None, args.fields, global),
        DocumentCommands::Edit(args) => run_form(Some(&args.id), args.fields, global),
        DocumentCommands::Delete(args) => common::run_delete::<Document>(args.id, global),
    }
}

fn run_form(id: Option<&str>, args: FieldArgs, global: &GlobalOpts) -> Result<()> {
    let mut input = FormInput::new(args.interactive);
    input.field("title", args.title);
    input.field("size", args.size);
    input.field("mimeType", args.mime_type);
    input.field("content", args.content);
    input.field("car", args.car);
    input.extend_raw(&args.set)?;

    common::run_form::<Document, _>(id, input, global, |_, _| Ok(()))
}
