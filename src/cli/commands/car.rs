//! `fua car` command - Car management

use clap::Subcommand;
use miette::Result;

use crate::cli::commands::common::{self, cell, FormInput, ListRow};
use crate::cli::GlobalOpts;
use crate::entities::car::Car;

#[derive(Subcommand, Debug)]
pub enum CarCommands {
    /// List cars
    List,

    /// Show a car's details
    Show(ShowArgs),

    /// Create a new car
    New(NewArgs),

    /// Edit an existing car
    Edit(EditArgs),

    /// Delete a car
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Car id
    pub id: String,
}

#[derive(clap::Args, Debug, Default)]
pub struct FieldArgs {
    /// Car model
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Set any field (repeatable), e.g. --set model=Roadster
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
    /// Car id
    pub id: String,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Car id
    pub id: i64,
}

impl ListRow for Car {
    const HEADERS: &'static [&'static str] = &["ID", "Model"];

    fn row(&self) -> Vec<String> {
        vec![cell(&self.id), cell(&self.model)]
    }
}

/// Run a car subcommand
pub fn run(cmd: CarCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CarCommands::List => common::run_list::<Car>(global),
        CarCommands::Show(args) => common::run_show::<Car>(&args.id, global),
        CarCommands::New(args) => run_form(None, args.fields, global),
        CarCommands::Edit(args) => run_form(Some(&args.id), args.fields, global),
        CarCommands::Delete(args) => common::run_delete::<Car>(args.id, global),
    }
}

fn run_form(id: Option<&str>, args: FieldArgs, global: &GlobalOpts) -> Result<()> {
    let mut input = FormInput::new(args.interactive);
    input.field("model", args.model);
    input.extend_raw(&args.set)?;

    common::run_form::<Car, _>(id, input, global, |_, _| Ok(()))
}
