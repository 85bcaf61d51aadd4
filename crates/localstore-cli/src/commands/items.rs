//! One-shot item commands
//!
//! Usage:
//!   localstore list
//!   localstore add <NAME>... [--save]
//!   localstore save
//!   localstore reset

use crate::context::{report_outcome, AppContext, CliResult};
use clap::Args;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Names to add, in order
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Persist the store after adding
    #[arg(long)]
    pub save: bool,
}

pub fn execute_list(ctx: &AppContext) -> CliResult {
    let session = ctx.open_session()?;
    for item in session.items() {
        println!("{}", item);
    }
    Ok(())
}

pub fn execute_add(ctx: &AppContext, args: AddArgs) -> CliResult {
    let mut session = ctx.open_session()?;

    for name in &args.names {
        match session.insert(name)? {
            Some(id) => println!("added {} (id: {})", name.trim(), id),
            None => eprintln!("skipped blank name"),
        }
    }

    if args.save {
        session.persist()?;
        println!("saved {} item(s)", session.items().len());
    } else {
        eprintln!("note: not saved (pass --save to persist)");
    }
    Ok(())
}

pub fn execute_save(ctx: &AppContext) -> CliResult {
    let mut session = ctx.open_session()?;
    session.persist()?;
    println!("saved {} item(s)", session.items().len());
    Ok(())
}

pub fn execute_reset(ctx: &AppContext) -> CliResult {
    let mut session = ctx.session();
    let outcome = session.reset()?;
    report_outcome(&outcome);
    println!("reset: stored snapshot removed");
    Ok(())
}
