//! Query command
//!
//! Usage: localstore query <SQL> [--param <VALUE>]...

use crate::context::{AppContext, CliResult};
use clap::Args;
use localstore_core::SqlValue;

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Read-only SQL to run
    pub sql: String,

    /// Positional parameter; integers and reals are bound as numbers, anything else as text
    #[arg(long = "param")]
    pub params: Vec<String>,
}

pub fn execute(ctx: &AppContext, args: QueryArgs) -> CliResult {
    let session = ctx.open_session()?;
    let params: Vec<SqlValue> = args.params.iter().map(|p| parse_param(p)).collect();

    let results = session.query(&args.sql, &params)?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn parse_param(raw: &str) -> SqlValue {
    if let Ok(v) = raw.parse::<i64>() {
        return SqlValue::Integer(v);
    }
    if let Ok(v) = raw.parse::<f64>() {
        return SqlValue::Real(v);
    }
    SqlValue::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("7"), SqlValue::Integer(7));
        assert_eq!(parse_param("1.5"), SqlValue::Real(1.5));
        assert_eq!(parse_param("milk"), SqlValue::from("milk"));
    }
}
