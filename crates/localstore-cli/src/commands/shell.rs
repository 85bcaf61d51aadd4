//! Interactive shell over the items page
//!
//! Usage: localstore [shell]
//!
//! Each line is one of the commands below; any other text becomes the
//! pending input that `add` inserts.

use crate::context::{AppContext, CliResult};
use localstore_store::{ItemsPage, KeyValueStore};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
commands:
  add [NAME]   insert NAME, or the pending input when NAME is omitted
  save         persist the database to storage
  reset        delete the stored snapshot and start empty
  list         show the page
  query SQL    run a read-only query and print JSON
  help         show this help
  quit         leave the shell
any other text sets the pending input";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Add(Option<&'a str>),
    Save,
    Reset,
    List,
    Query(&'a str),
    Help,
    Quit,
    Input(&'a str),
}

impl<'a> ShellCommand<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (trimmed, ""),
        };

        match (word, rest.is_empty()) {
            ("add", true) => ShellCommand::Add(None),
            ("add", false) => ShellCommand::Add(Some(rest)),
            ("save", true) => ShellCommand::Save,
            ("reset", true) => ShellCommand::Reset,
            ("list", true) => ShellCommand::List,
            ("query", false) => ShellCommand::Query(rest),
            ("help", true) => ShellCommand::Help,
            ("quit", true) | ("exit", true) => ShellCommand::Quit,
            _ => ShellCommand::Input(line),
        }
    }
}

pub fn execute(ctx: &AppContext) -> CliResult {
    let mut page = ItemsPage::new(ctx.session());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_shell(&mut page, stdin.lock(), &mut stdout)?;
    Ok(())
}

fn run_shell<S, R, W>(page: &mut ItemsPage<S>, input: R, out: &mut W) -> io::Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    page.mount();
    write!(out, "{}", page.render())?;

    for line in input.lines() {
        let line = line?;
        match ShellCommand::parse(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::Input(text) => {
                page.set_input(text);
                writeln!(out, "input: {}", page.input())?;
            }
            ShellCommand::Add(name) => {
                if let Some(name) = name {
                    page.set_input(name);
                }
                page.add();
                write!(out, "{}", page.render())?;
            }
            ShellCommand::Save => {
                if page.save() {
                    writeln!(out, "saved")?;
                }
                write!(out, "{}", page.render())?;
            }
            ShellCommand::Reset => {
                page.reset();
                write!(out, "{}", page.render())?;
            }
            ShellCommand::List => write!(out, "{}", page.render())?,
            ShellCommand::Query(sql) => match page.session().query(sql, &[]) {
                Ok(results) => {
                    let json = serde_json::to_string(&results).map_err(io::Error::other)?;
                    writeln!(out, "{}", json)?;
                }
                Err(e) => writeln!(out, "error: {}", e)?,
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use localstore_store::{LocalStoreSession, MemoryStorage};

    fn run_lines(page: &mut ItemsPage<MemoryStorage>, lines: &str) -> String {
        let mut out = Vec::new();
        run_shell(page, lines.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn page() -> ItemsPage<MemoryStorage> {
        ItemsPage::new(LocalStoreSession::new(MemoryStorage::new()))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("add"), ShellCommand::Add(None));
        assert_eq!(ShellCommand::parse("add  milk "), ShellCommand::Add(Some("milk")));
        assert_eq!(ShellCommand::parse(" save "), ShellCommand::Save);
        assert_eq!(
            ShellCommand::parse("query SELECT 1"),
            ShellCommand::Query("SELECT 1")
        );
        assert_eq!(ShellCommand::parse("quit"), ShellCommand::Quit);
    }

    #[test]
    fn test_parse_other_text_is_input() {
        assert_eq!(ShellCommand::parse("oat milk"), ShellCommand::Input("oat milk"));
        assert_eq!(ShellCommand::parse("save me"), ShellCommand::Input("save me"));
        assert_eq!(ShellCommand::parse("query"), ShellCommand::Input("query"));
    }

    #[test]
    fn test_input_then_add() {
        let mut page = page();
        let out = run_lines(&mut page, "bread\nadd\n");

        assert!(out.contains("input: bread"));
        assert!(out.contains("bread (id: 1)"));
        assert_eq!(page.input(), "");
    }

    #[test]
    fn test_save_and_reset() {
        let mut page = page();
        let out = run_lines(&mut page, "add eggs\nsave\nreset\n");

        assert!(out.contains("saved"));
        assert!(page.items().is_empty());
        assert!(page.session().storage().is_empty());
    }

    #[test]
    fn test_query_prints_json() {
        let mut page = page();
        let out = run_lines(&mut page, "add tea\nquery SELECT name FROM items\n");

        assert!(out.contains(r#"[{"columns":["name"],"values":[["tea"]]}]"#));
    }

    #[test]
    fn test_transaction_query_does_not_block_save() {
        let mut page = page();
        let out = run_lines(&mut page, "add milk\nquery BEGIN\nsave\n");

        assert!(out.contains("error: [ERR_QUERY_FAILURE]"));
        assert!(out.contains("saved"));
        assert!(!page.session().storage().is_empty());
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut page = page();
        run_lines(&mut page, "quit\nadd late\n");
        assert!(page.items().is_empty());
    }
}
