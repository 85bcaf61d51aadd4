//! Counter command
//!
//! Usage: localstore counter   (each line on stdin is one click)

use crate::context::CliResult;
use crate::counter::ClickCounter;
use std::io::{self, BufRead, Write};

pub fn execute() -> CliResult {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run(stdin.lock(), &mut stdout)?;
    Ok(())
}

fn run<R: BufRead, W: Write>(input: R, out: &mut W) -> io::Result<()> {
    let mut counter = ClickCounter::new();
    writeln!(out, "{}", counter.label())?;
    for line in input.lines() {
        line?;
        counter.click();
        writeln!(out, "{}", counter.label())?;
    }
    Ok(())
}
