// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! A quick + dirty little REPL (Read + Eval + Print Loop) command line tool
//! to verify if single or multi line input is a valid MQL query, or not.
//!
//! Entering the sequence of two tildas `~~` followed by `↵` (the \[ENTER\]
//! key) initiates a multi-line mode which ends when `Ctrl-D` is pressed. In
//! this mode consecutive input is concatenated into one string before
//! processing.
//!
//! The program will first attempt to parse the input as MQL text. If it
//! fails, it will try again treating it as a JSON-encoded statement tree
//! (assuming both result classes are selected). In either case, on success
//! it will output the lowered intermediate representation of the query. On
//! the other hand, if it fails, an error message (in
//! <font color="red">red</font>) will be printed to `stderr`.
//!
//! To start the loop enter...
//! ```bash
//! cargo run --bin repl
//! ```
//! To exit the program, press `Ctrl-D`.
//!

use mc_mql::{MqlError, Query, Selection};
use std::io::{self, Write};

#[doc(hidden)]
const RED: &str = "\x1b[31m";
#[doc(hidden)]
const GREEN: &str = "\x1b[32m";
#[doc(hidden)]
const YELLOW: &str = "\x1b[33m";
#[doc(hidden)]
const RESET: &str = "\x1b[0m";
#[doc(hidden)]
const MULTILINE: &str = "~~";

macro_rules! error {
    ( $( $arg: tt )* ) => {
        {
            let msg = ::std::fmt::format(::core::format_args!($($arg)*));
            eprintln!("{RED}{msg}{RESET}");
        }
    }
}

macro_rules! info {
    ( $( $arg: tt )* ) => {
        {
            let msg = ::std::fmt::format(::core::format_args!($($arg)*));
            println!("{YELLOW}{msg}{RESET}");
        }
    }
}

macro_rules! note {
    ( $( $arg: tt )* ) => {
        {
            let msg = ::std::fmt::format(::core::format_args!($($arg)*));
            println!("{GREEN}{msg}{RESET}");
        }
    }
}

#[doc(hidden)]
fn prompt(s: &str) -> Result<(), MqlError> {
    print!("{GREEN}{s} {RESET}");
    io::stdout().flush().map_err(MqlError::IO)
}

// MQL first, JSON second. Prints whatever the front-end has to say.
fn check(input: &str) {
    match Query::try_from_mql(input) {
        Ok(x) => note!("OK! {}", x),
        Err(MqlError::Parse(_)) if input.trim_start().starts_with(['{', '[']) => {
            // looks like JSON; don't bother the user w/ MQL errors...
            check_json(input);
        }
        Err(x) => {
            error!("Failed as MQL: {}.", x);
            info!("Will try as JSON...");
            check_json(input);
        }
    }
}

fn check_json(input: &str) {
    match Query::try_from_json(input, Selection::both()) {
        Ok(x) => note!("OK! {}", x),
        Err(x) => error!("Failed as JSON: {}", x),
    }
}

/// Executable main method.
///
/// Invoke it like so...
/// ```bash
/// cargo run --bin repl
/// ```
fn main() -> Result<(), MqlError> {
    note!("Enter an MQL query (or a JSON statement) to verify.\nWhen done, hit Ctrl-D.");
    let stdin = io::stdin();
    loop {
        prompt("> ")?;
        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => {
                note!("\nSee you later...");
                break;
            }

            Ok(_) => {
                let first = line.trim();
                let input = if first == MULTILINE {
                    info!("Enter multi-line mode. Exit w/ Ctrl-D");
                    let mut lines = String::new();
                    loop {
                        prompt(">>")?;
                        let mut next = String::new();
                        match stdin.read_line(&mut next) {
                            Ok(0) => break,
                            Ok(_) => lines.push_str(&next),
                            Err(x) => {
                                error!("Failed Read: {}", x);
                                break;
                            }
                        }
                    }
                    lines
                } else {
                    first.to_owned()
                };

                check(&input);
            }
            Err(x) => {
                error!("Failed Read: {}", x);
                break;
            }
        }
    }

    Ok(())
}
