//! Interactive roster shell.
//!
//! Each line is one user action and runs to completion before the next
//! prompt. Notices live in the status line above the prompt until their
//! slot expires or a newer notice replaces them.

use crate::terminal::{TableRenderer, TerminalNotifier};
use gradebook_core::{KeyValueStore, RosterController};
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::time::Instant;

const HELP: &str = "\
commands:
  add <name> <score1> <score2> <score3>   register a student
  delete <position>                       remove the student at position
  list                                    show the roster
  help                                    show this help
  quit                                    leave the shell";

pub type ShellController<S> = RosterController<S, TerminalNotifier, TableRenderer>;

/// Runs the read-eval loop until `quit` or end of input.
pub fn run<S: KeyValueStore>(controller: &mut ShellController<S>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if let Some(status) = controller.notifier_mut().status_line(Instant::now()) {
            println!("{status}");
        }
        print!("gradebook> ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            println!();
            return Ok(());
        };

        match dispatch(controller, &line) {
            ShellFlow::Continue => {}
            ShellFlow::Quit => return Ok(()),
        }
    }
}

enum ShellFlow {
    Continue,
    Quit,
}

fn dispatch<S: KeyValueStore>(controller: &mut ShellController<S>, line: &str) -> ShellFlow {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return ShellFlow::Continue;
    };
    let args: Vec<&str> = words.collect();

    match command {
        "add" => {
            let [name, score1, score2, score3] = split_add_args(&args);
            // Rejections are already surfaced through the notifier.
            let _ = controller.submit(&name, &score1, &score2, &score3);
        }
        "delete" | "del" => match args.first().map(|raw| raw.parse::<i64>()) {
            Some(Ok(position)) => delete_at(controller, position),
            _ => println!("usage: delete <position>"),
        },
        "list" | "ls" => controller.render(),
        "help" | "?" => println!("{HELP}"),
        "quit" | "exit" => return ShellFlow::Quit,
        other => println!("unknown command `{other}`; type `help`"),
    }

    ShellFlow::Continue
}

/// Deletes by display position; negative or unknown positions are ignored.
pub fn delete_at<S: KeyValueStore>(controller: &mut ShellController<S>, position: i64) {
    let Ok(position) = usize::try_from(position) else {
        return;
    };
    let display_name = controller
        .records()
        .get(position)
        .map(|record| record.name.clone())
        .unwrap_or_default();
    controller.delete_record(position, &display_name);
}

/// Splits `add` arguments into name and three score fields.
///
/// The last three words are scores and everything before them is the name.
/// Missing fields come back empty so validation reports them.
fn split_add_args<'a>(args: &[&'a str]) -> [Cow<'a, str>; 4] {
    if args.len() < 4 {
        let mut fields: [Cow<'a, str>; 4] = Default::default();
        for (field, arg) in fields.iter_mut().zip(args) {
            *field = Cow::Borrowed(*arg);
        }
        return fields;
    }

    let (name, scores) = args.split_at(args.len() - 3);
    [
        Cow::Owned(name.join(" ")),
        Cow::Borrowed(scores[0]),
        Cow::Borrowed(scores[1]),
        Cow::Borrowed(scores[2]),
    ]
}
