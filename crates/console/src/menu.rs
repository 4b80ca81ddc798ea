use std::io::{BufRead, Write};

use shared::{
    domain::{menu_lines, FaultCategory, MenuSelection, MENU_TITLE},
    error::Outcome,
};
use tracing::{debug, info};

use crate::{
    error::{ConsoleError, ConsoleResult},
    operations::Demonstrations,
    reader::{Console, Retry},
};

pub const MENU_PROMPT: &str = "Enter your choice (0-11): ";
pub const FAREWELL: &str = "Exiting the program. Goodbye!";
pub const INVALID_CHOICE: &str = "Invalid choice. Try again!";

const MENU_RETRY: Retry = Retry {
    guidance: "Please enter a valid number between 0 and 11.",
    prompt: "Enter your choice: ",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// The user chose 0.
    Exit,
    /// Input ran out before an exit was chosen.
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSummary {
    pub exit: MenuExit,
    pub dispatched: usize,
}

/// Runs the menu until the user exits or the input runs dry.
///
/// Only console I/O failures escape; every demonstration fault is rendered
/// and the menu shown again.
pub fn run<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    demos: &Demonstrations,
) -> ConsoleResult<MenuSummary> {
    let mut dispatched = 0;

    loop {
        render_menu(console)?;

        let choice = match console.read_int(MENU_RETRY) {
            Ok(choice) => choice,
            Err(ConsoleError::InputClosed) => return close(console, dispatched),
            Err(error) => return Err(error),
        };

        match MenuSelection::from_choice(choice) {
            MenuSelection::Exit => {
                console.say(FAREWELL)?;
                return Ok(MenuSummary {
                    exit: MenuExit::Exit,
                    dispatched,
                });
            }
            MenuSelection::OutOfRange(choice) => {
                debug!(choice, "menu choice out of range");
                console.say(INVALID_CHOICE)?;
            }
            MenuSelection::Run(category) => {
                info!(category = category.label(), "running demonstration");
                let outcome = match demos.run(category, console) {
                    Ok(outcome) => outcome,
                    Err(ConsoleError::InputClosed) => return close(console, dispatched + 1),
                    Err(error) => return Err(error),
                };
                dispatched += 1;
                log_outcome(category, &outcome);
                console.say(&outcome)?;
            }
        }
    }
}

fn render_menu<R: BufRead, W: Write>(console: &mut Console<R, W>) -> ConsoleResult<()> {
    console.say("")?;
    console.say(MENU_TITLE)?;
    for line in menu_lines() {
        console.say(line)?;
    }
    console.prompt(MENU_PROMPT)
}

fn close<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    dispatched: usize,
) -> ConsoleResult<MenuSummary> {
    debug!(dispatched, "input closed before exit was chosen");
    // Finish the dangling prompt line before saying goodbye.
    console.say("")?;
    console.say(FAREWELL)?;
    Ok(MenuSummary {
        exit: MenuExit::InputClosed,
        dispatched,
    })
}

fn log_outcome(category: FaultCategory, outcome: &Outcome) {
    match outcome {
        Outcome::Success(_) => debug!(category = category.label(), "demonstration succeeded"),
        Outcome::Failure { fault, detail } => debug!(
            category = fault.category().label(),
            ?fault,
            detail = detail.as_deref().unwrap_or_default(),
            "demonstration fault caught"
        ),
    }
}
