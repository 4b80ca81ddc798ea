use std::{
    any::Any,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
    sync::Arc,
    time::Duration,
};

use shared::{
    domain::FaultCategory,
    error::{Fault, Outcome},
};
use storage::{ConnectRequest, DatabaseProbe};
use tokio::runtime::Handle;
use tracing::debug;

use crate::{
    error::ConsoleResult,
    pause::{Interrupt, Pause, PauseOutcome},
    reader::{Console, Retry},
    records::{RecordError, RecordReader},
    registry::TypeRegistry,
};

pub const SAMPLE: [i32; 5] = [10, 20, 30, 40, 50];

const NUMERATOR_RETRY: Retry = Retry {
    guidance: "Invalid input. Enter a valid number.",
    prompt: "Enter numerator: ",
};
const DENOMINATOR_RETRY: Retry = Retry {
    guidance: "Invalid input. Enter a valid number.",
    prompt: "Enter denominator: ",
};
const INDEX_RETRY: Retry = Retry {
    guidance: "Invalid input. Enter a number between 0 and 4.",
    prompt: "Enter array index: ",
};
const SLEEP_RETRY: Retry = Retry {
    guidance: "Invalid input. Enter a valid number.",
    prompt: "Enter sleep duration: ",
};

/// The eleven fault demonstrations and what they need to run.
///
/// Each demonstration reads its own inputs from the console, catches the fault
/// it provokes and hands back an [`Outcome`]. Nothing here returns an error
/// except the console itself failing or closing.
pub struct Demonstrations {
    handle: Handle,
    probe: Arc<dyn DatabaseProbe>,
    pause: Pause,
    registry: TypeRegistry,
}

impl Demonstrations {
    pub fn new(handle: Handle, probe: Arc<dyn DatabaseProbe>, interrupt: Interrupt) -> Self {
        let pause = Pause::new(handle.clone(), interrupt);
        Self {
            handle,
            probe,
            pause,
            registry: TypeRegistry::builtin(),
        }
    }

    pub fn run<R: BufRead, W: Write>(
        &self,
        category: FaultCategory,
        console: &mut Console<R, W>,
    ) -> ConsoleResult<Outcome> {
        match category {
            FaultCategory::Io => {
                console.prompt("Enter the filename to read: ")?;
                let filename = console.next_token()?;
                Ok(read_first_line(Path::new(&filename)))
            }
            FaultCategory::FileNotFound => {
                console.prompt("Enter the filename to open: ")?;
                let filename = console.next_token()?;
                Ok(open_for_reading(Path::new(&filename)))
            }
            FaultCategory::EndOfFile => {
                console.prompt("Enter the file name to read: ")?;
                let filename = console.next_token()?;
                print_records(Path::new(&filename), console)
            }
            FaultCategory::Sql => self.connect_database(console),
            FaultCategory::ClassNotFound => {
                console.prompt("Enter class name to load: ")?;
                let name = console.next_token()?;
                Ok(self.load_type(&name))
            }
            FaultCategory::Arithmetic => {
                console.prompt(NUMERATOR_RETRY.prompt)?;
                let numerator = console.read_int(NUMERATOR_RETRY)?;
                console.prompt(DENOMINATOR_RETRY.prompt)?;
                let denominator = console.read_int(DENOMINATOR_RETRY)?;
                Ok(divide(numerator, denominator))
            }
            FaultCategory::NullPointer => {
                console.prompt("Enter a string (or type 'null' to simulate null): ")?;
                let input = console.next_token()?;
                let value = (input != "null").then_some(input.as_str());
                Ok(measure(value))
            }
            FaultCategory::IndexOutOfBounds => {
                console.prompt("Enter array index to access (0-4): ")?;
                let index = console.read_int(INDEX_RETRY)?;
                Ok(element_at(index))
            }
            FaultCategory::ClassCast => {
                console.say("Attempting an invalid cast...")?;
                Ok(invalid_cast())
            }
            FaultCategory::IllegalArgument => {
                console.prompt("Enter sleep duration in milliseconds: ")?;
                let duration = console.read_int(SLEEP_RETRY)?;
                Ok(self.sleep(duration))
            }
            FaultCategory::NumberFormat => {
                console.prompt("Enter a number to parse: ")?;
                let input = console.next_token()?;
                Ok(parse_number(&input))
            }
        }
    }

    fn connect_database<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> ConsoleResult<Outcome> {
        console.prompt("Enter database URL: ")?;
        let url = console.next_token()?;
        console.prompt("Enter username: ")?;
        let username = console.next_token()?;
        console.prompt("Enter password: ")?;
        let password = console.next_token()?;

        let request = ConnectRequest::new(url, username, password);
        Ok(match self.handle.block_on(self.probe.connect(&request)) {
            Ok(()) => Outcome::success("Connected to the database successfully."),
            Err(error) => Outcome::failure_with(Fault::ConnectFailed, format!("{error:#}")),
        })
    }

    pub fn load_type(&self, name: &str) -> Outcome {
        match self.registry.resolve(name) {
            Some(loaded) => {
                debug!(name = loaded.name, id = ?loaded.id, "type resolved");
                Outcome::success("Class loaded successfully.")
            }
            None => Outcome::failure_with(Fault::TypeNotFound, format!("no type named '{name}'")),
        }
    }

    pub fn sleep(&self, duration_ms: i32) -> Outcome {
        let Ok(millis) = u64::try_from(duration_ms) else {
            return Outcome::failure_with(Fault::NegativeDuration, format!("{duration_ms}ms"));
        };

        match self.pause.wait(Duration::from_millis(millis)) {
            PauseOutcome::Completed => {
                Outcome::success(format!("Slept for {duration_ms} milliseconds."))
            }
            PauseOutcome::Interrupted => Outcome::failure(Fault::Interrupted),
        }
    }
}

/// First line of a text file; a file with no line at all reads as `null`.
pub fn read_first_line(path: &Path) -> Outcome {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => return Outcome::failure_with(Fault::Unreadable, error),
    };

    let mut raw = Vec::new();
    match BufReader::new(file).read_until(b'\n', &mut raw) {
        Ok(0) => return Outcome::success("File content: null"),
        Ok(_) => {}
        Err(error) => return Outcome::failure_with(Fault::Unreadable, error),
    }

    // A line ends at `\n`, `\r` or `\r\n`; undecodable bytes become U+FFFD.
    let end = raw
        .iter()
        .position(|byte| matches!(byte, b'\n' | b'\r'))
        .unwrap_or(raw.len());
    Outcome::success(format!(
        "File content: {}",
        String::from_utf8_lossy(&raw[..end])
    ))
}

pub fn open_for_reading(path: &Path) -> Outcome {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => return Outcome::failure_with(Fault::FileMissing, error),
    };

    // Directories open fine on unix but are not readable files.
    match file.metadata() {
        Ok(metadata) if metadata.is_dir() => {
            Outcome::failure_with(Fault::FileMissing, "is a directory")
        }
        Ok(_) => Outcome::success("File opened successfully."),
        Err(error) => Outcome::failure_with(Fault::FileMissing, error),
    }
}

/// Prints every record in the file, then reports how the stream ended.
pub fn print_records<R: BufRead, W: Write>(
    path: &Path,
    console: &mut Console<R, W>,
) -> ConsoleResult<Outcome> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => return Ok(Outcome::failure_with(Fault::StreamUnreadable, error)),
    };

    let mut records = RecordReader::new(BufReader::new(file));
    loop {
        match records.next_record() {
            Ok(record) => console.say(record)?,
            Err(RecordError::EndOfStream) => return Ok(Outcome::failure(Fault::EndOfStream)),
            Err(error) => return Ok(Outcome::failure_with(Fault::StreamUnreadable, error)),
        }
    }
}

pub fn divide(numerator: i32, denominator: i32) -> Outcome {
    if denominator == 0 {
        return Outcome::failure(Fault::DivisionByZero);
    }
    // i32::MIN / -1 wraps instead of trapping.
    Outcome::success(format!("Result: {}", numerator.wrapping_div(denominator)))
}

/// Length in UTF-16 code units; `None` stands in for an absent string.
pub fn measure(value: Option<&str>) -> Outcome {
    match value {
        Some(text) => Outcome::success(format!("String length: {}", text.encode_utf16().count())),
        None => Outcome::failure(Fault::NullAccess),
    }
}

pub fn element_at(index: i32) -> Outcome {
    usize::try_from(index)
        .ok()
        .and_then(|position| SAMPLE.get(position))
        .map(|value| Outcome::success(format!("Value at index {index}: {value}")))
        .unwrap_or_else(|| Outcome::failure_with(Fault::IndexOutOfRange, format!("index {index}")))
}

pub fn invalid_cast() -> Outcome {
    let value: Box<dyn Any> = Box::new("Test String");
    match value.downcast::<i32>() {
        Ok(number) => Outcome::success(format!("Cast value: {number}")),
        Err(_) => Outcome::failure_with(Fault::InvalidCast, "&str is not i32"),
    }
}

pub fn parse_number(input: &str) -> Outcome {
    match input.parse::<i32>() {
        Ok(number) => Outcome::success(format!("Parsed number: {number}")),
        Err(error) => Outcome::failure_with(Fault::InvalidNumber, error),
    }
}

#[cfg(test)]
#[path = "tests/operations_tests.rs"]
mod tests;
