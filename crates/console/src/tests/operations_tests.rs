use std::{fs, io::Cursor, sync::Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::*;

#[derive(Default)]
struct RecordingProbe {
    accept: bool,
    seen: Mutex<Vec<ConnectRequest>>,
}

#[async_trait]
impl DatabaseProbe for RecordingProbe {
    async fn connect(&self, request: &ConnectRequest) -> Result<()> {
        self.seen.lock().expect("seen lock").push(request.clone());
        if self.accept {
            Ok(())
        } else {
            bail!("password authentication failed for user \"{}\"", request.username)
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("runtime")
}

fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn written(console: &Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(console.output().clone()).expect("utf8 output")
}

fn write_records(path: &Path, records: &[&str]) {
    let mut bytes = Vec::new();
    for record in records {
        bytes.extend((record.len() as u16).to_be_bytes());
        bytes.extend(record.as_bytes());
    }
    fs::write(path, bytes).expect("write records");
}

#[test]
fn divides_with_truncation() {
    assert_eq!(divide(7, 2).to_string(), "Result: 3");
    assert_eq!(divide(-7, 2).to_string(), "Result: -3");
    assert_eq!(divide(i32::MIN, -1).to_string(), format!("Result: {}", i32::MIN));
}

#[test]
fn division_by_zero_ignores_numerator() {
    for numerator in [0, 1, -5, i32::MAX, i32::MIN] {
        assert_eq!(divide(numerator, 0).fault(), Some(Fault::DivisionByZero));
        assert_eq!(
            divide(numerator, 0).to_string(),
            "Error: Division by zero is not allowed."
        );
    }
}

#[test]
fn indexes_the_sample_array() {
    for (index, value) in SAMPLE.iter().enumerate() {
        assert_eq!(
            element_at(index as i32).to_string(),
            format!("Value at index {index}: {value}")
        );
    }
    assert_eq!(element_at(2).to_string(), "Value at index 2: 30");
}

#[test]
fn out_of_range_indices_fault() {
    for index in [-1, 5, 100, i32::MIN, i32::MAX] {
        assert_eq!(
            element_at(index).to_string(),
            "Error: Index out of range. Try again."
        );
    }
}

#[test]
fn parses_numbers_or_faults() {
    assert_eq!(parse_number("42").to_string(), "Parsed number: 42");
    assert_eq!(parse_number("-8").to_string(), "Parsed number: -8");
    for input in ["abc", "4.2", "99999999999", "12abc"] {
        assert_eq!(
            parse_number(input).to_string(),
            "Error: Invalid number format. Enter digits only."
        );
    }
}

#[test]
fn measures_present_strings_and_faults_on_absent() {
    assert_eq!(measure(Some("hello")).to_string(), "String length: 5");
    assert_eq!(measure(Some("NULL")).to_string(), "String length: 4");
    assert_eq!(measure(Some("\u{1F980}")).to_string(), "String length: 2");
    assert_eq!(
        measure(None).to_string(),
        "Error: You tried to access a null object."
    );
}

#[test]
fn cast_always_fails() {
    assert_eq!(invalid_cast().fault(), Some(Fault::InvalidCast));
}

#[test]
fn reads_first_line_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("notes.txt");
    fs::write(&path, "first line\r\nsecond line\n").expect("write");
    assert_eq!(read_first_line(&path).to_string(), "File content: first line");
}

#[test]
fn empty_file_has_no_first_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").expect("write");
    assert_eq!(read_first_line(&path).to_string(), "File content: null");

    let blank = dir.path().join("blank.txt");
    fs::write(&blank, "\nsecond\n").expect("write");
    assert_eq!(read_first_line(&blank).to_string(), "File content: ");
}

#[test]
fn bare_carriage_return_ends_the_first_line() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("classic-mac.txt");
    fs::write(&path, "first\rsecond").expect("write");
    assert_eq!(read_first_line(&path).to_string(), "File content: first");
}

#[test]
fn undecodable_bytes_are_replaced_not_faulted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("latin1.txt");
    fs::write(&path, [b'o', b'k', 0xff, b'\n']).expect("write");
    assert_eq!(read_first_line(&path).to_string(), "File content: ok\u{FFFD}");
}

#[test]
fn unreadable_paths_fault() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.txt");
    assert_eq!(read_first_line(&missing).fault(), Some(Fault::Unreadable));
    assert_eq!(read_first_line(dir.path()).fault(), Some(Fault::Unreadable));
}

#[test]
fn opens_existing_file_and_rejects_missing_or_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let present = dir.path().join("present.txt");
    fs::write(&present, "x").expect("write");

    assert_eq!(open_for_reading(&present).to_string(), "File opened successfully.");
    assert_eq!(
        open_for_reading(&dir.path().join("absent.txt")).to_string(),
        "Error: The specified file does not exist. Try again."
    );
    assert_eq!(open_for_reading(dir.path()).fault(), Some(Fault::FileMissing));
}

#[test]
fn prints_each_record_then_reaches_end_of_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("records.bin");
    write_records(&path, &["alpha", "beta"]);

    let mut console = console("");
    let outcome = print_records(&path, &mut console).expect("console");
    assert_eq!(outcome.fault(), Some(Fault::EndOfStream));
    assert_eq!(written(&console), "alpha\nbeta\n");
}

#[test]
fn plain_text_file_ends_inside_a_record() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plain.txt");
    fs::write(&path, "hello").expect("write");

    let mut console = console("");
    let outcome = print_records(&path, &mut console).expect("console");
    assert_eq!(outcome.to_string(), "Reached the end of the file.");
    assert_eq!(written(&console), "");
}

#[test]
fn missing_or_malformed_record_file_is_unreadable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut console = console("");
    let outcome = print_records(&dir.path().join("absent.bin"), &mut console).expect("console");
    assert_eq!(
        outcome.to_string(),
        "Error: Unable to read the file. Try again."
    );

    let malformed = dir.path().join("malformed.bin");
    fs::write(&malformed, [0x00, 0x01, 0xFF]).expect("write");
    let outcome = print_records(&malformed, &mut console).expect("console");
    assert_eq!(outcome.fault(), Some(Fault::StreamUnreadable));
}

#[test]
fn database_demo_passes_prompted_credentials_to_probe() {
    let runtime = runtime();
    let probe = Arc::new(RecordingProbe {
        accept: true,
        ..Default::default()
    });
    let demos = Demonstrations::new(runtime.handle().clone(), probe.clone(), Interrupt::new());

    let mut console = console("sqlite::memory: alice s3cret\n");
    let outcome = demos.run(FaultCategory::Sql, &mut console).expect("console");

    assert_eq!(outcome.to_string(), "Connected to the database successfully.");
    assert_eq!(
        written(&console),
        "Enter database URL: Enter username: Enter password: "
    );
    assert_eq!(
        probe.seen.lock().expect("seen lock").as_slice(),
        &[ConnectRequest::new("sqlite::memory:", "alice", "s3cret")]
    );
}

#[test]
fn database_demo_reports_rejected_connection() {
    let runtime = runtime();
    let demos = Demonstrations::new(
        runtime.handle().clone(),
        Arc::new(RecordingProbe::default()),
        Interrupt::new(),
    );

    let mut console = console("postgres://localhost/app bob wrong\n");
    let outcome = demos.run(FaultCategory::Sql, &mut console).expect("console");

    assert_eq!(
        outcome.to_string(),
        "Error: Failed to connect to the database. Check your credentials."
    );
    match outcome {
        Outcome::Failure { detail, .. } => {
            assert!(detail.expect("detail").contains("authentication failed"))
        }
        Outcome::Success(_) => panic!("connection should have been rejected"),
    }
}

#[test]
fn loads_registered_types_only() {
    let runtime = runtime();
    let demos = Demonstrations::new(
        runtime.handle().clone(),
        Arc::new(RecordingProbe::default()),
        Interrupt::new(),
    );

    assert_eq!(demos.load_type("String").to_string(), "Class loaded successfully.");
    assert_eq!(
        demos.load_type("java.lang.String").to_string(),
        "Class loaded successfully."
    );
    assert_eq!(
        demos.load_type("com.example.Missing").to_string(),
        "Error: Class not found. Check the name and try again."
    );
}

#[test]
fn sleep_rejects_negative_durations_without_pausing() {
    let runtime = runtime();
    let demos = Demonstrations::new(
        runtime.handle().clone(),
        Arc::new(RecordingProbe::default()),
        Interrupt::new(),
    );

    assert_eq!(
        demos.sleep(-1).to_string(),
        "Error: Negative sleep durations are not allowed."
    );
    assert_eq!(demos.sleep(0).to_string(), "Slept for 0 milliseconds.");
    assert_eq!(demos.sleep(15).to_string(), "Slept for 15 milliseconds.");
}

#[test]
fn sleep_reports_interruption() {
    let runtime = runtime();
    let interrupt = Interrupt::new();
    let demos = Demonstrations::new(
        runtime.handle().clone(),
        Arc::new(RecordingProbe::default()),
        interrupt.clone(),
    );

    let raiser = std::thread::spawn(move || {
        while !interrupt.raise() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    });

    assert_eq!(demos.sleep(60_000).to_string(), "Sleep was interrupted.");
    raiser.join().expect("raiser thread");
}

#[test]
fn arithmetic_demo_reprompts_for_each_operand() {
    let runtime = runtime();
    let demos = Demonstrations::new(
        runtime.handle().clone(),
        Arc::new(RecordingProbe::default()),
        Interrupt::new(),
    );

    let mut console = console("seven 7\nx 2\n");
    let outcome = demos
        .run(FaultCategory::Arithmetic, &mut console)
        .expect("console");

    assert_eq!(outcome.to_string(), "Result: 3");
    assert_eq!(
        written(&console),
        "Enter numerator: Invalid input. Enter a valid number.\nEnter numerator: \
         Enter denominator: Invalid input. Enter a valid number.\nEnter denominator: "
    );
}

#[test]
fn cast_demo_reads_no_input() {
    let runtime = runtime();
    let demos = Demonstrations::new(
        runtime.handle().clone(),
        Arc::new(RecordingProbe::default()),
        Interrupt::new(),
    );

    let mut console = console("");
    let outcome = demos
        .run(FaultCategory::ClassCast, &mut console)
        .expect("no input needed");
    assert_eq!(
        outcome.to_string(),
        "Error: You cannot cast that object to the desired type."
    );
    assert_eq!(written(&console), "Attempting an invalid cast...\n");
}
