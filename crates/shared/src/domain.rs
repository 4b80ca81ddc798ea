pub const MENU_TITLE: &str = "=== Exception Handling Menu ===";
pub const EXIT_LABEL: &str = "Cancel/Exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultCategory {
    Io,
    FileNotFound,
    EndOfFile,
    Sql,
    ClassNotFound,
    Arithmetic,
    NullPointer,
    IndexOutOfBounds,
    ClassCast,
    IllegalArgument,
    NumberFormat,
}

impl FaultCategory {
    /// Menu order. Position `i` is shown as option `i + 1`.
    pub const ALL: [FaultCategory; 11] = [
        FaultCategory::Io,
        FaultCategory::FileNotFound,
        FaultCategory::EndOfFile,
        FaultCategory::Sql,
        FaultCategory::ClassNotFound,
        FaultCategory::Arithmetic,
        FaultCategory::NullPointer,
        FaultCategory::IndexOutOfBounds,
        FaultCategory::ClassCast,
        FaultCategory::IllegalArgument,
        FaultCategory::NumberFormat,
    ];

    pub fn index(self) -> i32 {
        match self {
            FaultCategory::Io => 1,
            FaultCategory::FileNotFound => 2,
            FaultCategory::EndOfFile => 3,
            FaultCategory::Sql => 4,
            FaultCategory::ClassNotFound => 5,
            FaultCategory::Arithmetic => 6,
            FaultCategory::NullPointer => 7,
            FaultCategory::IndexOutOfBounds => 8,
            FaultCategory::ClassCast => 9,
            FaultCategory::IllegalArgument => 10,
            FaultCategory::NumberFormat => 11,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.index() == index)
    }

    pub fn label(self) -> &'static str {
        match self {
            FaultCategory::Io => "IOException",
            FaultCategory::FileNotFound => "FileNotFoundException",
            FaultCategory::EndOfFile => "EOFException",
            FaultCategory::Sql => "SQLException",
            FaultCategory::ClassNotFound => "ClassNotFoundException",
            FaultCategory::Arithmetic => "ArithmeticException",
            FaultCategory::NullPointer => "NullPointerException",
            FaultCategory::IndexOutOfBounds => "ArrayIndexOutOfBoundsException",
            FaultCategory::ClassCast => "ClassCastException",
            FaultCategory::IllegalArgument => "IllegalArgumentException",
            FaultCategory::NumberFormat => "NumberFormatException",
        }
    }
}

/// What a raw menu choice asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    Exit,
    Run(FaultCategory),
    OutOfRange(i32),
}

impl MenuSelection {
    pub fn from_choice(choice: i32) -> Self {
        if choice == 0 {
            return MenuSelection::Exit;
        }
        match FaultCategory::from_index(choice) {
            Some(category) => MenuSelection::Run(category),
            None => MenuSelection::OutOfRange(choice),
        }
    }
}

/// The menu body, one entry per line, exit option last.
pub fn menu_lines() -> Vec<String> {
    FaultCategory::ALL
        .iter()
        .map(|category| format!("{}. {}", category.index(), category.label()))
        .chain(std::iter::once(format!("0. {EXIT_LABEL}")))
        .collect()
}
