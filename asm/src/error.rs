use color_print::cprintln;
use thiserror::Error;

/// Errors local to one source line. They are recorded in the listing and
/// counted; assembly carries on with the next line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unrecognized command.")]
    UnknownCommand(String),

    #[error("Not enough arguments.")]
    MissingArgument,

    #[error("Too many arguments.")]
    TooManyArguments,

    #[error("Bad argument ({0}).")]
    BadArgument(String),

    #[error("Unrecognized label.")]
    UndefinedLabel(String),

    #[error("String must be in quotes.")]
    UnquotedString,

    #[error("Program is too large.")]
    TooLarge,

    #[error("Duplicate label: `{0}`")]
    DuplicateLabel(String),
}

/// Failures reading the source or writing the assembled artifacts.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// Print error with the file location and the offending line
    pub fn print_diag(&self, file: &str, line_num: usize, line: &str) {
        cprintln!("<red,bold>error</>: {}", self);
        match self {
            Error::UnknownCommand(cmd) => cprintln!("     <blue>=</> command: `{}`", cmd),
            Error::UndefinedLabel(label) => cprintln!("     <blue>=</> label: `{}`", label),
            _ => {}
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line_num, line);
        cprintln!("      <blue>|</>");
    }
}
