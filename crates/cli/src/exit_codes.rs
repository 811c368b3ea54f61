//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | Reserved (general error, unused)         |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | input/output     | Input text, output, settings file        |
//! | 10-19   | edit             | Terminal editor                          |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

// 1 is reserved; every handled failure has its own code.

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input and output (3-9)
// =============================================================================

/// Input file or stdin could not be read.
pub const EXIT_IO: u8 = 3;

/// Input is not valid UTF-8.
pub const EXIT_ENCODING: u8 = 4;

/// Output could not be written or serialized.
pub const EXIT_OUTPUT: u8 = 5;

/// Settings file could not be written.
pub const EXIT_CONFIG: u8 = 6;

// =============================================================================
// Edit (10-19)
// =============================================================================

/// Terminal could not be set up (not a TTY, raw mode refused).
pub const EXIT_EDIT_TERMINAL: u8 = 10;
