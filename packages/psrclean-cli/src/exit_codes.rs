pub const SUCCESS: i32 = 0;
pub const EXECUTION_ERROR: i32 = 1;
/// Missing, unreadable or malformed input, or bad parameters
pub const INPUT_ERROR: i32 = 2;
/// Some files in a batch failed
pub const PARTIAL_FAILURE: i32 = 3;
