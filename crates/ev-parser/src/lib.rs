mod arguments;
mod document;
mod scanner;

pub use arguments::{
    classify_argument, opens_quote, split_arguments, top_level_comma_offsets, COMPARATORS,
};
pub use document::{
    analyze, is_comparator_command, label_argument_index, COMPARATOR_ARGUMENT_INDEX,
    LABEL_ARGUMENT_INDEX,
};
pub use scanner::{
    command_regex, find_matching_paren, scan_line, LineClass, ScannedCommand, ScannedLabel,
    ScannedLine,
};
