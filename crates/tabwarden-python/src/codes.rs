//! Diagnostic codes reported by the Python check.

use tabwarden_abi::Code;

pub const MIXED_INDENTATION: Code = Code::tabs_error(101);
pub const UNEXPECTED_INDENTATION: Code = Code::tabs_error(112);
pub const TOO_FEW_TABS: Code = Code::tabs_error(121);
pub const NOT_INDENTED: Code = Code::tabs_error(122);
pub const TOO_MANY_TABS: Code = Code::tabs_error(126);
pub const TOO_MANY_SPACES: Code = Code::tabs_error(127);
pub const TOO_FEW_SPACES: Code = Code::tabs_error(128);
pub const BLOCK_INDENT_STYLE: Code = Code::tabs_error(191);

pub const CONTINUATION_STYLE: Code = Code::tabs_warning(113);
pub const TRAILING_WHITESPACE: Code = Code::tabs_warning(291);
pub const BLANK_LINE_WHITESPACE: Code = Code::tabs_warning(293);

// pycodestyle-compatible codes
pub const MIXED_FILE_INDENTATION: Code = Code::error(101);
pub const INDENT_NOT_MULTIPLE: Code = Code::error(111);
pub const TOKENIZE_FAILED: Code = Code::error(902);
