pub const PROGRAM: &str = "june";

pub const JUNE_FILE_PATH: &str = "jfile";

pub const MAX_DEPTH: usize = 100;

pub mod syntax {
    pub const COMMENT: char = '#';
    pub const LINE_COMMENT: &str = "//";

    pub const SIGIL: char = '$';
    pub const TARGET: &str = "$0";

    pub const ASSIGN: char = '=';
    pub const COLON: char = ':';

    pub const SUBFN_OPEN: char = '[';
    pub const SUBFN_CLOSE: char = ']';

    pub const FORWARD_ARROW: &str = "->";
    pub const BACKWARD_ARROW: &str = "<-";
}
