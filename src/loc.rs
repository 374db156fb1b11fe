use std::fmt;

#[repr(transparent)]
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Loc(pub usize);

impl fmt::Display for Loc {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[macro_export]
macro_rules! report {
    ($($arg:tt)*) => {
        eprintln!("{prog}: {msg}", prog = $crate::consts::PROGRAM, msg = std::fmt::format(format_args!($($arg)*)))
    };
}
