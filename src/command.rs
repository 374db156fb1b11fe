use std::env;
use std::ptr;
use std::ffi::CString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStringExt;

pub trait Executor {
    /// Runs `command` on behalf of `target` and returns its exit status.
    fn execute(&mut self, target: &str, command: &str) -> io::Result::<i32>;
}

#[derive(Copy, Clone, Default, Debug)]
pub struct Echo {
    pub quiet: bool,
    pub verbose: bool,
}

impl Echo {
    #[inline]
    fn print(&self, target: &str, command: &str) -> io::Result::<()> {
        if self.quiet { return Ok(()) }

        let mut stdout = io::stdout().lock();
        if self.verbose {
            writeln!(stdout, "[{target}] {command}")?
        } else {
            writeln!(stdout, "{command}")?
        }
        stdout.flush()
    }
}

/// Spawns every command through `/bin/sh -c`, one at a time.
#[derive(Default, Debug)]
pub struct ShellExecutor {
    echo: Echo,
    env: Vec::<CString>,
}

impl ShellExecutor {
    pub fn new(echo: Echo) -> Self {
        let env = env::vars_os().filter_map(|(k, v)| {
            let mut kv = k.into_vec();
            kv.push(b'=');
            kv.extend(v.into_vec());
            CString::new(kv).ok()
        }).collect();

        Self { echo, env }
    }

    fn spawn(&self, command: &str) -> io::Result::<libc::pid_t> {
        let cmd = CString::new(command.as_bytes())?;
        let args = [
            c"/bin/sh".as_ptr(),
            c"-c".as_ptr(),
            cmd.as_ptr(),
            ptr::null(),
        ];

        let mut envp = self.env.iter().map(|kv| kv.as_ptr()).collect::<Vec::<_>>();
        envp.push(ptr::null());

        let mut pid = 0;
        let ret = unsafe {
            libc::posix_spawn(
                &mut pid,
                c"/bin/sh".as_ptr(),
                ptr::null(),
                ptr::null(),
                args.as_ptr() as *const *mut _,
                envp.as_ptr() as *const *mut _,
            )
        };

        if ret != 0 {
            return Err(io::Error::from_raw_os_error(ret))
        } Ok(pid)
    }

    fn wait(pid: libc::pid_t) -> io::Result::<i32> {
        let mut status = 0;
        loop {
            if unsafe { libc::waitpid(pid, &mut status, 0) } != -1 { break }
            let e = io::Error::last_os_error();
            if e.kind() != io::ErrorKind::Interrupted { return Err(e) }
        }

        if libc::WIFEXITED(status) {
            Ok(libc::WEXITSTATUS(status))
        } else if libc::WIFSIGNALED(status) {
            Ok(128 + libc::WTERMSIG(status))
        } else {
            Ok(1)
        }
    }
}

impl Executor for ShellExecutor {
    fn execute(&mut self, target: &str, command: &str) -> io::Result::<i32> {
        self.echo.print(target, command)?;
        let pid = self.spawn(command)?;
        Self::wait(pid)
    }
}

/// Prints commands without running them.
#[derive(Default, Debug)]
pub struct PrintExecutor {
    echo: Echo,
}

impl PrintExecutor {
    #[inline(always)]
    pub fn new(verbose: bool) -> Self {
        Self { echo: Echo { quiet: false, verbose } }
    }
}

impl Executor for PrintExecutor {
    #[inline]
    fn execute(&mut self, target: &str, command: &str) -> io::Result::<i32> {
        self.echo.print(target, command).map(|_| 0)
    }
}
