//! Terminal output helpers shared by the binary's commands

use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Environment variable that disables paging when set
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// Whether long listings should go through the pager
///
/// Paging needs an interactive stdout and no `NO_PAGER` override.
pub fn pager_enabled() -> bool {
    std::env::var_os(NO_PAGER_ENV).is_none() && io::stdout().is_terminal()
}

/// Wrapper that implements `Write` for the minus pager
///
/// ## Usage
///
/// ```ignore
/// let pager = Pager::new();
/// let mut writer = PagerWriter::new(pager.clone());
/// writeln!(writer, "Some long output...")?;
/// page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(s).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
