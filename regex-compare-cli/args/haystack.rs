use std::path::PathBuf;

use {
    anyhow::Context,
    bstr::{BString, ByteSlice, ByteVec},
    lexopt::{Arg, Parser, ValueExt},
};

use crate::args::{Configurable, Usage};

/// A configuration object for reading a single haystack from the command line.
///
/// This supports reading either an inline haystack specified via the
/// `-y/--haystack` flag, or via a positional argument pointing to a file path.
///
/// This supports reading exactly one haystack. If more than one are provided,
/// then an error is returned at configuration time. If none are provided, then
/// an error is returned when one attempts to retrieve the haystack.
#[derive(Debug, Default)]
pub struct Config {
    kind: Option<Kind>,
}

impl Config {
    /// If the haystack is a file, then memory map and pass the contents of the
    /// file to the given closure. Otherwise, if it's an inline literal, then
    /// pass it to the closure as-is.
    ///
    /// Every engine compared here searches `&str` haystacks, so an error is
    /// returned if the haystack is not valid UTF-8.
    pub fn with<T>(
        &self,
        mut f: impl FnMut(&str) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        match self.kind {
            Some(Kind::Inline(ref haystack)) => {
                f(haystack.to_str().context("haystack must be valid UTF-8")?)
            }
            Some(Kind::Path(ref path)) => {
                let file = std::fs::File::open(path).with_context(|| {
                    format!("failed to open {}", path.display())
                })?;
                // SAFETY: We assume this is OK to do since we assume that our
                // search input is immutable. We specifically never try to
                // mutate the bytes from the file or treat them as anything
                // other than a slice of bytes.
                let mmap = unsafe {
                    memmap2::Mmap::map(&file).with_context(|| {
                        format!("failed to mmap {}", path.display())
                    })?
                };
                let haystack = mmap.to_str().with_context(|| {
                    format!("{} is not valid UTF-8", path.display())
                })?;
                f(haystack)
            }
            None => anyhow::bail!(
                "haystack is required via the -y/--haystack flag \
                 or via a positional argument",
            ),
        }
    }
}

impl Configurable for Config {
    fn configure(
        &mut self,
        p: &mut Parser,
        arg: &mut Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            Arg::Short('y') | Arg::Long("haystack") => {
                anyhow::ensure!(
                    self.kind.is_none(),
                    "only one haystack is allowed",
                );
                let hay = p.value().context("-y/--haystack needs a value")?;
                let hay = hay
                    .string()
                    .context("-y/--haystack must be valid UTF-8")?;
                let hay = Vec::unescape_bytes(&hay);
                self.kind = Some(Kind::Inline(BString::from(hay)));
            }
            Arg::Value(ref mut v) => {
                anyhow::ensure!(
                    self.kind.is_none(),
                    "only one haystack is allowed",
                );
                let path = PathBuf::from(std::mem::take(v));
                self.kind = Some(Kind::Path(path));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const USAGES: &'static [Usage] = &[Usage::new(
            "-y, --haystack <haystack>",
            "Provide an inline haystack on the command line.",
            r#"
This flag provides an inline haystack on the command line. That is, the value
of this flag is *not* a file path, but the haystack contents itself. This is
convenient for small regex searches because it lets one skip creating a file or
other shenanigans.

The haystack supports escape sequences. So for example, "-y 'a\tb'" searches
the string 'a', a tab and then 'b'. After unescaping, the haystack must still
be valid UTF-8.

Note that exactly one haystack is permitted. The haystack can either be
specified inline with this flag, or can be provided as a file path via a
positional argument.
"#,
        )];
        USAGES
    }
}

/// The kind of haystack specified on the command line.
///
/// We don't read the file path contents at arg parsing time so that the
/// file can be memory mapped for the duration of the search.
#[derive(Debug)]
enum Kind {
    Inline(BString),
    Path(PathBuf),
}
