use std::io::{self, Write};

/// Time an arbitrary operation.
pub fn timeit<T>(run: impl FnOnce() -> T) -> (T, std::time::Duration) {
    let start = std::time::Instant::now();
    let t = run();
    (t, start.elapsed())
}

/// Convenient time an operation that returns a result by packing the duration
/// into the `Ok` variant.
pub fn timeitr<T, E>(
    run: impl FnOnce() -> Result<T, E>,
) -> Result<(T, std::time::Duration), E> {
    let (result, time) = timeit(run);
    let t = result?;
    Ok((t, time))
}

/// An aligned table of key-value pairs. Keys can be any string and values
/// can be anything that implements Debug.
///
/// This is used to print the properties of a search next to its results,
/// e.g., how long it took to compile the pattern.
#[derive(Debug)]
pub struct Table {
    pairs: Vec<(String, Box<dyn std::fmt::Debug>)>,
}

impl Table {
    pub fn empty() -> Table {
        Table { pairs: vec![] }
    }

    pub fn add<D: std::fmt::Debug + 'static>(
        &mut self,
        label: &str,
        value: D,
    ) {
        self.pairs.push((label.to_string(), Box::new(value)));
    }

    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = tabwriter::TabWriter::new(wtr)
            .alignment(tabwriter::Alignment::Right);
        for (label, value) in self.pairs.iter() {
            writeln!(wtr, "{label}:\t{value:?}")?;
        }
        wtr.flush()
    }
}

/// A table with a header row and any number of rows of columns, all right
/// aligned.
///
/// Unlike `Table`, every cell is already formatted.
#[derive(Debug)]
pub struct Grid {
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(header: &[&'static str]) -> Grid {
        Grid { header: header.to_vec(), rows: vec![] }
    }

    pub fn add(&mut self, row: Vec<String>) {
        debug_assert_eq!(self.header.len(), row.len());
        self.rows.push(row);
    }

    pub fn print<W: io::Write>(&self, wtr: W) -> io::Result<()> {
        let mut wtr = tabwriter::TabWriter::new(wtr)
            .minwidth(2)
            .padding(2)
            .alignment(tabwriter::Alignment::Right);
        writeln!(wtr, "{}\t", self.header.join("\t"))?;
        for row in self.rows.iter() {
            writeln!(wtr, "{}\t", row.join("\t"))?;
        }
        wtr.flush()
    }
}
