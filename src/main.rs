use std::io::{self, BufRead, Write};
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use gauss_steps::elimination::{reduce, AugmentedMatrix, Reduction, SystemShape};
use gauss_steps::input::{cell_prompt, parse_number, resolve_shape};
use gauss_steps::log_pager::{LogPager, DEFAULT_PAGE_SIZE};
use gauss_steps::step_recorder::{StepRecorder, DEFAULT_CAPACITY, MAX_CAPACITY};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of equations (2 or 3)
    #[arg(short, long, default_value_t = 2)]
    pub rows: usize,
    /// Columns of [A | b] (3 or 4)
    #[arg(short, long, default_value_t = 3)]
    pub cols: usize,
    /// Cells of [A | b] in row order, decimals or fractions like -3/4.
    /// Prompted for on stdin when left out.
    #[arg(allow_hyphen_values = true)]
    pub cells: Vec<String>,
    #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// Trace lines kept before further steps are dropped
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,
    /// Print the whole trace at once instead of paging through it
    #[arg(long)]
    pub no_pager: bool,
}

fn matrix_from_cells(shape: SystemShape, cells: &[String]) -> Result<AugmentedMatrix> {
    let expected = shape.rows() * shape.cols();
    if cells.len() != expected {
        bail!(
            "a {}x{} system needs {expected} cells, got {}",
            shape.rows(),
            shape.cols(),
            cells.len()
        );
    }
    let mut matrix = AugmentedMatrix::zeroes(shape);
    for (idx, cell) in cells.iter().enumerate() {
        let (r, c) = (idx / shape.cols(), idx % shape.cols());
        let value = parse_number(cell).with_context(|| format!("reading cell {}", idx + 1))?;
        matrix.set(r, c, value);
    }
    Ok(matrix)
}

fn checked_capacity(capacity: usize) -> Result<usize> {
    if capacity == 0 || capacity > MAX_CAPACITY {
        bail!("--capacity must be between 1 and {MAX_CAPACITY}, got {capacity}");
    }
    Ok(capacity)
}

fn prompt_matrix(shape: SystemShape, input: &mut impl BufRead) -> Result<AugmentedMatrix> {
    let mut matrix = AugmentedMatrix::zeroes(shape);
    for r in 0..shape.rows() {
        for c in 0..shape.cols() {
            let value = loop {
                print!("{}", cell_prompt(shape, r, c));
                io::stdout().flush().context("flushing prompt")?;
                let mut line = String::new();
                if input.read_line(&mut line).context("reading stdin")? == 0 {
                    bail!("stdin closed before the matrix was complete");
                }
                match parse_number(line.trim_end_matches(['\r', '\n'])) {
                    Ok(value) => break value,
                    Err(err) => println!("Invalid number. {err}"),
                }
            };
            matrix.set(r, c, value);
        }
    }
    Ok(matrix)
}

fn print_page(recorder: &StepRecorder, pager: &LogPager) {
    println!("Gauss-Jordan Steps");
    for line in &recorder.lines()[pager.visible()] {
        println!("{line}");
    }
    println!("{}", pager.footer());
}

// enter/n: next page, b: previous page, j/k: one line, q: quit
fn page_through(
    recorder: &StepRecorder,
    page_size: usize,
    input: &mut impl BufRead,
) -> Result<()> {
    let mut pager = LogPager::new(recorder.count(), page_size);
    loop {
        print_page(recorder, &pager);
        print!("[n]ext [b]ack [j]down [k]up [q]uit: ");
        io::stdout().flush().context("flushing pager prompt")?;
        let mut command = String::new();
        if input.read_line(&mut command).context("reading pager command")? == 0 {
            return Ok(());
        }
        match command.trim() {
            "" | "n" => {
                if pager.is_at_end() {
                    return Ok(());
                }
                pager.page_down()
            }
            "b" => pager.page_up(),
            "j" => pager.line_down(),
            "k" => pager.line_up(),
            "q" => return Ok(()),
            other => log::debug!("ignoring pager command {other:?}"),
        }
    }
}

fn run_solver(args: Args) -> Result<()> {
    let capacity = checked_capacity(args.capacity)?;
    let shape = resolve_shape(args.rows, args.cols);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut matrix = if args.cells.is_empty() {
        prompt_matrix(shape, &mut input).context("collecting the matrix")?
    } else {
        matrix_from_cells(shape, &args.cells).context("parsing matrix cells")?
    };

    let mut recorder = StepRecorder::with_capacity(capacity);
    match reduce(&mut matrix, &mut recorder) {
        Reduction::Solved(x) => log::info!("solved, x = {x:?}"),
        Reduction::Singular { column } => log::info!("singular in column {}", column + 1),
        Reduction::PivotVanished { column } => {
            log::info!("pivot vanished in column {}", column + 1)
        }
    }
    if recorder.dropped() > 0 {
        log::warn!(
            "trace truncated at {} lines, {} dropped",
            recorder.capacity(),
            recorder.dropped()
        );
    }

    if args.no_pager {
        for line in recorder.lines() {
            println!("{line}");
        }
        return Ok(());
    }
    page_through(&recorder, args.page_size, &mut input)
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    log::debug!("Running with: {args:?}");
    if let Err(err) = run_solver(args) {
        eprintln!("ran into solver error: {err:?}");
        process::exit(1)
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;

    use super::*;

    fn recorder_with_lines(n: usize) -> StepRecorder {
        let mut recorder = StepRecorder::new();
        for i in 0..n {
            recorder.append(&format!("line {i}"));
        }
        recorder
    }

    #[test]
    fn cells_fill_rows_in_order() {
        let cells = ["2", "1", "5", "1", "-1", "1"].map(String::from);
        let m = matrix_from_cells(SystemShape::TwoByThree, &cells).unwrap();
        assert_eq!(m.rows().collect_vec(), vec![[2.0, 1.0, 5.0], [1.0, -1.0, 1.0]]);
    }

    #[test]
    fn wrong_cell_count_is_an_error() {
        let cells = ["1", "2"].map(String::from);
        assert!(matrix_from_cells(SystemShape::TwoByThree, &cells).is_err());
    }

    #[test]
    fn prompting_retries_invalid_numbers() {
        let mut input = io::Cursor::new("1\nnope\n1/2\n3\n4\n5/0\n5\n6\n");
        let m = prompt_matrix(SystemShape::TwoByThree, &mut input).unwrap();
        assert_eq!(m.rows().collect_vec(), vec![[1.0, 0.5, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn prompting_fails_on_closed_stdin() {
        let mut input = io::Cursor::new("1\n2\n");
        assert!(prompt_matrix(SystemShape::TwoByThree, &mut input).is_err());
    }

    #[test]
    fn capacity_must_be_bounded() {
        assert_eq!(checked_capacity(280).unwrap(), 280);
        assert_eq!(checked_capacity(MAX_CAPACITY).unwrap(), MAX_CAPACITY);
        assert!(checked_capacity(0).is_err());
        assert!(checked_capacity(MAX_CAPACITY + 1).is_err());
        assert!(checked_capacity(usize::MAX).is_err());
    }

    #[test]
    fn oversized_capacity_flag_is_rejected_before_solving() {
        let args = Args::try_parse_from([
            "gauss_steps",
            "--capacity",
            "18446744073709551615",
            "--no-pager",
            "2",
            "1",
            "5",
            "1",
            "-1",
            "1",
        ])
        .unwrap();
        assert!(run_solver(args).is_err());
    }

    #[test]
    fn pager_quits_on_q() {
        let recorder = recorder_with_lines(40);
        let mut input = io::Cursor::new("j\nb\nq\nn\n");
        page_through(&recorder, 27, &mut input).unwrap();
        // the trailing "n" is never read
        assert_eq!(input.position(), 6);
    }

    #[test]
    fn next_on_the_last_page_exits() {
        let recorder = recorder_with_lines(40);
        let mut input = io::Cursor::new("n\nn\nq\n");
        page_through(&recorder, 27, &mut input).unwrap();
        assert_eq!(input.position(), 4);
    }

    #[test]
    fn pager_stops_at_end_of_input() {
        let recorder = recorder_with_lines(40);
        let mut input = io::Cursor::new("k\nx\n");
        page_through(&recorder, 27, &mut input).unwrap();
        assert_eq!(input.position(), 4);
    }
}
