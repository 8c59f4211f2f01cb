//! Interactive CSV picker.
//!
//! Used when the run names neither `--input` nor `--sample`: the user picks one
//! of the `*.csv` files found under the working directory, or types a path.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Directory recursion depth when looking for CSV files.
const SEARCH_DEPTH: usize = 4;

/// What a line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Listed(PathBuf),
    Typed(PathBuf),
    Quit,
    OutOfRange(usize),
}

/// Prompt on stdin/stdout for a CSV file under the current directory.
pub fn prompt_for_csv_path() -> Result<PathBuf, AppError> {
    let files = discover_csv_files(Path::new("."));
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Pass one with `--input <file.csv>` or use `--sample`.",
        ));
    }
    let stdin = io::stdin();
    prompt_with(&files, &mut stdin.lock(), &mut io::stdout())
}

/// Prompt loop over arbitrary input/output streams.
pub fn prompt_with<R: BufRead, W: Write>(files: &[PathBuf], input: &mut R, out: &mut W) -> Result<PathBuf, AppError> {
    let write_err = |e: io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));

    writeln!(out, "Found {} CSV file(s):", files.len()).map_err(write_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(write_err)?;
    }

    loop {
        write!(out, "Select a file by number (1-{}) or type a path (q to quit): ", files.len()).map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::new(2, "No input received. Pass a CSV with `--input <file.csv>`."));
        }

        let candidate = match resolve_choice(line.trim(), files) {
            Choice::Quit => return Err(AppError::new(2, "Canceled.")),
            Choice::OutOfRange(n) => {
                writeln!(out, "Invalid choice: {n}. Enter a number between 1 and {}.", files.len()).map_err(write_err)?;
                continue;
            }
            Choice::Listed(path) | Choice::Typed(path) => path,
        };

        match validate_csv_path(&candidate) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(write_err)?,
        }
    }
}

/// Interpret one trimmed input line against the listed files.
pub fn resolve_choice(input: &str, files: &[PathBuf]) -> Choice {
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=files.len()).contains(&n) => Choice::Listed(files[n - 1].clone()),
        Ok(n) => Choice::OutOfRange(n),
        Err(_) => Choice::Typed(PathBuf::from(input)),
    }
}

/// The path must be an existing file with a `.csv` extension.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.is_file() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}).", path.display()),
        ));
    }
    Ok(path.to_path_buf())
}

/// `*.csv` files under `root`, sorted by display path.
pub fn discover_csv_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn walk(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > SEARCH_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                walk(&path, depth + 1, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with('.') || matches!(name, "target" | "node_modules")
}

fn pretty_path(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}
