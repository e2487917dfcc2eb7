// SPDX-License-Identifier: MPL-2.0
use cloud_lens::config::{self, Config};
use cloud_lens::domain::{CellValue, ShapeKind};
use cloud_lens::export::{save_composite, ExportOptions};
use cloud_lens::{logging, paths, Error, GenerateRequest, Session, Table};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "\
Usage: cloud_lens <FILE> [OPTIONS]

Options:
  --sheet NAME            Sheet to load (default: first sheet)
  --column NAME           Text column to count (default: first column)
  --shape KIND            square, rectangle or circle
  --width N               Canvas width
  --height N              Canvas height
  --radius N              Circle radius
  --color NAME            Color scheme (viridis, plasma, tab10, ...)
  --seed N                Layout seed
  --font PATH             CJK-capable font file
  --exclude COLUMN=VALUE  Exclude rows with this value (repeatable)
  --out PATH              Output image, .png/.jpg/.jpeg (default: wordcloud.png)
  --list-sheets           Print sheet names and exit
  --list-values COLUMN    Print the filter menu of a column and exit
  --config-dir DIR        Directory holding settings.toml
  -v, --verbose           Debug logging
  -h, --help              Print this help
";

const DEFAULT_OUTPUT: &str = "wordcloud.png";

struct Flags {
    file: PathBuf,
    sheet: Option<String>,
    column: Option<String>,
    shape: Option<ShapeKind>,
    width: Option<u32>,
    height: Option<u32>,
    radius: Option<u32>,
    color: Option<String>,
    seed: Option<u64>,
    font: Option<PathBuf>,
    excludes: Vec<(String, String)>,
    out: PathBuf,
    list_sheets: bool,
    list_values: Option<String>,
    config_dir: Option<String>,
    verbose: bool,
}

fn parse_exclude(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{}'", raw))
}

fn parse_flags(mut args: pico_args::Arguments) -> Result<Option<Flags>, pico_args::Error> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let flags = Flags {
        verbose: args.contains(["-v", "--verbose"]),
        list_sheets: args.contains("--list-sheets"),
        sheet: args.opt_value_from_str("--sheet")?,
        column: args.opt_value_from_str("--column")?,
        shape: args.opt_value_from_str("--shape")?,
        width: args.opt_value_from_str("--width")?,
        height: args.opt_value_from_str("--height")?,
        radius: args.opt_value_from_str("--radius")?,
        color: args.opt_value_from_str("--color")?,
        seed: args.opt_value_from_str("--seed")?,
        font: args.opt_value_from_str("--font")?,
        excludes: args.values_from_fn("--exclude", parse_exclude)?,
        out: args
            .opt_value_from_str("--out")?
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        list_values: args.opt_value_from_str("--list-values")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        file: args.free_from_str()?,
    };

    let leftover = args.finish();
    if !leftover.is_empty() {
        let unknown: Vec<_> = leftover.iter().map(|arg| arg.to_string_lossy()).collect();
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {}", unknown.join(" ")),
        });
    }
    Ok(Some(flags))
}

/// Folds command-line overrides into the loaded settings.
fn apply_overrides(config: &mut Config, flags: &Flags) {
    let cloud = &mut config.cloud;
    if let Some(shape) = flags.shape {
        cloud.shape = shape;
    }
    cloud.width = flags.width.or(cloud.width);
    cloud.height = flags.height.or(cloud.height);
    cloud.radius = flags.radius.or(cloud.radius);
    cloud.seed = flags.seed.or(cloud.seed);
    if let Some(color) = &flags.color {
        cloud.color_scheme = Some(color.clone());
    }
    if let Some(font) = &flags.font {
        config.font.path = Some(font.clone());
    }
}

/// Finds the stored cell whose text matches `raw`, so `3` matches a numeric 3.
fn resolve_value(table: &Table, column: &str, raw: &str) -> CellValue {
    table
        .column_index(column)
        .and_then(|col| {
            table
                .column_values(col)
                .find(|value| value.as_text().as_deref() == Some(raw))
                .cloned()
        })
        .unwrap_or_else(|| CellValue::from(raw))
}

fn run(flags: &Flags) -> cloud_lens::Result<()> {
    let (mut config, warning) = config::load();
    if let Some(warning) = warning {
        tracing::warn!("{}", warning);
    }
    apply_overrides(&mut config, flags);

    let mut session = Session::from_config(&config);
    session.load(&flags.file)?;
    if let Some(sheet) = &flags.sheet {
        session.select_sheet(sheet)?;
    }

    if flags.list_sheets {
        for name in session.sheet_names() {
            println!("{}", name);
        }
        return Ok(());
    }

    if let Some(column) = &flags.list_values {
        for entry in session.filter_menu(column)? {
            let mark = if entry.included { 'x' } else { ' ' };
            println!("[{}] {}", mark, entry.label);
        }
        return Ok(());
    }

    for (column, raw) in &flags.excludes {
        let value = resolve_value(session.table(), column, raw);
        session.toggle_filter(column, &value)?;
    }

    let column = match &flags.column {
        Some(column) => column.clone(),
        None => session
            .columns()
            .first()
            .cloned()
            .ok_or_else(|| Error::InvalidColumn(String::new()))?,
    };

    let request = GenerateRequest::from_config(&column, &config)?;
    let artifact = session.generate(&request)?;

    let options = ExportOptions {
        jpeg_quality: config
            .export
            .jpeg_quality
            .unwrap_or(config::DEFAULT_JPEG_QUALITY),
        legend_top_words: config
            .export
            .legend_top_words
            .unwrap_or(config::LEGEND_TOP_WORDS),
    };
    save_composite(Some(&artifact), &flags.out, &options, session.glyphs())?;
    println!("{}", flags.out.display());
    Ok(())
}

fn main() -> ExitCode {
    let flags = match parse_flags(pico_args::Arguments::from_env()) {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{}\n\n{}", err, USAGE);
            return ExitCode::from(2);
        }
    };

    paths::init_cli_overrides(flags.config_dir.clone());
    logging::init(flags.verbose);

    match run(&flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
