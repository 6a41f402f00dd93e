//! Slateboard command-line driver.
//!
//! ```text
//! slateboard replay <board.json> <script.json> [--config <editor.json>] [--out <board.json>] [--store <dir>]
//! slateboard check <board.json>
//! slateboard list <dir>
//! ```

mod script;

use slateboard_core::storage::FileStorage;
use slateboard_core::{Document, Editor, EditorConfig, Storage, StorageError, ZOrderViolation, check_z_order};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

const USAGE: &str = "usage:
  slateboard replay <board.json> <script.json> [--config <editor.json>] [--out <board.json>] [--store <dir>]
  slateboard check <board.json>
  slateboard list <dir>";

#[derive(Debug, Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Usage(String),
    #[error("z-order check failed: {0}")]
    ZOrder(#[from] ZOrderViolation),
    #[error(transparent)]
    Script(#[from] script::ScriptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, PartialEq)]
enum Command {
    Replay {
        board: PathBuf,
        script: PathBuf,
        config: Option<PathBuf>,
        out: Option<PathBuf>,
        store: Option<PathBuf>,
    },
    Check {
        board: PathBuf,
    },
    List {
        dir: PathBuf,
    },
}

fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let usage = |msg: &str| CliError::Usage(format!("{}\n{}", msg, USAGE));
    let (name, rest) = args.split_first().ok_or_else(|| usage("missing command"))?;

    match name.as_str() {
        "replay" => {
            let mut positional = Vec::new();
            let mut config = None;
            let mut out = None;
            let mut store = None;
            let mut iter = rest.iter();
            while let Some(arg) = iter.next() {
                let slot = match arg.as_str() {
                    "--config" => &mut config,
                    "--out" => &mut out,
                    "--store" => &mut store,
                    flag if flag.starts_with("--") => return Err(usage(&format!("unknown flag {}", flag))),
                    _ => {
                        positional.push(PathBuf::from(arg));
                        continue;
                    }
                };
                let value = iter.next().ok_or_else(|| usage(&format!("{} needs a value", arg)))?;
                *slot = Some(PathBuf::from(value));
            }
            match <[PathBuf; 2]>::try_from(positional) {
                Ok([board, script]) => Ok(Command::Replay {
                    board,
                    script,
                    config,
                    out,
                    store,
                }),
                Err(_) => Err(usage("replay takes a board and a script")),
            }
        }
        "check" => match rest {
            [board] => Ok(Command::Check {
                board: PathBuf::from(board),
            }),
            _ => Err(usage("check takes one board")),
        },
        "list" => match rest {
            [dir] => Ok(Command::List { dir: PathBuf::from(dir) }),
            _ => Err(usage("list takes one directory")),
        },
        other => Err(usage(&format!("unknown command {}", other))),
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> CliError + '_ {
    move |source| CliError::Json {
        path: path.to_path_buf(),
        source,
    }
}

fn load_board(path: &Path) -> Result<Document, CliError> {
    Document::from_json(&read(path)?).map_err(json_error(path))
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Replay {
            board,
            script,
            config,
            out,
            store,
        } => {
            let document = load_board(&board)?;
            let config = match config {
                Some(path) => EditorConfig::from_json(&read(&path)?).map_err(json_error(&path))?,
                None => EditorConfig::default(),
            };
            let steps = script::parse(&read(&script)?).map_err(json_error(&script))?;
            log::info!("replaying {} steps against {}", steps.len(), board.display());

            let mut editor = Editor::new(document, config);
            let report = script::replay(&mut editor, &steps)?;
            println!("{}", report);
            check_z_order(editor.shapes())?;

            let result = editor.document();
            if let Some(path) = out {
                let json = result.to_json().map_err(json_error(&path))?;
                std::fs::write(&path, json).map_err(|source| CliError::Io { path, source })?;
            }
            if let Some(dir) = store {
                let storage = FileStorage::open(dir)?;
                pollster::block_on(storage.save(&result.id, result))?;
            }
            Ok(())
        }
        Command::Check { board } => {
            let document = load_board(&board)?;
            check_z_order(document.shapes())?;
            println!("{}: {} shapes, z-order ok", board.display(), document.len());
            Ok(())
        }
        Command::List { dir } => {
            let storage = FileStorage::open(dir)?;
            for id in pollster::block_on(storage.list())? {
                let document = pollster::block_on(storage.load(&id))?;
                println!("{}\t{}\t{} shapes", id, document.name, document.len());
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
