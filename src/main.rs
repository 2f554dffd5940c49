// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

//! Notemap CLI entrypoint.
//!
//! Runs the interactive graph viewer over a notes JSON file, or over a
//! built-in demo knowledge base with `--demo`.

use std::error::Error;
use std::fs;

use notemap::model::{LinkKind, Note};
use notemap::optimize::PerformanceMode;
use notemap::store::PreferencesFolder;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <notes.json> [--prefs <dir>] [--mode <kind>] [--performance <mode>]\n  {program} --demo [--mode <kind>] [--performance <mode>]\n\n<notes.json> is a JSON array of notes (id, title, body, tags, createdAt, updatedAt).\n--demo uses a built-in demo knowledge base and cannot be combined with a notes file.\n\n--prefs selects the folder holding notemap-preferences.json (default: current directory;\ndemo runs do not persist preferences).\n--mode picks the link strategy: internal, tag, similarity or hierarchical.\n--performance picks the optimization bias: auto, quality or performance.\nFlags win over stored preferences for this run and are saved back on quit."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    notes_path: Option<String>,
    prefs_dir: Option<String>,
    mode: Option<LinkKind>,
    performance: Option<PerformanceMode>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--prefs" => {
                if options.prefs_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.prefs_dir = Some(dir);
            }
            "--mode" => {
                if options.mode.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.mode = Some(raw.parse().map_err(|_| ())?);
            }
            "--performance" => {
                if options.performance.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.performance = Some(parse_performance_mode(&raw)?);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.notes_path.is_some() {
                    return Err(());
                }
                options.notes_path = Some(arg);
            }
        }
    }

    if options.demo && options.notes_path.is_some() {
        return Err(());
    }
    if options.demo && options.prefs_dir.is_some() {
        return Err(());
    }
    if !options.demo && options.notes_path.is_none() {
        return Err(());
    }

    Ok(options)
}

fn parse_performance_mode(raw: &str) -> Result<PerformanceMode, ()> {
    match raw {
        "auto" => Ok(PerformanceMode::Auto),
        "quality" => Ok(PerformanceMode::Quality),
        "performance" => Ok(PerformanceMode::Performance),
        _ => Err(()),
    }
}

fn load_notes(path: &str) -> Result<Vec<Note>, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("cannot read notes file {path:?}: {err}"))?;
    let notes: Vec<Note> = serde_json::from_str(&text)
        .map_err(|err| format!("cannot parse notes file {path:?}: {err}"))?;
    Ok(notes)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "notemap".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let notes = if options.demo {
            notemap::model::fixtures::demo_notes()
        } else {
            let path = options.notes_path.as_deref().expect("notes path checked in parse");
            load_notes(path)?
        };

        let prefs_folder = if options.demo {
            None
        } else {
            let dir = options.prefs_dir.unwrap_or_else(|| ".".to_owned());
            Some(PreferencesFolder::new(dir))
        };

        let mut preferences = match &prefs_folder {
            Some(folder) => folder.load_or_default()?,
            None => notemap::store::Preferences::default(),
        };
        if let Some(mode) = options.mode {
            preferences.render_mode = mode;
        }
        if let Some(performance) = options.performance {
            preferences.performance_mode = performance;
        }

        notemap::tui::run_with_preferences(notes, preferences, prefs_folder)?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("notemap: {err}");
        std::process::exit(1);
    }
}
