use crate::app::App;
use crate::config::{Config, load_config};
use crate::dump::write_layout_dump;
use crate::loader;
use crate::render::{render_svg, write_output_svg};
use crate::store::{FileStore, KvStore, ProgressStore};
use crate::theme::{ThemeChoice, set_theme_pref, theme_pref};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rmdr", version, about = "Roadmap diagram renderer and progress tracker")]
pub struct Args {
    /// Input roadmap definition (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Load the staged roadmap instead of reading a file
    #[arg(long = "local", conflicts_with = "input")]
    pub local: bool,

    /// Stage a roadmap definition for later --local runs, then exit
    #[arg(long = "stage", value_name = "FILE")]
    pub stage: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme for this run; also saved as the preference for future runs
    #[arg(long = "theme", value_enum)]
    pub theme: Option<ThemeArg>,

    /// Data directory for progress and preferences
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Toggle completion for a node before rendering (repeatable)
    #[arg(long = "toggle", value_name = "NODE_ID")]
    pub toggle: Vec<String>,

    /// Print the detail panel for a node
    #[arg(long = "show", value_name = "NODE_ID")]
    pub show: Option<String>,

    /// Print completion statistics
    #[arg(long = "stats")]
    pub stats: bool,

    /// Remove all recorded progress for this roadmap (requires --yes)
    #[arg(long = "clear-progress")]
    pub clear_progress: bool,

    /// Confirm destructive actions
    #[arg(long = "yes")]
    pub yes: bool,

    /// Write a JSON dump of the computed layout
    #[arg(long = "dump-layout", value_name = "FILE")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeChoice {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemeChoice::Light,
            ThemeArg::Dark => ThemeChoice::Dark,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;

    let data_dir = args
        .data_dir
        .clone()
        .or_else(FileStore::default_dir)
        .ok_or_else(|| anyhow::anyhow!("no data directory available; pass --data-dir"))?;
    let mut kv = FileStore::new(data_dir);

    if let Some(stage) = &args.stage {
        let raw = std::fs::read_to_string(stage)?;
        loader::stage_doc(&mut kv, &raw)?;
        return Ok(());
    }

    apply_theme(&mut config, args.theme, &mut kv)?;

    let (doc, roadmap_id) = if args.local {
        loader::load_staged(&kv)?
    } else if let Some(input) = &args.input {
        loader::load_doc(input)?
    } else {
        return Err(anyhow::anyhow!(
            "no input; pass --input <file> (or '-' for stdin), or --local"
        ));
    };

    let mut progress = ProgressStore::open(Box::new(kv));

    if args.clear_progress {
        if !args.yes {
            return Err(anyhow::anyhow!(
                "--clear-progress removes all progress for `{roadmap_id}`; re-run with --yes to confirm"
            ));
        }
        progress.clear(&roadmap_id)?;
    }

    let mut app = App::init(&doc, &roadmap_id, &progress, &config.layout)?;

    for node in &args.toggle {
        let done = app.toggle(&mut progress, node)?;
        eprintln!(
            "{node}: {}",
            if done { "completed" } else { "not completed" }
        );
    }

    if let Some(id) = &args.show {
        let view = app.open_panel(&progress, id)?;
        println!("{} ({})", view.title, view.id);
        println!("{}", if view.completed { "completed" } else { "not completed" });
        println!("{}", view.content_html);
    }

    if args.stats {
        let stats = app.stats(&progress);
        println!("{} / {} ({}%)", stats.completed, stats.total, stats.percent);
    }

    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &app.layout, &app.graph.edges, |id| {
            progress.is_done(&roadmap_id, id)
        })?;
    }

    // Write the diagram when asked for explicitly, or when this run did
    // nothing else (plain render to stdout).
    let acted = args.stats
        || args.show.is_some()
        || args.clear_progress
        || args.dump_layout.is_some()
        || !args.toggle.is_empty();
    if args.output.is_some() || !acted {
        let svg = render_svg(&app.scene, &config.theme, &config.render);
        match args.output_format {
            OutputFormat::Svg => {
                write_output_svg(&svg, args.output.as_deref())?;
            }
            OutputFormat::Png => {
                #[cfg(feature = "png")]
                {
                    let output = args
                        .output
                        .as_deref()
                        .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
                    crate::render::write_output_png(&svg, output)?;
                }
                #[cfg(not(feature = "png"))]
                {
                    return Err(anyhow::anyhow!(
                        "png output requires the `png` feature"
                    ));
                }
            }
        }
    }

    Ok(())
}

// Precedence: --theme beats the saved preference, which beats the config
// file's theme, which beats the built-in dark default. Only an explicit
// --theme writes the preference back.
fn apply_theme(config: &mut Config, arg: Option<ThemeArg>, kv: &mut dyn KvStore) -> Result<()> {
    if let Some(arg) = arg {
        let choice = ThemeChoice::from(arg);
        set_theme_pref(kv, choice)?;
        config.theme = choice.theme();
    } else if let Some(saved) = theme_pref(kv) {
        config.theme = saved.theme();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use crate::theme::Theme;

    #[test]
    fn explicit_theme_persists_preference() {
        let mut kv = MemStore::default();
        let mut config = Config::default();
        apply_theme(&mut config, Some(ThemeArg::Light), &mut kv).unwrap();
        assert_eq!(config.theme.background, Theme::light().background);
        assert_eq!(theme_pref(&kv), Some(ThemeChoice::Light));
    }

    #[test]
    fn saved_preference_applies_without_flag() {
        let mut kv = MemStore::default();
        set_theme_pref(&mut kv, ThemeChoice::Light).unwrap();
        let mut config = Config::default();
        apply_theme(&mut config, None, &mut kv).unwrap();
        assert_eq!(config.theme.background, Theme::light().background);
    }

    #[test]
    fn no_flag_no_preference_keeps_default() {
        let mut kv = MemStore::default();
        let mut config = Config::default();
        apply_theme(&mut config, None, &mut kv).unwrap();
        assert_eq!(config.theme.background, Theme::dark().background);
    }
}
