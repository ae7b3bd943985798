//! folio - document tree ⇄ Markdown conversion and heading outlines

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{debug, info};

use folio::config::{load_config, load_config_from, save_config, Lang, Settings};
use folio::document::{render_html, Node};
use folio::error::Result;
use folio::files::{import_into, read_markdown_file, write_markdown_export, NoticeBoard};
use folio::markdown::{markdown_to_tree, tree_to_markdown_with, MarkdownStyle};
use folio::navigator::{HeadingNavigator, HtmlView};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Document tree and Markdown conversion", long_about = None)]
#[command(after_help = "EXAMPLES:
    folio export post.json --slug my-post --lang ar   Write my-post_ar.md
    folio import post.md --pretty                     Print the document tree
    folio outline post.md                             List headings with ids
    folio config --write-defaults                     Create the settings file")]
struct Cli {
    /// Settings file to use instead of the platform config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export a document tree (JSON) as `{slug}_{lang}.md`
    Export {
        /// Document tree JSON file
        input: PathBuf,

        /// File name stem
        #[arg(long)]
        slug: String,

        /// Content language (en or ar)
        #[arg(long, value_parser = parse_lang)]
        lang: Option<Lang>,

        /// Output directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Import a Markdown file and print its document tree as JSON
    Import {
        /// Markdown file
        input: PathBuf,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Print the HTML rendering of a document tree or Markdown file
    Render {
        /// Document tree JSON or Markdown file
        input: PathBuf,
    },

    /// List the headings of a document tree or Markdown file
    Outline {
        /// Document tree JSON or Markdown file
        input: PathBuf,

        /// Also print the rendered HTML with heading ids assigned
        #[arg(long)]
        html: bool,
    },

    /// Print the effective settings as JSON
    Config {
        /// Write default settings to the config file instead
        #[arg(long)]
        write_defaults: bool,
    },
}

fn parse_lang(value: &str) -> std::result::Result<Lang, String> {
    Lang::from_code(value).ok_or_else(|| format!("unsupported language '{value}' (expected en or ar)"))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => match load_config_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => load_config(),
    };

    let result = match cli.command {
        Command::Export {
            input,
            slug,
            lang,
            out,
        } => export(&settings, &input, &slug, lang, out),
        Command::Import { input, pretty } => import(&settings, &input, pretty),
        Command::Render { input } => render(&input),
        Command::Outline { input, html } => outline(&settings, &input, html),
        Command::Config { write_defaults } => config(&settings, cli.config.as_deref(), write_defaults),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load a document tree from JSON, or from Markdown for `.md`/`.markdown`.
fn load_tree(path: &Path) -> Result<Node> {
    let contents = read_markdown_file(path)?;
    let is_markdown = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"));

    if is_markdown {
        debug!("Reading {} as Markdown", path.display());
        Ok(markdown_to_tree(&contents))
    } else {
        Node::from_json(&contents)
    }
}

fn export(settings: &Settings, input: &Path, slug: &str, lang: Option<Lang>, out: Option<PathBuf>) -> Result<()> {
    let tree = load_tree(input)?;
    let style = MarkdownStyle {
        bullet_marker: settings.export.bullet_marker,
    };
    let markdown = tree_to_markdown_with(&tree, &style);

    let lang = lang.unwrap_or(settings.export.default_lang);
    let dir = out
        .or_else(|| settings.export.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let path = write_markdown_export(&dir, slug, lang, &markdown)?;
    println!("{}", path.display());
    Ok(())
}

fn import(settings: &Settings, input: &Path, pretty: bool) -> Result<()> {
    let mut notices = NoticeBoard::new(Duration::from_millis(settings.notice_clear_ms));
    let mut document = Node::doc(Vec::new());

    let imported = import_into(input, &mut document, &mut notices, Duration::ZERO);
    if let Some(notice) = notices.current() {
        eprintln!("{}", notice.message);
    }
    notices.teardown();

    if !imported {
        return Err(folio::Error::Application(format!(
            "Nothing imported from {}",
            input.display()
        )));
    }
    println!("{}", document.to_json(pretty)?);
    Ok(())
}

fn render(input: &Path) -> Result<()> {
    let tree = load_tree(input)?;
    println!("{}", render_html(&tree));
    Ok(())
}

fn outline(settings: &Settings, input: &Path, show_html: bool) -> Result<()> {
    let tree = load_tree(input)?;
    let mut view = HtmlView::from_html(&render_html(&tree));

    let mut navigator = HeadingNavigator::new(settings.navigator.clone());
    navigator.refresh(Duration::ZERO, &mut view);

    if navigator.outline().is_empty() {
        info!("No headings in {}", input.display());
    }
    for entry in navigator.outline() {
        let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
        println!("{}{} #{}", indent, entry.text, entry.id);
    }
    navigator.teardown();

    if show_html {
        println!("{}", view.to_html()?);
    }
    Ok(())
}

fn config(settings: &Settings, config_path: Option<&Path>, write_defaults: bool) -> Result<()> {
    if write_defaults {
        let path = save_config(&Settings::default(), config_path)?;
        println!("{}", path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(settings)?);
    }
    Ok(())
}
