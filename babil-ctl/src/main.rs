use std::{
    env::VarError,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use babil_client::{api::Comment, CommentSection, Forest, Row, TOP_LEVEL_PLACEHOLDER};
use chrono::Utc;
use serde::{Deserialize, Serialize};

mod command;
use command::Command;

#[derive(structopt::StructOpt)]
struct Opt {
    /// JSON file with the initial comments, instead of the built-in ones
    #[structopt(long, parse(from_os_str))]
    seed: Option<PathBuf>,

    /// Start with the replies of every comment shown
    #[structopt(long)]
    expand_all: bool,

    /// Do not print replies nested deeper than this
    #[structopt(long)]
    max_depth: Option<usize>,

    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(structopt::StructOpt)]
enum Cmd {
    /// Print the comments and exit
    Show,

    /// Print the comments as JSON and exit
    Dump,

    /// Read actions from stdin, one per line
    Repl,
}

fn seed_path(opt: &Opt) -> anyhow::Result<Option<PathBuf>> {
    choose_seed(opt.seed.as_deref(), std::env::var("BABIL_SEED"))
}

/// `--seed` wins over `BABIL_SEED`; with neither, the built-in comments are used
fn choose_seed(
    flag: Option<&Path>,
    env: Result<String, VarError>,
) -> anyhow::Result<Option<PathBuf>> {
    if let Some(p) = flag {
        return Ok(Some(p.to_path_buf()));
    }
    match env {
        Ok(p) => Ok(Some(PathBuf::from(p))),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).context("reading BABIL_SEED environment variable"),
    }
}

fn load_forest(path: &Path) -> anyhow::Result<Forest> {
    let data =
        std::fs::read_to_string(path).with_context(|| format!("reading seed file {path:?}"))?;
    let roots = parse_comments(&data).with_context(|| format!("parsing seed file {path:?}"))?;
    Forest::from_seed(roots).with_context(|| format!("validating seed file {path:?}"))
}

/// Parses a list of comments, however deeply their replies are nested
fn parse_comments(data: &str) -> serde_json::Result<Vec<Comment>> {
    let mut de = serde_json::Deserializer::from_str(data);
    de.disable_recursion_limit();
    let roots = Vec::<Comment>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(roots)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    let mut section = match seed_path(&opt)? {
        Some(path) => {
            let forest = load_forest(&path)?;
            tracing::info!(?path, comments = forest.len(), "loaded seed");
            CommentSection::new(forest, babil_client::seed::current_user())
        }
        None => CommentSection::seeded(),
    };
    if opt.expand_all {
        section.expand_all();
    }

    let mut out = io::stdout().lock();
    match opt.cmd {
        Cmd::Show => render(&mut out, &section, opt.max_depth)?,
        Cmd::Dump => dump(&mut out, &section)?,
        Cmd::Repl => repl(&mut out, &mut section, opt.max_depth)?,
    }

    Ok(())
}

fn repl(
    out: &mut impl Write,
    section: &mut CommentSection,
    max_depth: Option<usize>,
) -> anyhow::Result<()> {
    render(out, section, max_depth)?;
    for line in io::stdin().lock().lines() {
        let line = line.context("reading command from stdin")?;
        let cmd = match command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        match cmd {
            Command::Action(msg) => match section.update(msg) {
                Ok(()) => render(out, section, max_depth)?,
                Err(err) => {
                    tracing::info!(%err, "action rejected");
                    writeln!(out, "{}", err.user_message())?;
                }
            },
            Command::Show => render(out, section, max_depth)?,
            Command::Dump => dump(out, section)?,
            Command::Help => writeln!(out, "{}", command::HELP)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

fn dump(out: &mut impl Write, section: &CommentSection) -> anyhow::Result<()> {
    let mut ser = serde_json::Serializer::pretty(&mut *out);
    section
        .forest()
        .roots()
        .serialize(serde_stacker::Serializer::new(&mut ser))
        .context("serializing comments")?;
    writeln!(out)?;
    Ok(())
}

fn render(
    out: &mut impl Write,
    section: &CommentSection,
    max_depth: Option<usize>,
) -> io::Result<()> {
    writeln!(out, "Commentaires")?;
    writeln!(out, "------------")?;
    for row in section.rows(Utc::now()) {
        if max_depth.map_or(false, |max| row.depth > max) {
            continue;
        }
        render_row(out, &row)?;
    }
    writeln!(out, "> {TOP_LEVEL_PLACEHOLDER}")?;
    writeln!(out)
}

fn render_row(out: &mut impl Write, row: &Row) -> io::Result<()> {
    let indent = "    ".repeat(row.depth);
    let c = &row.comment;
    writeln!(
        out,
        "{indent}({}) {} · {}  [{}]",
        c.author.initial, c.author.name, row.time_ago, c.id
    )?;
    writeln!(out, "{indent}    {}", c.text)?;

    let mark = |on: bool| if on { "*" } else { "" };
    let mut actions = format!(
        "{indent}    +{}{} -{}{} · Répondre",
        row.likes_label(),
        mark(c.liked_by_current_user),
        row.dislikes_label(),
        mark(c.disliked_by_current_user),
    );
    if let Some(label) = row.replies_toggle_label() {
        actions.push_str(" · ");
        actions.push_str(&label);
    }
    writeln!(out, "{actions}")?;

    if row.ui.reply_form_visible {
        writeln!(out, "{indent}    > {}", row.reply_placeholder())?;
    }
    Ok(())
}
