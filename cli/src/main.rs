// Copyright 2018-2024 the Deno authors. MIT license.

use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use clap::Parser;
use deno_globals::load_and_build;
use deno_globals::GlobalsOptions;
use sys_traits::impls::RealSys;
use sys_traits::EnvCurrentDir;
use sys_traits::FsRead;

/// Prints the globals catalog of TypeScript declaration files as JSON.
#[derive(Parser, Debug)]
#[command(name = "deno_globals", version, about)]
struct Args {
  /// Declaration files to read, in order.
  files: Vec<PathBuf>,

  /// Read more declaration file paths from this file, one per line.
  /// Blank lines and lines starting with `#` are ignored.
  #[arg(long, value_name = "FILE")]
  files_from: Option<PathBuf>,

  /// Do not copy the members of `Object` onto other interfaces.
  #[arg(long)]
  no_object_heritage: bool,

  /// Do not emit entries for namespaces.
  #[arg(long)]
  no_namespace_nodes: bool,
}

impl Args {
  fn globals_options(&self) -> GlobalsOptions {
    GlobalsOptions {
      include_object_heritage: !self.no_object_heritage,
      include_namespace_nodes: !self.no_namespace_nodes,
    }
  }
}

fn main() -> anyhow::Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("warn"),
  )
  .init();
  run(&RealSys::default(), Args::parse())
}

fn run<TSys: FsRead + EnvCurrentDir>(
  sys: &TSys,
  args: Args,
) -> anyhow::Result<()> {
  let cwd = sys
    .env_current_dir()
    .context("Failed resolving the current directory.")?;
  let paths = collect_paths(sys, &cwd, &args)?;
  if paths.is_empty() {
    bail!("No declaration files were provided.");
  }
  log::debug!("Reading {} declaration files", paths.len());
  let globals = load_and_build(sys, &paths, &args.globals_options())?;
  println!("{}", globals.to_json_string_pretty()?);
  Ok(())
}

fn collect_paths(
  sys: &impl FsRead,
  cwd: &Path,
  args: &Args,
) -> anyhow::Result<Vec<PathBuf>> {
  let mut paths = args
    .files
    .iter()
    .map(|path| cwd.join(path))
    .collect::<Vec<_>>();
  if let Some(list_path) = &args.files_from {
    let list_path = cwd.join(list_path);
    let text = sys
      .fs_read_to_string(&list_path)
      .with_context(|| format!("Failed reading '{}'.", list_path.display()))?;
    let base = list_path.parent().unwrap_or(cwd);
    paths.extend(parse_file_list(&text, base));
  }
  Ok(paths)
}

/// Paths in a list file are relative to the list file.
fn parse_file_list(text: &str, base: &Path) -> Vec<PathBuf> {
  text
    .lines()
    .map(|line| line.trim())
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .map(|line| base.join(line))
    .collect()
}
