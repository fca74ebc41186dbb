// Copyright 2018-2024 the Deno authors. MIT license.

use std::panic::AssertUnwindSafe;

use deno_globals::build_globals;
use deno_globals::DefaultDeclarationParser;
use deno_globals::GlobalsOptions;
use deno_globals::ModuleSpecifier;
use deno_globals::SerializedNode;
use deno_globals::SourceCorpus;
use file_test_runner::collect_and_run_tests;
use file_test_runner::collection::strategies::TestPerFileCollectionStrategy;
use file_test_runner::collection::CollectOptions;
use file_test_runner::collection::CollectedTest;
use file_test_runner::RunOptions;
use file_test_runner::TestResult;
use pretty_assertions::assert_eq;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

fn main() {
  collect_and_run_tests(
    CollectOptions {
      base: "tests/specs".into(),
      strategy: Box::new(TestPerFileCollectionStrategy {
        file_pattern: Some("^*.[/\\\\]specs[/\\\\]globals[/\\\\].*$".to_owned()),
      }),
      filter_override: None,
    },
    RunOptions { parallel: true },
    |test: &CollectedTest| {
      if test.name.starts_with("specs::globals") {
        TestResult::from_maybe_panic(AssertUnwindSafe(|| {
          run_globals_test(test);
        }))
      } else {
        TestResult::Failed {
          output: format!("Unknown test kind: {}", test.name).into_bytes(),
        }
      }
    },
  )
}

fn run_globals_test(test: &CollectedTest) {
  let _ = env_logger::builder().is_test(true).try_init();
  let file_text = test.read_to_string().unwrap();
  let spec = parse_spec(file_text);
  let options = spec.options.clone().unwrap_or_default();

  let mut corpus = SourceCorpus::new();
  for file in &spec.files {
    corpus
      .add_source(
        file.url(),
        file.text.clone().into(),
        &DefaultDeclarationParser,
      )
      .unwrap();
  }
  let globals = build_globals(
    &corpus,
    &GlobalsOptions {
      include_object_heritage: !options.no_object_heritage,
      include_namespace_nodes: !options.no_namespace_nodes,
    },
  )
  .unwrap();

  let output = if options.json {
    let mut text = globals.to_json_string_pretty().unwrap();
    text.push('\n');
    text
  } else {
    render_catalog(&globals.to_serialized())
  };
  let diagnostics = globals
    .diagnostics()
    .iter()
    .map(|d| d.to_string())
    .collect::<Vec<_>>();

  if std::env::var("UPDATE").as_deref() == Ok("1") {
    let mut spec = spec;
    spec.output_file.text = output.clone();
    spec.diagnostics = diagnostics.clone();
    std::fs::write(&test.path, spec.emit()).unwrap();
    return;
  }
  assert_eq!(
    output,
    spec.output_file.text,
    "Should be same for {}",
    test.path.display()
  );
  assert_eq!(
    diagnostics,
    spec.diagnostics,
    "Should be same for {}",
    test.path.display()
  );
}

/// One line per global name, followed by one indented line per overload.
fn render_catalog(
  catalog: &indexmap::IndexMap<String, Vec<SerializedNode>>,
) -> String {
  let mut text = String::new();
  for (name, overloads) in catalog {
    text.push_str(name);
    text.push('\n');
    for overload in overloads {
      text.push_str("  ");
      text.push_str(&render_node(overload));
      text.push('\n');
    }
  }
  text
}

fn render_node(node: &SerializedNode) -> String {
  let mut text = node.kind.clone();
  if !node.name.is_empty() {
    text.push_str(&format!(" {}", node.name));
  }
  if let Some(node_text) = &node.text {
    text.push_str(&format!(" `{}`", node_text));
  }
  if !node.meta.is_empty() {
    text.push_str(&format!(" [{}]", node.meta.join(", ")));
  }
  if !node.generics.is_empty() {
    text.push_str(&format!("<{}>", render_nodes(&node.generics)));
  }
  if !node.params.is_empty() {
    text.push_str(&format!("({})", render_nodes(&node.params)));
  }
  match node.returns.as_slice() {
    [] => {}
    [single] => text.push_str(&format!(" -> {}", render_node(single))),
    returns => text.push_str(&format!(" -> [{}]", render_nodes(returns))),
  }
  text
}

fn render_nodes(nodes: &[SerializedNode]) -> String {
  nodes.iter().map(render_node).collect::<Vec<_>>().join(", ")
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecOptions {
  #[serde(default)]
  #[serde(skip_serializing_if = "is_false")]
  pub no_object_heritage: bool,
  #[serde(default)]
  #[serde(skip_serializing_if = "is_false")]
  pub no_namespace_nodes: bool,
  /// Compare the JSON catalog instead of the rendered listing.
  #[serde(default)]
  #[serde(skip_serializing_if = "is_false")]
  pub json: bool,
}

fn is_false(v: &bool) -> bool {
  !v
}

pub struct Spec {
  pub options: Option<SpecOptions>,
  pub files: Vec<SpecFile>,
  pub output_file: SpecFile,
  pub diagnostics: Vec<String>,
}

impl Spec {
  pub fn emit(&self) -> String {
    let mut text = String::new();
    if let Some(options) = &self.options {
      text.push_str("~~ ");
      text.push_str(&serde_json::to_string(options).unwrap());
      text.push_str(" ~~");
      text.push('\n');
    }
    for file in &self.files {
      text.push_str(&file.emit());
      text.push('\n');
    }
    text.push_str(&self.output_file.emit());
    if !text.ends_with('\n') {
      text.push('\n');
    }
    if !self.diagnostics.is_empty() {
      text.push_str("\n# diagnostics\n");
      text.push_str(&serde_json::to_string_pretty(&self.diagnostics).unwrap());
      text.push('\n');
    }
    text
  }
}

#[derive(Debug)]
pub struct SpecFile {
  pub specifier: String,
  pub text: String,
}

impl SpecFile {
  pub fn emit(&self) -> String {
    format!("# {}\n{}", self.specifier, self.text)
  }

  pub fn url(&self) -> ModuleSpecifier {
    ModuleSpecifier::parse(&format!("file:///{}", self.specifier)).unwrap()
  }
}

pub fn parse_spec(text: String) -> Spec {
  let mut files = Vec::new();
  let mut current_file = None;
  let mut options: Option<SpecOptions> = None;
  for (i, line) in text.split('\n').enumerate() {
    if i == 0 && line.starts_with("~~ ") {
      let line = line.replace("~~", "").trim().to_string();
      options = Some(serde_json::from_str(&line).unwrap());
      continue;
    }
    if let Some(specifier) = line.strip_prefix("# ") {
      if let Some(file) = current_file.take() {
        files.push(file);
      }
      current_file = Some(SpecFile {
        specifier: specifier.to_string(),
        text: String::new(),
      });
    } else {
      let current_file = current_file.as_mut().unwrap();
      if !current_file.text.is_empty() {
        current_file.text.push('\n');
      }
      current_file.text.push_str(line);
    }
  }
  files.push(current_file.unwrap());
  let output_file =
    files.remove(files.iter().position(|f| f.specifier == "output").unwrap());
  let diagnostics = take_file(&mut files, "diagnostics");
  Spec {
    options,
    files,
    output_file,
    diagnostics,
  }
}

fn take_file<T: Default + DeserializeOwned>(
  files: &mut Vec<SpecFile>,
  name: &str,
) -> T {
  if let Some(index) = files.iter().position(|f| f.specifier == name) {
    let file = files.remove(index);
    serde_json::from_str(&file.text).unwrap()
  } else {
    Default::default()
  }
}
