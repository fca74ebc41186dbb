// Copyright 2018-2024 the Deno authors. MIT license.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use deno_ast::LineAndColumnDisplay;
use deno_ast::MediaType;
use deno_ast::ModuleItemRef;
use deno_ast::ModuleSpecifier;
use deno_ast::ParseDiagnostic;
use deno_ast::ParsedSource;
use deno_ast::SourcePos;
use deno_ast::SourceTextInfo;
use sys_traits::FsRead;
use thiserror::Error;

/// Index of a file within its corpus, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

pub struct ParseOptions<'a> {
  pub specifier: &'a ModuleSpecifier,
  pub source: Arc<str>,
  pub media_type: MediaType,
}

/// Parses declaration files to a ParsedSource.
pub trait DeclarationParser {
  fn parse_declarations(
    &self,
    options: ParseOptions,
  ) -> Result<ParsedSource, ParseDiagnostic>;
}

#[derive(Default, Clone)]
pub struct DefaultDeclarationParser;

impl DeclarationParser for DefaultDeclarationParser {
  fn parse_declarations(
    &self,
    options: ParseOptions,
  ) -> Result<ParsedSource, ParseDiagnostic> {
    deno_ast::parse_module(deno_ast::ParseParams {
      specifier: options.specifier.clone(),
      text: options.source,
      media_type: options.media_type,
      capture_tokens: false,
      scope_analysis: false,
      maybe_syntax: None,
    })
  }
}

#[derive(Debug, Error, deno_error::JsError)]
pub enum LoadError {
  #[class(generic)]
  #[error("Failed reading '{}'. {source:#}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[class(type)]
  #[error("Could not convert '{}' to a file specifier.", .0.display())]
  InvalidPath(PathBuf),
  #[class(syntax)]
  #[error("Failed parsing '{specifier}'. {diagnostic}")]
  Parse {
    specifier: ModuleSpecifier,
    diagnostic: Box<ParseDiagnostic>,
  },
}

/// A parsed declaration file.
pub struct SourceFile {
  id: FileId,
  parsed: ParsedSource,
}

impl SourceFile {
  pub fn id(&self) -> FileId {
    self.id
  }

  pub fn specifier(&self) -> &ModuleSpecifier {
    self.parsed.specifier()
  }

  pub fn parsed_source(&self) -> &ParsedSource {
    &self.parsed
  }

  pub fn text_info(&self) -> &SourceTextInfo {
    self.parsed.text_info_lazy()
  }

  /// Top level statements in document order.
  pub fn items(&self) -> impl Iterator<Item = ModuleItemRef<'_>> {
    self.parsed.program_ref().body()
  }

  pub fn line_and_column(&self, pos: SourcePos) -> LineAndColumnDisplay {
    self.text_info().line_and_column_display(pos)
  }
}

/// The ordered, immutable set of declaration files being cataloged.
#[derive(Default)]
pub struct SourceCorpus {
  files: Vec<SourceFile>,
}

impl SourceCorpus {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parses `source` and appends it to the corpus.
  pub fn add_source(
    &mut self,
    specifier: ModuleSpecifier,
    source: Arc<str>,
    parser: &dyn DeclarationParser,
  ) -> Result<FileId, LoadError> {
    let media_type = match MediaType::from_specifier(&specifier) {
      MediaType::Unknown => MediaType::Dts,
      media_type => media_type,
    };
    let parsed = parser
      .parse_declarations(ParseOptions {
        specifier: &specifier,
        source,
        media_type,
      })
      .map_err(|diagnostic| LoadError::Parse {
        specifier: specifier.clone(),
        diagnostic: Box::new(diagnostic),
      })?;
    let id = FileId(self.files.len());
    self.files.push(SourceFile { id, parsed });
    Ok(id)
  }

  pub fn files(&self) -> &[SourceFile] {
    &self.files
  }

  pub fn file(&self, id: FileId) -> Option<&SourceFile> {
    self.files.get(id.0)
  }

  pub fn len(&self) -> usize {
    self.files.len()
  }

  pub fn is_empty(&self) -> bool {
    self.files.is_empty()
  }
}

/// Reads and parses every path, keeping the given order.
pub fn load_corpus<TSys: FsRead>(
  sys: &TSys,
  paths: &[PathBuf],
  parser: &dyn DeclarationParser,
) -> Result<SourceCorpus, LoadError> {
  let mut corpus = SourceCorpus::new();
  for path in paths {
    let specifier = specifier_from_path(path)?;
    let text = sys
      .fs_read_to_string(path)
      .map_err(|source| LoadError::Io {
        path: path.clone(),
        source,
      })?;
    log::debug!("Parsing {}", specifier);
    corpus.add_source(specifier, text.into_owned().into(), parser)?;
  }
  Ok(corpus)
}

fn specifier_from_path(path: &Path) -> Result<ModuleSpecifier, LoadError> {
  deno_path_util::url_from_file_path(path)
    .map_err(|_| LoadError::InvalidPath(path.to_path_buf()))
}

#[cfg(test)]
pub mod tests {
  use sys_traits::impls::InMemorySys;
  use sys_traits::FsCreateDirAll;
  use sys_traits::FsWrite;

  use super::*;

  /// Builds a corpus from `(file name, source)` pairs.
  pub fn corpus(files: &[(&str, &str)]) -> SourceCorpus {
    let mut corpus = SourceCorpus::new();
    for (name, text) in files {
      let specifier =
        ModuleSpecifier::parse(&format!("file:///{}", name)).unwrap();
      corpus
        .add_source(specifier, (*text).into(), &DefaultDeclarationParser)
        .unwrap();
    }
    corpus
  }

  #[test]
  fn loads_files_in_order() {
    let sys = InMemorySys::default();
    sys.fs_create_dir_all("/").unwrap();
    sys.fs_write("/b.d.ts", "declare var b: number;").unwrap();
    sys.fs_write("/a.d.ts", "declare var a: string;").unwrap();
    let corpus = load_corpus(
      &sys,
      &[PathBuf::from("/b.d.ts"), PathBuf::from("/a.d.ts")],
      &DefaultDeclarationParser,
    )
    .unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.files()[0].id(), FileId(0));
    assert_eq!(corpus.files()[0].specifier().as_str(), "file:///b.d.ts");
    assert_eq!(corpus.files()[1].specifier().as_str(), "file:///a.d.ts");
    assert_eq!(corpus.files()[1].items().count(), 1);
  }

  #[test]
  fn missing_file_is_an_error() {
    let sys = InMemorySys::default();
    let err = load_corpus(
      &sys,
      &[PathBuf::from("/missing.d.ts")],
      &DefaultDeclarationParser,
    )
    .err()
    .unwrap();
    assert!(matches!(err, LoadError::Io { .. }));
  }

  #[test]
  fn syntax_error_is_an_error() {
    let mut corpus = SourceCorpus::new();
    let err = corpus
      .add_source(
        ModuleSpecifier::parse("file:///bad.d.ts").unwrap(),
        "interface Foo {".into(),
        &DefaultDeclarationParser,
      )
      .err()
      .unwrap();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(corpus.is_empty());
  }
}
