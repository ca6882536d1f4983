// Dead code detection breaks here, because the integration test crates all use a disjoint set of
// the pub items.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small but complete API exercising nesting, parameters, security and bodies.
pub const LIBRARY_RAML: &str = r#"#%RAML 0.8
title: Library API
version: v2
baseUri: https://library.example.com/{version}
mediaType: application/json
documentation:
  - title: Getting started
    content: Use the **books** resource to browse the catalogue.
securitySchemes:
  - oauth_2_0:
      type: OAuth 2.0
      description: Tokens are issued by the library portal.
/books:
  displayName: Books
  description: The catalogue.
  get:
    description: List books.
    queryParameters:
      author:
        displayName: Author
        type: string
        description: Filter by author name.
  post:
    securedBy: [null, oauth_2_0]
    body:
      example: |
        {"title": "Dune"}
    responses:
      201:
        description: Created.
  /{bookId}:
    uriParameters:
      bookId:
        type: integer
        description: Book identifier.
    get:
      responses:
        200:
          body:
            application/json:
              example: |
                {"id": 1, "title": "Dune"}
    /loans/{loanId}:
      delete:
        securedBy: [oauth_2_0]
"#;

/// Writes `source` to `api.raml` in a fresh temporary directory.
pub fn write_raml(source: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("api.raml");
    fs::write(&path, source).unwrap();
    (temp_dir, path)
}

/// Writes an auxiliary file next to a RAML document.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
