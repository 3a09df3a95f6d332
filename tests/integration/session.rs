//! Sessions evaluating text and files

use std::path::PathBuf;

use rete_foundation::ErrorKind;
use rete_runtime::{ForwardChainer, Session};

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("rete-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn blocks_world_session() {
    let mut session = Session::new();
    session
        .eval(
            "[ ($x ^on $y) ^ ($y ^left-of $z) ^ ($z ^color red) => ($x ^near-red $z) ]
             B1 on B2 . B2 left-of B3 .",
        )
        .unwrap();
    assert_eq!(session.matches(1).unwrap().len(), 0);

    let summary = session.eval("B3 color red .").unwrap();
    assert_eq!((summary.facts, summary.derived), (1, 1));
    assert_eq!(session.matches(1).unwrap().len(), 1);
    assert!(session.facts().any(|f| f.to_string() == "(B1 ^near-red B3)"));
}

#[test]
fn load_file_from_disk() {
    let dir = TempDir::new("load");
    let path = dir.write(
        "family.rete",
        "; uncles\n[ ($s ^hasFather $f) ^ ($f ^hasBrother $u) => add ($s ^hasUncle $u) ]\nA hasFather B .\nB hasBrother C .\n",
    );

    let mut session = Session::new();
    let summary = session.load_file(path.to_str().unwrap()).unwrap();
    assert_eq!(summary.to_string(), "1 rule, 2 facts, 1 derived");
    assert_eq!(session.rules().len(), 1);
}

#[test]
fn relative_paths_use_load_path() {
    let dir = TempDir::new("relative");
    dir.write("facts.rete", "a b c .");

    let mut session = Session::new();
    session.set_load_path(dir.0.clone());
    assert_eq!(session.resolve_path("facts.rete"), dir.0.join("facts.rete"));
    session.load_file("facts.rete").unwrap();
    assert_eq!(session.facts().count(), 1);
    assert_eq!(session.load_path(), &dir.0);
}

#[test]
fn parse_error_in_file_names_the_file() {
    let dir = TempDir::new("broken");
    let path = dir.write("broken.rete", "a b c .\n[ ($x ^y $z) => ($x ^w) ]\n");

    let mut session = Session::new();
    let err = session.load_file(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ParseError { line: 2, .. }));
    assert!(err.context.unwrap().source.unwrap().ends_with("broken.rete"));
    assert_eq!(session.facts().count(), 0);
}

#[test]
fn session_limit_comes_from_chainer() {
    let mut session = Session::with_chainer(ForwardChainer::new().with_max_derivations(3));
    let err = session
        .eval("[ ($a ^next $b) ^ ($b ^next $c) => ($a ^next $c) ] 1 next 2 . 2 next 3 . 3 next 4 . 4 next 5 . 5 next 6 .")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
}
