use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use wocabot::engine::resolve::{Lookup, resolve_term};
use wocabot::prompt::{NoPrompter, Question, TermPrompter};
use wocabot::store::lexicon::Lexicon;
use wocabot::store::pictures::PictureIndex;

struct OneAnswer(Option<&'static str>);

impl TermPrompter for OneAnswer {
    fn ask(&mut self, _question: Question<'_>) -> Result<Option<String>> {
        Ok(self.0.take().map(str::to_string))
    }
}

#[test]
fn test_first_run_seeds_default_lexicon_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wordlist.json");

    let lexicon = Lexicon::open(&path).unwrap();
    assert_eq!(lexicon.len(), 9);
    assert!(path.exists());

    let on_disk: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.len(), 9);
    assert_eq!(on_disk["burka"], "storm");
}

#[test]
fn test_learned_term_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wordlist.json");

    let mut lexicon = Lexicon::open(&path).unwrap();
    let first = resolve_term(&mut lexicon, "Radnica", &mut OneAnswer(Some("town hall"))).unwrap();
    assert_eq!(first, Lookup::Learned("town hall".to_string()));

    let mut reopened = Lexicon::open(&path).unwrap();
    assert_eq!(reopened.len(), 10);
    let second = resolve_term(&mut reopened, "radnica", &mut NoPrompter).unwrap();
    assert_eq!(second, Lookup::Known("town hall".to_string()));
}

#[test]
fn test_non_ascii_is_written_verbatim() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("picturelist.json");

    let mut pictures = PictureIndex::open(&path).unwrap();
    assert!(pictures.is_empty());
    pictures.learn("/img/42.png", "čaj").unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("čaj"));
    assert!(raw.contains('\n'));
    assert_eq!(PictureIndex::open(&path).unwrap().word_for("/img/42.png"), Some("čaj"));
}

#[test]
fn test_existing_file_is_not_reseeded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wordlist.json");
    fs::write(&path, r#"{"mesto": "town"}"#).unwrap();

    let lexicon = Lexicon::open(&path).unwrap();
    assert_eq!(lexicon.len(), 1);
    assert_eq!(lexicon.lookup("town"), Some("mesto"));
}
