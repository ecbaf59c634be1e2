pub mod cli;
pub mod metadata;
pub mod query;
pub mod storage;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_console_session() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.json");
        let mut cli = CLI::new_with_file(&file_path, "");

        let mut out = Vec::new();
        cli.run_with("create User\n".as_bytes(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let id1 = output.lines().next().unwrap().to_string();
        assert_eq!(id1.len(), 36);
        assert_eq!(id1.matches('-').count(), 4);

        let script = format!(
            "show User {id}\n\
             update User {id} name \"Betty\"\n\
             show User {id}\n\
             destroy User {id}\n\
             show User {id}\n\
             all User\n",
            id = id1
        );
        let mut out = Vec::new();
        cli.run_with(script.as_bytes(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with(&format!("[User] ({}) {{", id1)));
        assert!(!lines[0].contains("'name'"));
        assert!(lines[1].contains("'name': 'Betty'"));
        assert_eq!(lines[2], "** no instance found **");
        assert_eq!(lines[3], "[]");
        assert_eq!(lines[4], "");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_store_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("file.json");

        let mut ids = Vec::new();
        {
            let mut engine = CommandEngine::new_with_file(&file_path);
            for kind in Kind::ALL {
                match engine.execute(&format!("create {}", kind)).unwrap() {
                    CommandResult::Created(id) => ids.push((kind, id)),
                    other => panic!("Expected created id, got {:?}", other),
                }
            }
            let (_, place_id) = &ids[5];
            engine.execute(&format!("update Place {} price_by_night 120", place_id)).unwrap();
        }

        let mut storage = FileStorage::new(&file_path);
        storage.reload();
        assert_eq!(storage.all().len(), Kind::ALL.len());
        for (kind, id) in &ids {
            let record = storage.get(&format!("{}.{}", kind, id)).unwrap();
            assert_eq!(record.kind, *kind);
        }
        let (_, place_id) = &ids[5];
        let place = storage.get(&format!("Place.{}", place_id)).unwrap();
        assert_eq!(place.attributes["price_by_night"], Value::Integer(120));
    }
}

pub use metadata::{Kind, Value};
pub use storage::{FileStorage, Record, StorageError};
pub use query::{CommandEngine, CommandError, CommandResult};
pub use cli::CLI;
