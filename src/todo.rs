//! Todo list with due dates and reminders, persisted to todos.json

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::constants::reminders::GRACE_SECS;
use crate::persistence;
use crate::types::{Due, DueStatus, deserialize_due};

/// A single task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTodo")]
pub struct Todo {
    /// Store-assigned id, unique among live todos
    pub id: String,

    pub text: String,

    pub completed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<NaiveDateTime>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<Due>,

    /// Reminder instant that last fired for the current `due`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notified_at: Option<NaiveDateTime>,
}

/// On-disk shape of a todo, including keys written by older versions
///
/// One record may carry both `title` and `text`, or several of `due`,
/// `reminder` and `due_date`, when two editors shared the file.
#[derive(Deserialize)]
struct StoredTodo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    created: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_due")]
    due: Option<Due>,
    #[serde(default, deserialize_with = "deserialize_due")]
    reminder: Option<Due>,
    #[serde(default, deserialize_with = "deserialize_due")]
    due_date: Option<Due>,
    #[serde(default)]
    notified_at: Option<NaiveDateTime>,
    /// Older flag; only a dated reminder can be pinned to an instant
    #[serde(default)]
    notified: bool,
}

impl From<StoredTodo> for Todo {
    fn from(raw: StoredTodo) -> Self {
        let text = raw
            .text
            .filter(|t| !t.trim().is_empty())
            .or(raw.title)
            .unwrap_or_default();
        let due = raw.due.or(raw.reminder).or(raw.due_date);
        let notified_at = raw.notified_at.or(match due {
            Some(Due::DateTime(ts)) if raw.notified => Some(ts),
            _ => None,
        });

        Self {
            id: raw.id,
            text,
            completed: raw.completed,
            created: raw.created,
            due,
            notified_at,
        }
    }
}

impl Todo {
    pub fn due_status(&self, now: NaiveDateTime) -> DueStatus {
        self.due.map_or(DueStatus::NoDue, |due| due.status(now))
    }
}

/// Todos whose due value falls on `date`; bare times count as `today`
pub fn due_on(todos: &[Todo], date: NaiveDate, today: NaiveDate) -> Vec<&Todo> {
    todos
        .iter()
        .filter(|t| t.due.is_some_and(|d| d.on_day(today) == date))
        .collect()
}

/// In-memory todo list backed by a JSON file
///
/// Every mutating call rewrites the file before returning.
pub struct TodoStore {
    path: PathBuf,
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let todos: Vec<Todo> = persistence::load_or_default(&path);
        let mut store = Self { path, todos };
        store.assign_missing_ids();
        info!(count = store.todos.len(), "Loaded todos");
        store
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Id of the todo at a 0-based display position
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.todos.get(index).map(|t| t.id.as_str())
    }

    pub fn pending_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn save(&self) -> Result<()> {
        persistence::save_json(&self.path, &self.todos).context("Failed to save todos")
    }

    pub fn add(&mut self, text: &str, due: Option<Due>) -> Result<&Todo> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Todo text cannot be empty.");
        }

        let todo = Todo {
            id: self.next_id(),
            text: text.to_string(),
            completed: false,
            created: Some(Local::now().naive_local()),
            due,
            notified_at: None,
        };
        info!(id = %todo.id, "Adding todo");
        self.todos.push(todo);
        self.save()?;

        Ok(&self.todos[self.todos.len() - 1])
    }

    /// Replace text and due value. A changed due value re-arms its reminder.
    pub fn edit(&mut self, id: &str, text: &str, due: Option<Due>) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Todo text cannot be empty.");
        }

        let todo = self.find_mut(id)?;
        todo.text = text.to_string();
        if todo.due != due {
            todo.due = due;
            todo.notified_at = None;
        }
        info!(id = %id, "Edited todo");
        self.save()
    }

    /// Flip `completed` and return the new value
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        let todo = self.find_mut(id)?;
        todo.completed = !todo.completed;
        let completed = todo.completed;
        debug!(id = %id, completed, "Toggled todo");
        self.save()?;
        Ok(completed)
    }

    pub fn delete(&mut self, id: &str) -> Result<Todo> {
        let index = self
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| anyhow!("No todo with id '{id}'"))?;
        let removed = self.todos.remove(index);
        info!(id = %id, "Deleted todo");
        self.save()?;
        Ok(removed)
    }

    /// Mark and return every reminder that fell due within the last minute
    ///
    /// Each reminder instant fires once. A bare time yields a new instant
    /// every day, so it fires again the next day. Reminders missed by more
    /// than the grace window are skipped silently.
    pub fn check_due_reminders(&mut self, now: NaiveDateTime) -> Result<Vec<Todo>> {
        let earliest = now - Duration::seconds(GRACE_SECS);
        let mut fired = Vec::new();

        for todo in &mut self.todos {
            let Some(at) = todo.due.and_then(|d| d.reminder_at(now.date())) else {
                continue;
            };
            if todo.notified_at != Some(at) && at <= now && at > earliest {
                todo.notified_at = Some(at);
                fired.push(todo.clone());
            }
        }

        if !fired.is_empty() {
            info!(count = fired.len(), "Reminders due");
            self.save()?;
        }
        Ok(fired)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow!("No todo with id '{id}'"))
    }

    fn next_id(&self) -> String {
        let max = self
            .todos
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }

    /// Older files have todos without ids
    fn assign_missing_ids(&mut self) {
        for index in 0..self.todos.len() {
            if self.todos[index].id.trim().is_empty() {
                self.todos[index].id = self.next_id();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> (TempDir, TodoStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TodoStore::load(dir.path().join("todos.json"));
        (dir, store)
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 14)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_add_assigns_increasing_ids_and_persists() {
        let (dir, mut store) = store();
        store.add("Buy milk", None).unwrap();
        store.add("Call dentist", Some(Due::parse("10:00 AM").unwrap())).unwrap();

        let reloaded = TodoStore::load(dir.path().join("todos.json"));
        let ids: Vec<&str> = reloaded.todos().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(reloaded.todos()[1].text, "Call dentist");
        assert!(reloaded.todos()[0].created.is_some());
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let (_dir, mut store) = store();
        assert!(store.add("   ", None).is_err());
        assert!(store.todos().is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let (_dir, mut store) = store();
        store.add("one", None).unwrap();
        store.add("two", None).unwrap();
        store.delete("1").unwrap();
        let id = store.add("three", None).unwrap().id.clone();
        assert_eq!(id, "3");
    }

    #[test]
    fn test_toggle_twice_restores_record() {
        let (_dir, mut store) = store();
        let due = Some(Due::parse("4/14/2024").unwrap());
        let id = store.add("Finish report", due).unwrap().id.clone();
        let before = store.get(&id).unwrap().clone();

        assert!(store.toggle(&id).unwrap());
        assert_eq!(store.get(&id).unwrap().due, due);
        assert!(!store.toggle(&id).unwrap());

        assert_eq!(store.get(&id).unwrap(), &before);
    }

    #[test]
    fn test_unknown_id_errors() {
        let (_dir, mut store) = store();
        assert!(store.toggle("42").is_err());
        assert!(store.delete("42").is_err());
        assert!(store.edit("42", "text", None).is_err());
    }

    #[test]
    fn test_reminder_fires_once() {
        let (dir, mut store) = store();
        let id = store.add("Stand-up", Some(Due::parse("9:00 AM").unwrap())).unwrap().id.clone();

        // Not yet due
        assert!(store.check_due_reminders(at(8, 59, 0)).unwrap().is_empty());

        let fired = store.check_due_reminders(at(9, 0, 30)).unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, id);
        assert_eq!(store.get(&id).unwrap().notified_at, Some(at(9, 0, 0)));

        assert!(store.check_due_reminders(at(9, 0, 45)).unwrap().is_empty());

        // Persisted
        let mut reloaded = TodoStore::load(dir.path().join("todos.json"));
        assert_eq!(reloaded.get(&id).unwrap().notified_at, Some(at(9, 0, 0)));
        assert!(reloaded.check_due_reminders(at(9, 0, 50)).unwrap().is_empty());
    }

    #[test]
    fn test_time_reminder_fires_again_next_day() {
        let (_dir, mut store) = store();
        store.add("Stand-up", Some(Due::parse("9:00 AM").unwrap())).unwrap();

        assert_eq!(store.check_due_reminders(at(9, 0, 10)).unwrap().len(), 1);
        let next_day = at(9, 0, 10) + Duration::days(1);
        assert_eq!(store.check_due_reminders(next_day).unwrap().len(), 1);
        assert!(store.check_due_reminders(next_day + Duration::seconds(20)).unwrap().is_empty());
    }

    #[test]
    fn test_dated_reminder_fires_only_once() {
        let (_dir, mut store) = store();
        store.add("Dentist", Some(Due::parse("2024-04-14 09:00").unwrap())).unwrap();

        assert_eq!(store.check_due_reminders(at(9, 0, 10)).unwrap().len(), 1);
        assert!(store.check_due_reminders(at(9, 0, 10) + Duration::days(1)).unwrap().is_empty());
    }

    #[test]
    fn test_reminder_outside_grace_window_is_skipped() {
        let (_dir, mut store) = store();
        store.add("Old", Some(Due::parse("2024-04-14 08:00").unwrap())).unwrap();
        assert!(store.check_due_reminders(at(9, 0, 0)).unwrap().is_empty());
        assert_eq!(store.todos()[0].notified_at, None);
    }

    #[test]
    fn test_date_only_due_never_fires_reminder() {
        let (_dir, mut store) = store();
        store.add("Report", Some(Due::parse("4/14/2024").unwrap())).unwrap();
        assert!(store.check_due_reminders(at(0, 0, 30)).unwrap().is_empty());
    }

    #[test]
    fn test_edit_due_rearms_reminder() {
        let (_dir, mut store) = store();
        let id = store.add("Stand-up", Some(Due::parse("9:00 AM").unwrap())).unwrap().id.clone();
        store.check_due_reminders(at(9, 0, 10)).unwrap();
        assert!(store.get(&id).unwrap().notified_at.is_some());

        // Same due value keeps the mark
        store.edit(&id, "Stand-up (moved)", Some(Due::parse("9:00 AM").unwrap())).unwrap();
        assert!(store.get(&id).unwrap().notified_at.is_some());

        store.edit(&id, "Stand-up (moved)", Some(Due::parse("9:30 AM").unwrap())).unwrap();
        let todo = store.get(&id).unwrap();
        assert_eq!(todo.notified_at, None);
        assert_eq!(todo.text, "Stand-up (moved)");
        assert_eq!(todo.due, Some(Due::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap())));
    }

    #[test]
    fn test_due_status_helpers() {
        let (_dir, mut store) = store();
        store.add("No due", None).unwrap();
        store.add("Soon", Some(Due::parse("10:00 AM").unwrap())).unwrap();

        let now = at(9, 0, 0);
        assert_eq!(store.todos()[0].due_status(now), DueStatus::NoDue);
        assert_eq!(store.todos()[1].due_status(now), DueStatus::DueSoon);
    }

    #[test]
    fn test_due_on_matches_dates_and_times() {
        let (_dir, mut store) = store();
        store.add("Report", Some(Due::parse("4/14/2024").unwrap())).unwrap();
        store.add("Dentist", Some(Due::parse("10:00 AM").unwrap())).unwrap();
        store.add("Groceries", Some(Due::parse("4/15/2024").unwrap())).unwrap();
        store.add("Someday", None).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 4, 14).unwrap();
        let titles: Vec<&str> = due_on(store.todos(), today, today).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(titles, vec!["Report", "Dentist"]);

        let tomorrow = today.succ_opt().unwrap();
        assert_eq!(due_on(store.todos(), tomorrow, today).len(), 1);
    }

    #[test]
    fn test_loads_legacy_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(
            &path,
            r#"[
                {"title": "Finish report", "due_date": "4/14/2024", "completed": false},
                {"title": "Call dentist", "due_date": "10:00 AM", "completed": false},
                {"id": "7", "text": "Pay rent", "completed": true,
                 "created": "2024-04-01T08:15:30.123456", "reminder": "2024-04-14T10:00:00", "notified": true}
            ]"#,
        )
        .unwrap();

        let store = TodoStore::load(&path);
        let todos = store.todos();
        assert_eq!(todos.len(), 3);
        assert_eq!(todos[0].id, "8");
        assert_eq!(todos[1].id, "9");
        assert_eq!(todos[0].due, Some(Due::Date(NaiveDate::from_ymd_opt(2024, 4, 14).unwrap())));
        assert!(matches!(todos[1].due, Some(Due::Time(_))));
        assert_eq!(todos[2].due, Some(Due::DateTime(at(10, 0, 0))));
        assert_eq!(todos[2].notified_at, Some(at(10, 0, 0)));
        assert_eq!(store.pending_count(), 2);
    }

    #[test]
    fn test_loads_record_with_old_and_new_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        fs::write(
            &path,
            r#"[
                {"id": "1", "title": "Keep me", "completed": false},
                {"id": "2", "title": "Old", "text": "Edited", "completed": false,
                 "due_date": "10:00 AM", "reminder": "2024-04-14T10:00:00"},
                {"id": "3", "title": "Title only", "text": "", "completed": false,
                 "due": {"kind": "date", "value": "2024-04-15"}, "due_date": "10:00 AM"}
            ]"#,
        )
        .unwrap();

        let mut store = TodoStore::load(&path);
        assert_eq!(store.todos().len(), 3);
        assert_eq!(store.todos()[0].text, "Keep me");
        assert_eq!(store.todos()[1].text, "Edited");
        assert_eq!(store.todos()[1].due, Some(Due::DateTime(at(10, 0, 0))));
        assert_eq!(store.todos()[2].text, "Title only");
        assert_eq!(
            store.todos()[2].due,
            Some(Due::Date(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()))
        );

        store.add("new", None).unwrap();
        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("Keep me"));
        assert!(!saved.contains("\"title\""));
        assert_eq!(TodoStore::load(&path).todos().len(), 4);
    }

    #[test]
    fn test_corrupt_file_is_backed_up_before_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        let corrupt = r#"[{"id": "1", "text": "Keep me", "completed": "#;
        fs::write(&path, corrupt).unwrap();

        let mut store = TodoStore::load(&path);
        assert!(store.todos().is_empty());
        store.add("new", None).unwrap();

        assert_eq!(fs::read_to_string(path.with_extension("json.bak")).unwrap(), corrupt);
        assert_eq!(TodoStore::load(&path).todos().len(), 1);
    }
}
