//! Text-menu fallback used when no display is available

use anyhow::{Context as _, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::autostart::Autostart;
use crate::config::Settings;
use crate::todo::TodoStore;
use crate::types::{DUE_INPUT_HINT, Due};
use crate::urls::{UrlOpener, UrlStore};

/// Everything the menus read and mutate
pub struct Context<'a> {
    pub todos: &'a mut TodoStore,
    pub urls: &'a mut UrlStore,
    pub settings: &'a mut Settings,
    pub settings_path: &'a Path,
    /// `None` when the platform has no autostart backend
    pub autostart: Option<&'a Autostart>,
    pub opener: &'a mut dyn UrlOpener,
}

/// Run the menus until the user exits or input ends
pub fn run<R: BufRead, W: Write>(ctx: Context<'_>, input: R, output: W) -> Result<()> {
    info!("Starting CLI");
    let mut session = Session { ctx, input, out: output };
    session.main_menu()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Quit,
}

enum DueInput {
    Ended,
    Rejected,
    Value(Option<Due>),
}

/// Bail out of the current menu when input is exhausted
macro_rules! read_or_quit {
    ($session:expr, $prompt:expr) => {
        match $session.prompt($prompt)? {
            Some(line) => line,
            None => return Ok(Flow::Quit),
        }
    };
}

struct Session<'a, R, W> {
    ctx: Context<'a>,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, question: &str) -> Result<Option<bool>> {
        let answer = self.prompt(&format!("{question} (y/n): "))?;
        Ok(answer.map(|a| a.eq_ignore_ascii_case("y")))
    }

    fn main_menu(&mut self) -> Result<()> {
        writeln!(self.out, "\n===== DESKTOP WIDGET - CLI VERSION =====")?;
        loop {
            writeln!(self.out, "\nMain Menu:")?;
            writeln!(self.out, "1. URL Launcher")?;
            writeln!(self.out, "2. Todo Manager")?;
            writeln!(self.out, "3. Settings")?;
            writeln!(self.out, "4. Exit")?;

            let Some(choice) = self.prompt("\nSelect an option (1-4): ")? else {
                break;
            };
            let flow = match choice.as_str() {
                "1" => self.url_menu()?,
                "2" => self.todo_menu()?,
                "3" => self.settings_menu()?,
                "4" => Flow::Quit,
                _ => {
                    writeln!(self.out, "\nInvalid choice. Please try again.")?;
                    Flow::Back
                }
            };
            if flow == Flow::Quit {
                break;
            }
        }
        writeln!(self.out, "\nExiting Desktop Widget. Goodbye!")?;
        Ok(())
    }

    // URL groups

    fn url_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.out, "\n----- URL LAUNCHER -----")?;
            self.list_groups()?;
            writeln!(self.out, "\nOptions:")?;
            writeln!(self.out, "a. Add URL Group")?;
            writeln!(self.out, "e. Edit URL Group")?;
            writeln!(self.out, "d. Delete URL Group")?;
            writeln!(self.out, "o. Open URL Group")?;
            writeln!(self.out, "b. Back to Main Menu")?;

            let choice = read_or_quit!(self, "\nSelect an option: ");
            let flow = match choice.to_ascii_lowercase().as_str() {
                "a" => self.add_group()?,
                "e" => self.edit_group()?,
                "d" => self.delete_group()?,
                "o" => self.open_group()?,
                "b" => return Ok(Flow::Back),
                _ => {
                    writeln!(self.out, "\nInvalid choice. Please try again.")?;
                    Flow::Back
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn list_groups(&mut self) -> Result<()> {
        if self.ctx.urls.groups().is_empty() {
            writeln!(self.out, "\nNo URL groups defined.")?;
            return Ok(());
        }
        writeln!(self.out, "\nURL Groups:")?;
        for (i, group) in self.ctx.urls.groups().iter().enumerate() {
            writeln!(self.out, "{}. {} ({} URLs)", i + 1, group.name, group.urls.len())?;
        }
        Ok(())
    }

    /// Read URLs until an empty line; `None` when input ended
    fn read_urls(&mut self) -> Result<Option<Vec<String>>> {
        let mut urls = Vec::new();
        loop {
            match self.prompt("> ")? {
                None => return Ok(None),
                Some(line) if line.is_empty() => return Ok(Some(urls)),
                Some(line) => urls.push(line),
            }
        }
    }

    fn add_group(&mut self) -> Result<Flow> {
        let name = read_or_quit!(self, "Enter group name: ");
        writeln!(self.out, "Enter URLs (one per line, empty line to finish):")?;
        let Some(urls) = self.read_urls()? else {
            return Ok(Flow::Quit);
        };

        match self.ctx.urls.add(&name, urls) {
            Ok(()) => writeln!(self.out, "URL group '{}' added successfully.", name.trim())?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    fn pick_group(&mut self, action: &str) -> Result<Option<Option<usize>>> {
        if self.ctx.urls.groups().is_empty() {
            writeln!(self.out, "No URL groups to {action}.")?;
            return Ok(Some(None));
        }
        let Some(answer) = self.prompt(&format!("Enter the number of the group to {action}: "))? else {
            return Ok(None);
        };
        let index = parse_index(&answer, self.ctx.urls.groups().len());
        if index.is_none() {
            writeln!(self.out, "Invalid group number.")?;
        }
        Ok(Some(index))
    }

    fn edit_group(&mut self) -> Result<Flow> {
        let index = match self.pick_group("edit")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Back),
            Some(Some(index)) => index,
        };
        let Some(group) = self.ctx.urls.get(index).cloned() else {
            return Ok(Flow::Back);
        };

        writeln!(self.out, "Editing group: {}", group.name)?;
        let name = read_or_quit!(
            self,
            &format!("Enter new name (or press enter to keep '{}'): ", group.name)
        );
        let name = if name.is_empty() { group.name.clone() } else { name };

        writeln!(self.out, "Current URLs:")?;
        for (i, url) in group.urls.iter().enumerate() {
            writeln!(self.out, "{}. {}", i + 1, url)?;
        }
        writeln!(self.out, "\nOptions:")?;
        writeln!(self.out, "a. Add URL")?;
        writeln!(self.out, "d. Delete URL")?;
        writeln!(self.out, "k. Keep current URLs")?;

        let mut urls = group.urls.clone();
        let choice = read_or_quit!(self, "Select an option: ");
        match choice.to_ascii_lowercase().as_str() {
            "a" => {
                writeln!(self.out, "Enter new URLs (one per line, empty line to finish):")?;
                let Some(added) = self.read_urls()? else {
                    return Ok(Flow::Quit);
                };
                urls.extend(added);
            }
            "d" => {
                let answer = read_or_quit!(self, "Enter the number of the URL to delete: ");
                match parse_index(&answer, urls.len()) {
                    Some(i) => {
                        urls.remove(i);
                        writeln!(self.out, "URL deleted.")?;
                    }
                    None => {
                        writeln!(self.out, "Invalid URL number.")?;
                        return Ok(Flow::Back);
                    }
                }
            }
            _ => {}
        }

        match self.ctx.urls.edit(index, &name, urls) {
            Ok(()) => writeln!(self.out, "URL group updated successfully.")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    fn delete_group(&mut self) -> Result<Flow> {
        let index = match self.pick_group("delete")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Back),
            Some(Some(index)) => index,
        };
        let name = self.ctx.urls.get(index).map(|g| g.name.clone()).unwrap_or_default();

        match self.confirm(&format!("Are you sure you want to delete '{name}'?"))? {
            None => return Ok(Flow::Quit),
            Some(false) => return Ok(Flow::Back),
            Some(true) => {}
        }
        match self.ctx.urls.delete(index) {
            Ok(_) => writeln!(self.out, "URL group deleted successfully.")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    fn open_group(&mut self) -> Result<Flow> {
        let index = match self.pick_group("open")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Back),
            Some(Some(index)) => index,
        };
        if let Some(group) = self.ctx.urls.get(index) {
            writeln!(self.out, "Opening URLs for group: {}", group.name)?;
        }

        match self.ctx.urls.open_group(index, &mut *self.ctx.opener) {
            Ok(failures) => {
                for failure in failures {
                    writeln!(self.out, "Error opening URL {}: {}", failure.url, failure.error)?;
                }
            }
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    // Todos

    fn todo_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.out, "\n----- TODO MANAGER -----")?;
            self.list_todos()?;
            writeln!(self.out, "\nOptions:")?;
            writeln!(self.out, "a. Add Todo")?;
            writeln!(self.out, "e. Edit Todo")?;
            writeln!(self.out, "t. Toggle Completed")?;
            writeln!(self.out, "d. Delete Todo")?;
            writeln!(self.out, "b. Back to Main Menu")?;

            let choice = read_or_quit!(self, "\nSelect an option: ");
            let flow = match choice.to_ascii_lowercase().as_str() {
                "a" => self.add_todo()?,
                "e" => self.edit_todo()?,
                "t" => self.toggle_todo()?,
                "d" => self.delete_todo()?,
                "b" => return Ok(Flow::Back),
                _ => {
                    writeln!(self.out, "\nInvalid choice. Please try again.")?;
                    Flow::Back
                }
            };
            if flow == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn list_todos(&mut self) -> Result<()> {
        if self.ctx.todos.todos().is_empty() {
            writeln!(self.out, "\nNo todos defined.")?;
            return Ok(());
        }
        writeln!(self.out, "\nTodos:")?;
        for (i, todo) in self.ctx.todos.todos().iter().enumerate() {
            let mark = if todo.completed { "[x]" } else { "[ ]" };
            let due = todo.due.map(|d| format!(" (due: {d})")).unwrap_or_default();
            writeln!(self.out, "{}. {} {}{}", i + 1, mark, todo.text, due)?;
        }
        Ok(())
    }

    /// Prompt for an optional due value; empty input clears it
    fn read_due(&mut self) -> Result<DueInput> {
        let Some(answer) = self.prompt(&format!("Enter due ({DUE_INPUT_HINT}) or press enter for none: "))? else {
            return Ok(DueInput::Ended);
        };
        if answer.is_empty() {
            return Ok(DueInput::Value(None));
        }
        match Due::parse(&answer) {
            Ok(due) => Ok(DueInput::Value(Some(due))),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                Ok(DueInput::Rejected)
            }
        }
    }

    fn add_todo(&mut self) -> Result<Flow> {
        let text = read_or_quit!(self, "Enter todo text: ");
        if text.is_empty() {
            writeln!(self.out, "Todo text cannot be empty.")?;
            return Ok(Flow::Back);
        }
        let due = match self.read_due()? {
            DueInput::Ended => return Ok(Flow::Quit),
            DueInput::Rejected => return Ok(Flow::Back),
            DueInput::Value(due) => due,
        };

        match self.ctx.todos.add(&text, due) {
            Ok(_) => writeln!(self.out, "Todo added successfully.")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    fn pick_todo(&mut self, action: &str) -> Result<Option<Option<String>>> {
        if self.ctx.todos.todos().is_empty() {
            writeln!(self.out, "No todos to {action}.")?;
            return Ok(Some(None));
        }
        let Some(answer) = self.prompt(&format!("Enter the number of the todo to {action}: "))? else {
            return Ok(None);
        };
        let id = parse_index(&answer, self.ctx.todos.todos().len())
            .and_then(|i| self.ctx.todos.id_at(i))
            .map(str::to_string);
        if id.is_none() {
            writeln!(self.out, "Invalid todo number.")?;
        }
        Ok(Some(id))
    }

    fn edit_todo(&mut self) -> Result<Flow> {
        let id = match self.pick_todo("edit")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Back),
            Some(Some(id)) => id,
        };
        let Some(todo) = self.ctx.todos.get(&id).cloned() else {
            return Ok(Flow::Back);
        };

        writeln!(self.out, "Editing todo: {}", todo.text)?;
        let text = read_or_quit!(
            self,
            &format!("Enter new text (or press enter to keep '{}'): ", todo.text)
        );
        let text = if text.is_empty() { todo.text.clone() } else { text };

        let due = match self.confirm("Change due date/reminder?")? {
            None => return Ok(Flow::Quit),
            Some(false) => todo.due,
            Some(true) => match self.read_due()? {
                DueInput::Ended => return Ok(Flow::Quit),
                DueInput::Rejected => return Ok(Flow::Back),
                DueInput::Value(due) => due,
            },
        };

        match self.ctx.todos.edit(&id, &text, due) {
            Ok(()) => writeln!(self.out, "Todo updated successfully.")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    fn toggle_todo(&mut self) -> Result<Flow> {
        let id = match self.pick_todo("toggle")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Back),
            Some(Some(id)) => id,
        };
        match self.ctx.todos.toggle(&id) {
            Ok(completed) => {
                let status = if completed { "completed" } else { "not completed" };
                writeln!(self.out, "Todo marked as {status}.")?;
            }
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    fn delete_todo(&mut self) -> Result<Flow> {
        let id = match self.pick_todo("delete")? {
            None => return Ok(Flow::Quit),
            Some(None) => return Ok(Flow::Back),
            Some(Some(id)) => id,
        };
        let text = self.ctx.todos.get(&id).map(|t| t.text.clone()).unwrap_or_default();

        match self.confirm(&format!("Are you sure you want to delete '{text}'?"))? {
            None => return Ok(Flow::Quit),
            Some(false) => return Ok(Flow::Back),
            Some(true) => {}
        }
        match self.ctx.todos.delete(&id) {
            Ok(_) => writeln!(self.out, "Todo deleted successfully.")?,
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(Flow::Back)
    }

    // Settings

    fn settings_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.out, "\n----- SETTINGS -----")?;
            let state = if self.ctx.settings.autostart { "Enabled" } else { "Disabled" };
            writeln!(self.out, "Autostart: {state}")?;
            match self.ctx.autostart {
                Some(autostart) => writeln!(self.out, "Entry: {}", autostart.describe())?,
                None => writeln!(self.out, "Entry: not supported on this platform")?,
            }
            writeln!(self.out, "Theme: {}", self.ctx.settings.theme)?;
            writeln!(self.out, "\nOptions:")?;
            writeln!(self.out, "a. Toggle Autostart")?;
            writeln!(self.out, "b. Back to Main Menu")?;

            let choice = read_or_quit!(self, "\nSelect an option: ");
            match choice.to_ascii_lowercase().as_str() {
                "a" => self.toggle_autostart()?,
                "b" => return Ok(Flow::Back),
                _ => writeln!(self.out, "\nInvalid choice. Please try again.")?,
            }
        }
    }

    fn toggle_autostart(&mut self) -> Result<()> {
        let enabled = !self.ctx.settings.autostart;

        if let Some(autostart) = self.ctx.autostart
            && let Err(e) = autostart.set(enabled)
        {
            warn!(error = %e, "Failed to apply autostart");
            writeln!(self.out, "Could not update autostart: {e:#}")?;
            return Ok(());
        }

        self.ctx.settings.autostart = enabled;
        if let Err(e) = self.ctx.settings.save(self.ctx.settings_path) {
            writeln!(self.out, "{e:#}")?;
        }
        let status = if enabled { "enabled" } else { "disabled" };
        writeln!(self.out, "Autostart {status}.")?;
        Ok(())
    }
}

/// 1-based menu number to a 0-based index
fn parse_index(answer: &str, len: usize) -> Option<usize> {
    let n: usize = answer.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}
