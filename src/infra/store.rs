use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Ticket, TicketId};
use crate::error::{AppError, AppResult};
use crate::services::TicketStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct TicketFile {
    next_id: TicketId,
    tickets: Vec<Ticket>,
}

impl TicketFile {
    fn insert(&mut self, mut ticket: Ticket) -> TicketId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        ticket.id = id;
        self.tickets.push(ticket);
        id
    }

    fn find(&self, id: TicketId) -> Option<Ticket> {
        self.tickets.iter().find(|ticket| ticket.id == id).cloned()
    }

    fn replace(&mut self, ticket: Ticket) -> AppResult<()> {
        let slot = self
            .tickets
            .iter_mut()
            .find(|existing| existing.id == ticket.id)
            .ok_or_else(|| AppError::Storage(format!("ticket {} does not exist", ticket.id)))?;
        *slot = ticket;
        Ok(())
    }
}

/// Keeps every ticket in one JSON document, rewritten on each change.
pub struct JsonTicketStore {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl JsonTicketStore {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> AppResult<TicketFile> {
        match fs::read_to_string(&self.file_path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Storage(format!(
                    "invalid ticket file {}: {err}",
                    self.file_path.display()
                ))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(TicketFile::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    fn save(&self, file: &TicketFile) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(file)?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    fn guard(&self) -> AppResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| AppError::Storage("ticket file lock poisoned".to_string()))
    }

    fn read(&self) -> AppResult<TicketFile> {
        let _guard = self.guard()?;
        self.load()
    }

    fn modify<T>(&self, apply: impl FnOnce(&mut TicketFile) -> AppResult<T>) -> AppResult<T> {
        let _guard = self.guard()?;
        let mut file = self.load()?;
        let result = apply(&mut file)?;
        self.save(&file)?;
        Ok(result)
    }
}

#[async_trait]
impl TicketStore for JsonTicketStore {
    async fn create(&self, ticket: Ticket) -> AppResult<TicketId> {
        self.modify(|file| Ok(file.insert(ticket)))
    }

    async fn get_by_id(&self, id: TicketId) -> AppResult<Option<Ticket>> {
        Ok(self.read()?.find(id))
    }

    async fn update(&self, ticket: Ticket) -> AppResult<()> {
        self.modify(|file| file.replace(ticket))
    }
}

/// In-process store backing the workflow tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTicketStore {
    file: Mutex<TicketFile>,
}

#[cfg(test)]
impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_file<T>(&self, apply: impl FnOnce(&mut TicketFile) -> AppResult<T>) -> AppResult<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| AppError::Storage("ticket store lock poisoned".to_string()))?;
        apply(&mut file)
    }
}

#[cfg(test)]
#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn create(&self, ticket: Ticket) -> AppResult<TicketId> {
        self.with_file(|file| Ok(file.insert(ticket)))
    }

    async fn get_by_id(&self, id: TicketId) -> AppResult<Option<Ticket>> {
        self.with_file(|file| Ok(file.find(id)))
    }

    async fn update(&self, ticket: Ticket) -> AppResult<()> {
        self.with_file(|file| file.replace(ticket))
    }
}
