//! JSON task files on disk.
//!
//! A task file `<tasks_dir>/<name>.json` holds a list of [`RankingTask`]s.

use crate::models::RankingTask;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Task file not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task index {index} out of range for {task} ({len} tasks)")]
    TaskIndex {
        task: String,
        index: usize,
        len: usize,
    },
}

/// Storage locations
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub tasks_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_dir: PathBuf::from("data/tasks"),
        }
    }
}

/// Reads and writes task files.
#[derive(Debug, Clone, Default)]
pub struct TaskStorage {
    config: StorageConfig,
}

fn ensure_json_extension(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}

impl TaskStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn open(tasks_dir: impl Into<PathBuf>) -> Self {
        Self::new(StorageConfig {
            tasks_dir: tasks_dir.into(),
        })
    }

    pub fn tasks_dir(&self) -> &Path {
        &self.config.tasks_dir
    }

    pub fn task_path(&self, task_name: &str) -> PathBuf {
        self.config.tasks_dir.join(ensure_json_extension(task_name))
    }

    /// Names of all task files, sorted, without the `.json` extension.
    pub fn list_tasks(&self) -> Result<Vec<String>, StorageError> {
        if !self.config.tasks_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.config.tasks_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn read_task(&self, task_name: &str) -> Result<Vec<RankingTask>, StorageError> {
        let path = self.task_path(task_name);
        let data = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.clone()),
            _ => StorageError::Io(e),
        })?;
        let tasks: Vec<RankingTask> = serde_json::from_str(&data)?;
        debug!(path = %path.display(), count = tasks.len(), "read task file");
        Ok(tasks)
    }

    /// Read a single task by position.
    pub fn read_task_at(&self, task_name: &str, index: usize) -> Result<RankingTask, StorageError> {
        let mut tasks = self.read_task(task_name)?;
        let len = tasks.len();
        if index >= len {
            return Err(StorageError::TaskIndex {
                task: task_name.to_string(),
                index,
                len,
            });
        }
        Ok(tasks.swap_remove(index))
    }

    pub fn write_task(&self, task_name: &str, tasks: &[RankingTask]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.config.tasks_dir)?;
        let path = self.task_path(task_name);
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), count = tasks.len(), "wrote task file");
        Ok(())
    }

    /// Remove a helper from every task in the file. Returns how many tasks had it.
    pub fn delete_helper(&self, task_name: &str, helper_name: &str) -> Result<usize, StorageError> {
        let mut tasks = self.read_task(task_name)?;
        let removed = tasks
            .iter_mut()
            .filter_map(|t| t.helpers.remove(helper_name))
            .count();
        self.write_task(task_name, &tasks)?;
        info!(task = task_name, helper = helper_name, removed, "deleted helper");
        Ok(removed)
    }

    /// Store a helper payload on the tasks at `indices`, or on every task when `None`.
    pub fn set_helper(
        &self,
        task_name: &str,
        helper_name: &str,
        indices: Option<&[usize]>,
        value: &Value,
    ) -> Result<(), StorageError> {
        let mut tasks = self.read_task(task_name)?;
        let len = tasks.len();

        match indices {
            Some(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                    return Err(StorageError::TaskIndex {
                        task: task_name.to_string(),
                        index,
                        len,
                    });
                }
                for &i in indices {
                    tasks[i].helpers.insert(helper_name.to_string(), value.clone());
                }
            }
            None => {
                for task in tasks.iter_mut() {
                    task.helpers.insert(helper_name.to_string(), value.clone());
                }
            }
        }

        self.write_task(task_name, &tasks)
    }

    /// Apply `f` to the task at `index` and write the file back.
    pub fn update_task<F>(&self, task_name: &str, index: usize, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut RankingTask),
    {
        let mut tasks = self.read_task(task_name)?;
        let len = tasks.len();
        let task = tasks.get_mut(index).ok_or_else(|| StorageError::TaskIndex {
            task: task_name.to_string(),
            index,
            len,
        })?;
        f(task);
        self.write_task(task_name, &tasks)
    }
}
