// Task listing, comment fetching and index resolution.
//
// Every call goes to the network; nothing is read back from the local
// snapshot. Detail lookups therefore resolve the user's index against a
// fresh listing, which may differ from what an earlier listing showed.

use crate::api::Transport;
use crate::config::Config;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tracing::debug;

/// An open task assigned to the configured user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "ID", alias = "id", default)]
    pub id: i64,
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "SectionName", alias = "section_name", alias = "sectionName", default)]
    pub section_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    #[serde(alias = "ID", default)]
    pub id: i64,
    #[serde(alias = "Text", default)]
    pub text: String,
}

/// A decoded listing together with the array text exactly as received.
#[derive(Debug)]
pub struct Listing {
    pub tasks: Vec<Task>,
    pub raw: Box<RawValue>,
}

#[derive(Debug)]
pub struct TaskDetail {
    pub task: Task,
    pub comments: Vec<TaskComment>,
}

pub struct TaskService<'a, T> {
    config: &'a Config,
    transport: T,
}

impl<'a, T: Transport> TaskService<'a, T> {
    pub fn new(config: &'a Config, transport: T) -> Self {
        TaskService { config, transport }
    }

    /// Fetch the open tasks assigned to the user in the configured lane.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.fetch_listing()?.tasks)
    }

    /// Like [`list_tasks`](Self::list_tasks) but also keeps the raw array.
    pub fn fetch_listing(&self) -> Result<Listing> {
        let url = self.tasks_url()?;
        let token = self.config.require_api_token()?;

        let body = self.transport.get(&url, token)?;
        let raw: Box<RawValue> =
            serde_json::from_slice(&body).map_err(|e| Error::decode("task list", e))?;
        let tasks: Vec<Task> =
            serde_json::from_str(raw.get()).map_err(|e| Error::decode("task list", e))?;
        debug!(count = tasks.len(), "decoded tasks");

        Ok(Listing { tasks, raw })
    }

    pub fn fetch_comments(&self, task_id: i64) -> Result<Vec<TaskComment>> {
        let url = self.comments_url(task_id)?;
        let token = self.config.require_api_token()?;

        let body = self.transport.get(&url, token)?;
        let comments: Vec<TaskComment> =
            serde_json::from_slice(&body).map_err(|e| Error::decode("task comments", e))?;
        debug!(task_id, count = comments.len(), "decoded comments");
        Ok(comments)
    }

    /// Resolve a 1-based position against a fresh listing and fetch that
    /// task's comments. No comments request is made if the index is bad.
    pub fn task_detail(&self, index: i64) -> Result<TaskDetail> {
        let tasks = self.list_tasks()?;
        let task = resolve_index(&tasks, index)?.clone();
        let comments = self.fetch_comments(task.id)?;
        Ok(TaskDetail { task, comments })
    }

    fn tasks_url(&self) -> Result<String> {
        let base = self.config.require_base_url()?;
        let lane = self.config.require_lane_id()?;
        Ok(format!(
            "{base}/sections/{lane}/tasks?assigned_to_me=true&status=open"
        ))
    }

    fn comments_url(&self, task_id: i64) -> Result<String> {
        let base = self.config.require_base_url()?;
        Ok(format!("{base}/tasks/{task_id}/comments"))
    }
}

/// Map a 1-based display index onto `tasks`.
pub fn resolve_index(tasks: &[Task], index: i64) -> Result<&Task> {
    if tasks.is_empty() {
        return Err(Error::NoTasks);
    }
    let invalid = || Error::InvalidIndex {
        index,
        len: tasks.len(),
    };
    let pos = usize::try_from(index.checked_sub(1).ok_or_else(invalid)?).map_err(|_| invalid())?;
    tasks.get(pos).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, name: &str) -> Task {
        Task {
            id,
            name: name.into(),
            section_name: "Doing".into(),
        }
    }

    #[test]
    fn resolve_is_one_based() {
        let tasks = vec![task(10, "a"), task(20, "b")];
        assert_eq!(resolve_index(&tasks, 1).unwrap().id, 10);
        assert_eq!(resolve_index(&tasks, 2).unwrap().id, 20);
    }

    #[test]
    fn resolve_rejects_out_of_range() {
        let tasks = vec![task(10, "a")];
        for index in [0, -1, 2, i64::MIN, i64::MAX] {
            match resolve_index(&tasks, index) {
                Err(Error::InvalidIndex { index: got, len }) => {
                    assert_eq!(got, index);
                    assert_eq!(len, 1);
                }
                other => panic!("index {index}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn resolve_empty_list_reports_no_tasks() {
        assert!(matches!(resolve_index(&[], 1), Err(Error::NoTasks)));
        assert!(matches!(resolve_index(&[], 0), Err(Error::NoTasks)));
    }

    #[test]
    fn task_decodes_exact_and_snake_case_fields() {
        let exact: Task =
            serde_json::from_str(r#"{"ID":1,"Name":"Fix bug","SectionName":"Doing"}"#).unwrap();
        let snake: Task = serde_json::from_str(
            r#"{"id":1,"name":"Fix bug","section_name":"Doing","status":1,"notes":null}"#,
        )
        .unwrap();
        assert_eq!(exact, task(1, "Fix bug"));
        assert_eq!(exact, snake);
    }

    #[test]
    fn missing_fields_decode_as_defaults() {
        let t: Task = serde_json::from_str(r#"{"id":3}"#).unwrap();
        assert_eq!(t.name, "");
        assert_eq!(t.section_name, "");

        let c: TaskComment = serde_json::from_str(r#"{"Text":"hi"}"#).unwrap();
        assert_eq!(c, TaskComment { id: 0, text: "hi".into() });
    }
}
